//! Group-level reduction shared by wet sub-category selection and intensity
//! consolidation.
//!
//! Ties are never errors:
//!   - between groups, the group declared first wins;
//!   - inside a group, the member listed first wins.
//!
//! Codes outside every group behave as singleton groups ranked after all
//! declared groups, higher codes first.

use std::collections::BTreeSet;

use crate::series::Code;
use crate::weighting::WeightedTally;

use super::groups::{Group, GroupDefinitionSet};

/// Result of a consolidation: the winning group (if the winner was a declared
/// group), its pooled weight, and the code chosen from it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pick<'a> {
    pub group: Option<&'a Group>,
    pub weight: f64,
    pub code: Code,
}

/// Summed weight of the group members present in `tally`, or `None` if no
/// member is present.
pub fn group_weight(group: &Group, tally: &WeightedTally) -> Option<f64> {
    let mut present = group.members.iter().filter_map(|&m| tally.get(m)).peekable();
    present.peek()?;
    Some(present.sum())
}

/// Heaviest member of `group` present in `tally`, earliest listed on ties.
pub fn best_member(group: &Group, tally: &WeightedTally) -> Option<Code> {
    best_in_order(group.members.iter().filter_map(|&m| tally.get(m).map(|w| (m, w))))
}

fn best_in_order(candidates: impl Iterator<Item = (Code, f64)>) -> Option<Code> {
    let mut best: Option<(Code, f64)> = None;
    for (code, w) in candidates {
        if best.map_or(true, |(_, bw)| w > bw) {
            best = Some((code, w));
        }
    }
    best.map(|(c, _)| c)
}

/// Pick the winning group and the winning code within it.
pub fn pick<'a>(tally: &WeightedTally, groups: &'a GroupDefinitionSet) -> Option<Pick<'a>> {
    let mut best: Option<Pick<'a>> = None;
    let mut consider = |candidate: Pick<'a>| {
        if best.map_or(true, |b| candidate.weight > b.weight) {
            best = Some(candidate);
        }
    };

    for group in groups.groups() {
        let (Some(weight), Some(code)) = (group_weight(group, tally), best_member(group, tally)) else {
            continue;
        };
        consider(Pick { group: Some(group), weight, code });
    }

    let mut ungrouped: Vec<(Code, f64)> = tally
        .iter()
        .filter(|&(c, _)| groups.group_of(c).is_none())
        .collect();
    ungrouped.sort_by(|a, b| b.0.cmp(&a.0));
    for (code, weight) in ungrouped {
        consider(Pick { group: None, weight, code });
    }

    best
}

/// Reduce `tally` to a single code using `groups`.
pub fn consolidate(tally: &WeightedTally, groups: &GroupDefinitionSet) -> Option<Code> {
    pick(tally, groups).map(|p| p.code)
}

/// Collapse each group's variants into one entry.
///
/// Every group with members present becomes a single entry keyed by its
/// heaviest member and carrying the group's pooled weight, so variants of one
/// phenomenon compete together against other phenomena. Codes outside every
/// group pass through untouched. A code listed in several groups belongs to
/// the first.
pub fn merge_variants(tally: &WeightedTally, groups: &GroupDefinitionSet) -> WeightedTally {
    let mut merged = WeightedTally::new();
    let mut claimed: BTreeSet<Code> = BTreeSet::new();

    for group in groups.groups() {
        let present: Vec<(Code, f64)> = group
            .members
            .iter()
            .filter(|&&m| !claimed.contains(&m))
            .filter_map(|&m| tally.get(m).map(|w| (m, w)))
            .collect();
        let Some(representative) = best_in_order(present.iter().copied()) else {
            continue;
        };
        let weight: f64 = present.iter().map(|&(_, w)| w).sum();
        claimed.extend(present.iter().map(|&(c, _)| c));
        merged.add(representative, weight);
    }

    for (code, w) in tally.iter() {
        if !claimed.contains(&code) {
            merged.add(code, w);
        }
    }
    merged
}
