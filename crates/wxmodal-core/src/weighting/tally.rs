//! Weighted per-code evidence for one point.

use std::collections::BTreeMap;

use crate::decision_tree::CodeLookup;
use crate::error::{ModalError, Result};
use crate::selection::category::{BroadCategories, BroadCategory};
use crate::series::{Code, TimeSeries};

use super::diurnal::DiurnalWeighting;

/// Accumulated weight per code. Iterates in ascending code order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WeightedTally {
    weights: BTreeMap<Code, f64>,
}

impl WeightedTally {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, code: Code, weight: f64) {
        *self.weights.entry(code).or_insert(0.0) += weight;
    }

    /// Weight for `code`, or `None` if it never appeared.
    pub fn get(&self, code: Code) -> Option<f64> {
        self.weights.get(&code).copied()
    }

    pub fn contains(&self, code: Code) -> bool {
        self.weights.contains_key(&code)
    }

    pub fn iter(&self) -> impl Iterator<Item = (Code, f64)> + '_ {
        self.weights.iter().map(|(&c, &w)| (c, w))
    }

    pub fn codes(&self) -> impl Iterator<Item = Code> + '_ {
        self.weights.keys().copied()
    }

    pub fn total(&self) -> f64 {
        self.weights.values().sum()
    }

    pub fn len(&self) -> usize {
        self.weights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }

    /// Copy of the tally keeping only codes for which `keep` holds.
    pub fn filtered(&self, mut keep: impl FnMut(Code) -> bool) -> Self {
        Self {
            weights: self
                .weights
                .iter()
                .filter(|&(&c, _)| keep(c))
                .map(|(&c, &w)| (c, w))
                .collect(),
        }
    }
}

impl FromIterator<(Code, f64)> for WeightedTally {
    fn from_iter<I: IntoIterator<Item = (Code, f64)>>(iter: I) -> Self {
        let mut t = Self::new();
        for (c, w) in iter {
            t.add(c, w);
        }
        t
    }
}

/// Both tallies needed to summarise a point.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PointTallies {
    /// Diurnally weighted canonical codes, exactly as observed.
    pub raw: WeightedTally,
    /// `raw` plus each wet code's weight added again to its cloud equivalent.
    pub folded: WeightedTally,
}

/// Canonicalise and weight a point's series.
///
/// Codes are rewritten to their day form before anything is counted, so a
/// night and a day rendering of one phenomenon share a bucket.
pub fn build_tallies<L: CodeLookup + ?Sized>(
    series: &TimeSeries,
    lookup: &L,
    categories: &BroadCategories,
    weighting: &DiurnalWeighting,
) -> Result<PointTallies> {
    let mut raw = WeightedTally::new();
    let mut folded = WeightedTally::new();

    for (offset, code) in series.offsets() {
        let code = lookup.day_form(code);
        let w = weighting.multiplier(offset);
        raw.add(code, w);
        folded.add(code, w);

        if categories.category_of(code)? == BroadCategory::Wet {
            let cloud = lookup
                .cloud_equivalent(code)
                .ok_or(ModalError::MissingCloudEquivalent(code))?;
            folded.add(cloud, w);
        }
    }

    Ok(PointTallies { raw, folded })
}
