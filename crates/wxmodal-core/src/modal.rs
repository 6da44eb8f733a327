//! Period-representative weather code from grouped modal selection.
//!
//! Per point, in order:
//!   1. canonicalise codes to day form and weight them diurnally;
//!   2. fold each wet code's weight into its dry cloud equivalent;
//!   3. classify the point wet or dry from the unfolded weights;
//!   4. merge intensity variants, if configured;
//!   5. reduce the winning side through its groups, or take the plain mode.
//!
//! Points never share state, so a batch can be split across threads freely.

use serde::{Deserialize, Serialize};

use crate::decision_tree::{CodeLookup, DecisionTree};
use crate::error::{ModalError, Result};
use crate::selection::{classify, merge_variants, pick, select_mode};
use crate::selection::{BroadCategories, BroadCategory, GroupDefinitionSet};
use crate::series::{common_period, Code, TimeSeries};
use crate::weighting::{build_tallies, DiurnalWeighting};

// ── Parameters ────────────────────────────────────────────────────────────────

/// Scalar tuning for the summary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModalParams {
    /// >= 0, default 1. Larger values need less wet evidence to call a point
    /// wet; 1 is a plain majority.
    pub wet_bias: f64,
    /// >= 0, default 1 (no emphasis). Multiplier for steps in the day window.
    pub day_weighting: f64,
    /// Hour of cycle at which the day window opens (inclusive).
    pub day_start: u32,
    /// Hour of cycle at which the day window closes (exclusive).
    pub day_end: u32,
    /// Hours in one diurnal cycle.
    pub day_length: u32,
}

impl Default for ModalParams {
    fn default() -> Self {
        Self {
            wet_bias: 1.0,
            day_weighting: 1.0,
            day_start: 6,
            day_end: 18,
            day_length: 24,
        }
    }
}

/// Complete, serialisable configuration for [`ModalFromGroupings`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModalConfig {
    pub decision_tree: DecisionTree,
    pub broad_categories: BroadCategories,
    /// Wet sub-categories in priority order. Absent means plain mode.
    #[serde(default)]
    pub wet_groups: Option<GroupDefinitionSet>,
    /// Optional dry grouping. Absent means plain mode.
    #[serde(default)]
    pub dry_groups: Option<GroupDefinitionSet>,
    /// Intensity variants to merge before selection.
    #[serde(default)]
    pub intensity_groups: Option<GroupDefinitionSet>,
    #[serde(default)]
    pub params: ModalParams,
}

impl ModalConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| ModalError::InvalidConfig(e.to_string()))
    }
}

// ── Orchestrator ──────────────────────────────────────────────────────────────

/// Summarises each point's series as one canonical weather code.
///
/// Configuration is immutable once built and shared by every point.
#[derive(Debug, Clone)]
pub struct ModalFromGroupings<L: CodeLookup = DecisionTree> {
    lookup: L,
    categories: BroadCategories,
    wet_groups: Option<GroupDefinitionSet>,
    dry_groups: Option<GroupDefinitionSet>,
    intensity_groups: Option<GroupDefinitionSet>,
    wet_bias: f64,
    weighting: DiurnalWeighting,
}

impl ModalFromGroupings<DecisionTree> {
    pub fn from_config(config: ModalConfig) -> Result<Self> {
        let mut plugin = Self::new(
            config.decision_tree,
            config.broad_categories,
            config.wet_groups.unwrap_or_default(),
        )?
        .with_params(&config.params)?;
        if let Some(groups) = config.dry_groups {
            plugin = plugin.with_dry_groups(groups);
        }
        if let Some(groups) = config.intensity_groups {
            plugin = plugin.with_intensity_groups(groups);
        }
        Ok(plugin)
    }
}

impl<L: CodeLookup> ModalFromGroupings<L> {
    /// Build with default parameters and no intensity consolidation.
    ///
    /// An empty `wet_groups` falls back to plain modal selection for wet
    /// points. Every wet code must have a dry cloud equivalent.
    pub fn new(lookup: L, categories: BroadCategories, wet_groups: GroupDefinitionSet) -> Result<Self> {
        for &wet in categories.wet_codes() {
            match lookup.cloud_equivalent(wet) {
                Some(cloud) if categories.is_dry(cloud) => {}
                _ => return Err(ModalError::MissingCloudEquivalent(wet)),
            }
        }

        let defaults = ModalParams::default();
        Ok(Self {
            lookup,
            categories,
            wet_groups: non_empty(wet_groups),
            dry_groups: None,
            intensity_groups: None,
            wet_bias: defaults.wet_bias,
            weighting: DiurnalWeighting::new(
                defaults.day_weighting,
                defaults.day_start,
                defaults.day_end,
                defaults.day_length,
            )?,
        })
    }

    pub fn with_params(mut self, params: &ModalParams) -> Result<Self> {
        if !params.wet_bias.is_finite() || params.wet_bias < 0.0 {
            return Err(ModalError::InvalidParameter(format!(
                "wet_bias must be a non-negative number, got {}",
                params.wet_bias
            )));
        }
        self.wet_bias = params.wet_bias;
        self.weighting = DiurnalWeighting::new(
            params.day_weighting,
            params.day_start,
            params.day_end,
            params.day_length,
        )?;
        Ok(self)
    }

    pub fn with_dry_groups(mut self, groups: GroupDefinitionSet) -> Self {
        self.dry_groups = non_empty(groups);
        self
    }

    /// Merge intensity variants (e.g. light and heavy snow showers) before
    /// selection. The emitted code is still the heaviest single variant.
    pub fn with_intensity_groups(mut self, groups: GroupDefinitionSet) -> Self {
        self.intensity_groups = non_empty(groups);
        self
    }

    pub fn lookup(&self) -> &L {
        &self.lookup
    }

    pub fn categories(&self) -> &BroadCategories {
        &self.categories
    }

    /// One canonical code per point, in input order.
    ///
    /// Periods are checked across the whole batch before any point is
    /// summarised. Any failure fails the batch; no partial result is returned.
    pub fn process(&self, batch: &[TimeSeries]) -> Result<Vec<Code>> {
        let period = common_period(batch)?;
        tracing::debug!(
            points = batch.len(),
            period_secs = period.map(|p| p.num_seconds()),
            parallel = cfg!(feature = "threading"),
            "summarising batch"
        );

        map_points(batch, |i, s| self.summarise_point(i, s))
    }

    /// Summarise a single series on its own.
    pub fn summarise(&self, series: &TimeSeries) -> Result<Code> {
        self.summarise_point(0, series)
    }

    fn summarise_point(&self, point: usize, series: &TimeSeries) -> Result<Code> {
        if series.is_empty() {
            return Err(ModalError::EmptySeries { point });
        }

        let tallies = build_tallies(series, &self.lookup, &self.categories, &self.weighting)?;
        let category = classify(&tallies.raw, &self.categories, self.wet_bias)?;

        // Wet selection sees only observed wet codes; dry selection sees the
        // cloud cover folded out of wet codes as well.
        let (pool, groups) = match category {
            BroadCategory::Wet => (
                tallies.raw.filtered(|c| self.categories.is_wet(c)),
                self.wet_groups.as_ref(),
            ),
            BroadCategory::Dry => (
                tallies.folded.filtered(|c| self.categories.is_dry(c)),
                self.dry_groups.as_ref(),
            ),
        };
        let pool = match &self.intensity_groups {
            Some(intensity) => merge_variants(&pool, intensity),
            None => pool,
        };

        let code = match groups {
            Some(groups) => pick(&pool, groups).map(|p| {
                tracing::trace!(
                    point,
                    ?category,
                    group = p.group.map(|g| g.name.as_str()),
                    weight = p.weight,
                    code = p.code,
                    "group selected"
                );
                p.code
            }),
            None => select_mode(&pool),
        };

        code.ok_or(ModalError::EmptySeries { point })
    }
}

#[cfg(feature = "threading")]
fn map_points<F>(batch: &[TimeSeries], f: F) -> Result<Vec<Code>>
where
    F: Fn(usize, &TimeSeries) -> Result<Code> + Sync + Send,
{
    use rayon::prelude::*;
    batch.par_iter().enumerate().map(|(i, s)| f(i, s)).collect()
}

#[cfg(not(feature = "threading"))]
fn map_points<F>(batch: &[TimeSeries], f: F) -> Result<Vec<Code>>
where
    F: Fn(usize, &TimeSeries) -> Result<Code>,
{
    batch.iter().enumerate().map(|(i, s)| f(i, s)).collect()
}

fn non_empty(groups: GroupDefinitionSet) -> Option<GroupDefinitionSet> {
    (!groups.is_empty()).then_some(groups)
}

// ── Unit tests ────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::presets::{uk_broad_categories, uk_config, uk_intensity_groups, uk_tree, uk_wet_groups};
    use chrono::{TimeDelta, TimeZone, Utc};

    fn series(codes: &[Code], interval_hours: i64) -> TimeSeries {
        let start = Utc.with_ymd_and_hms(2020, 6, 15, 9, 0, 0).unwrap();
        TimeSeries::regular(start, TimeDelta::hours(interval_hours), codes)
    }

    fn batch(points: &[&[Code]], interval_hours: i64) -> Vec<TimeSeries> {
        points.iter().map(|p| series(p, interval_hours)).collect()
    }

    fn plugin() -> ModalFromGroupings {
        ModalFromGroupings::new(uk_tree(), uk_broad_categories(), uk_wet_groups()).unwrap()
    }

    fn params(wet_bias: f64, day_weighting: f64, day_start: u32, day_end: u32, day_length: u32) -> ModalParams {
        ModalParams { wet_bias, day_weighting, day_start, day_end, day_length }
    }

    fn run(p: &ModalFromGroupings, points: &[&[Code]]) -> Vec<Code> {
        p.process(&batch(points, 1)).unwrap()
    }

    // ── Basic selection ──────────────────────────────────────────────────────

    #[test]
    fn expected_values() {
        let cases: &[(&[Code], Code, &str)] = &[
            (&[1, 1, 1, 15], 1, "minority rain, sun wins"),
            (&[1, 21], 21, "even split resolves wet"),
            (&[16], 17, "single night code reported in day form"),
            (&[1, 1, 10, 10, 9], 10, "night shower joins day shower"),
            (&[1, 3, 4, 5, 6, 7, 8, 10, 11, 12, 14, 15], 8, "dry majority, overcast via folding"),
            (&[1, 3, 4, 5, 6, 7, 8, 16, 11, 12, 14, 15], 8, "dry majority with night sleet"),
            (&[5, 5, 5, 5, 6, 6, 6, 6, 8, 8, 8, 8, 7, 7, 7, 7], 8, "four-way dry tie"),
            (&[1, 3, 4, 5, 7, 8, 10, 17, 20, 23], 3, "showers fold to partly cloudy"),
            (&[1, 3, 4, 5, 10, 17, 20, 23], 23, "frozen group, member order"),
            (&[1, 3, 4, 5], 5, "all dry, highest code"),
            (&[29, 29, 26, 26], 29, "extreme convection beats frozen"),
            (&[10, 10, 26, 26], 26, "frozen beats liquid"),
            (&[2, 2, 2, 0, 0, 2, 10, 10, 11, 12, 13], 3, "partly cloudy night canonicalised"),
            (&[0, 0, 0, 2, 2, 0, 10, 10, 11, 12, 13], 3, "folding lifts partly cloudy"),
            (&[0, 0, 0, 2, 2, 2, 7, 7], 3, "tie between canonicalised night codes"),
            (&[1, 1, 1, 2, 2, 9], 3, "night shower folds to partly cloudy"),
            (&[1, 1, 1, 8, 12, 12], 8, "light rain folds to overcast"),
            (&[1, 3, 4, 5, 7, 11], 8, "drizzle folds to overcast"),
        ];
        let p = plugin();
        for &(data, expected, what) in cases {
            assert_eq!(run(&p, &[data]), vec![expected], "{what}: {data:?}");
        }
    }

    #[test]
    fn multiple_points_summarised_independently() {
        let p = plugin();
        assert_eq!(run(&p, &[&[3, 3, 3, 4, 5, 5], &[3, 3, 4, 4, 4, 5]]), vec![3, 4]);
        assert_eq!(
            run(
                &p,
                &[
                    &[3, 3, 3, 4, 5, 5],
                    &[3, 3, 4, 4, 4, 5],
                    &[1, 1, 3, 3, 5, 6],
                    &[6, 6, 6, 7, 7, 7],
                ]
            ),
            vec![3, 4, 3, 7]
        );
    }

    /// Concatenating batches gives each point the answer it gets alone.
    #[test]
    fn points_do_not_interact() {
        let p = plugin();
        let a: &[&[Code]] = &[&[1, 1, 1, 15], &[29, 29, 26, 26]];
        let b: &[&[Code]] = &[&[0, 0, 0, 2, 2, 2, 7, 7], &[1, 21]];
        let mut joined = a.to_vec();
        joined.extend_from_slice(b);

        let mut separate = run(&p, a);
        separate.extend(run(&p, b));
        assert_eq!(run(&p, &joined), separate);
    }

    #[test]
    fn repeated_runs_are_identical() {
        let p = plugin().with_intensity_groups(uk_intensity_groups());
        let data: &[&[Code]] = &[&[6, 6, 12, 12, 3, 1, 1, 5], &[23, 23, 26, 26, 17, 17, 17, 17]];
        let first = run(&p, data);
        for _ in 0..5 {
            assert_eq!(run(&p, data), first);
        }
    }

    /// One wet step moves the dry winner by exactly its own weight.
    #[test]
    fn cloud_equivalent_changes_dry_winner() {
        let p = plugin();
        assert_eq!(run(&p, &[&[1, 1, 1, 8, 8]]), vec![1]);
        assert_eq!(run(&p, &[&[1, 1, 1, 8, 8, 12]]), vec![8]);
    }

    // ── Wet bias ─────────────────────────────────────────────────────────────

    #[test]
    fn expected_values_wet_bias() {
        // (data, wet_bias, expected, reverse members, reverse group order)
        let cases: &[(&[Code], f64, Code, bool, bool)] = &[
            (&[1, 3, 4, 5, 7, 8, 10, 10, 10, 10], 2.0, 10, false, false),
            (&[1, 3, 4, 5, 7, 8, 8, 10, 10, 10], 1.0, 3, false, false),
            (&[1, 3, 4, 5, 7, 8, 8, 10, 10, 10], 2.0, 3, false, false),
            (&[1, 3, 4, 5, 7, 8, 8, 10, 10, 10], 3.0, 10, false, false),
            (&[7, 7, 7, 1, 3, 10, 10], 2.0, 7, false, false),
            (&[1, 3, 4, 5, 7, 8, 10, 10, 14, 14], 2.0, 14, false, false),
            (&[1, 3, 4, 5, 7, 8, 10, 10, 14, 14], 2.0, 10, true, false),
            (&[1, 3, 4, 5, 7, 8, 10, 10, 18, 18], 2.0, 18, true, false),
            (&[1, 3, 4, 5, 7, 8, 10, 10, 18, 18], 2.0, 10, true, true),
            (&[1, 3, 4, 7, 7, 9], 3.0, 7, false, false),
        ];
        for &(data, wet_bias, expected, rev_members, rev_order) in cases {
            let mut groups = uk_wet_groups();
            if rev_members {
                groups = groups.with_reversed_members();
            }
            if rev_order {
                groups = groups.with_reversed_priority();
            }
            let p = ModalFromGroupings::new(uk_tree(), uk_broad_categories(), groups)
                .unwrap()
                .with_params(&ModalParams { wet_bias, ..ModalParams::default() })
                .unwrap();
            assert_eq!(
                run(&p, &[data]),
                vec![expected],
                "bias {wet_bias}, reversed members {rev_members}, reversed order {rev_order}: {data:?}"
            );
        }
    }

    #[test]
    fn wet_bias_per_point() {
        let p = plugin()
            .with_params(&ModalParams { wet_bias: 2.0, ..ModalParams::default() })
            .unwrap();
        let out = run(&p, &[&[1, 3, 4, 5, 7, 8, 10, 1, 1, 1], &[1, 3, 4, 5, 7, 8, 10, 10, 10, 10]]);
        assert_eq!(out, vec![1, 10]);
    }

    #[test]
    fn negative_wet_bias_rejected() {
        let err = plugin()
            .with_params(&ModalParams { wet_bias: -0.5, ..ModalParams::default() })
            .unwrap_err();
        assert!(matches!(err, ModalError::InvalidParameter(_)));
    }

    // ── Day weighting ────────────────────────────────────────────────────────

    #[test]
    fn expected_values_day_weighting() {
        // (points, interval h, weighting, start, end, length, expected)
        let cases: &[(&[&[Code]], i64, f64, u32, u32, u32, &[Code])] = &[
            (&[&[10, 10, 10, 10, 10, 1, 1, 1, 1]], 1, 1.0, 0, 9, 24, &[10]),
            (&[&[10, 10, 10, 10, 1, 1, 1, 1, 1]], 1, 2.0, 3, 5, 9, &[1]),
            (&[&[1, 1, 1, 10, 8, 1, 3, 3, 3]], 1, 2.0, 3, 5, 9, &[3]),
            (&[&[10, 10, 10, 10, 10, 1, 1, 1, 1]], 1, 2.0, 4, 7, 9, &[10]),
            (&[&[10, 10, 10, 10, 1, 1, 1, 1, 1]], 1, 2.0, 9, 15, 24, &[1]),
            (&[&[10, 10, 10, 10, 10, 1, 1, 1, 1]], 1, 2.0, 4, 7, 24, &[10]),
            (&[&[10, 10, 10, 10, 10, 1, 1, 1, 1]], 1, 3.0, 4, 7, 9, &[1]),
            (
                &[&[1, 1, 1, 1, 1, 1, 1, 1, 1], &[10, 10, 10, 10, 10, 1, 1, 1, 1]],
                1, 3.0, 4, 7, 9, &[1, 1],
            ),
            (
                &[&[1, 1, 1, 1, 10, 1, 1, 1, 1], &[1, 1, 10, 10, 10, 1, 1, 1, 1]],
                1, 3.0, 2, 5, 9, &[1, 10],
            ),
            // Three-hourly steps: hours 6, 9, 12 and 15 fall in the window.
            (&[&[0, 0, 1, 3, 3, 10, 12, 12]], 3, 2.0, 6, 18, 24, &[3]),
        ];
        for &(points, interval, w, start, end, length, expected) in cases {
            let p = plugin().with_params(&params(1.0, w, start, end, length)).unwrap();
            let out = p.process(&batch(points, interval)).unwrap();
            assert_eq!(out, expected, "weighting {w} over [{start}, {end}) of {length}h: {points:?}");
        }
    }

    /// An empty window gives the same answer as no weighting at all.
    #[test]
    fn empty_day_window_is_a_no_op() {
        let data: &[&[Code]] = &[&[17, 17, 17, 17, 26, 23, 23, 23], &[10, 10, 10, 10, 1, 1, 1, 1, 1]];
        let baseline = run(&plugin().with_params(&params(1.0, 1.0, 0, 12, 8)).unwrap(), data);
        for w in [0.0, 2.0, 10.0, 1000.0] {
            let p = plugin().with_params(&params(1.0, w, 3, 3, 8)).unwrap();
            assert_eq!(run(&p, data), baseline, "weighting {w}");
        }
    }

    // ── Intensity consolidation ──────────────────────────────────────────────

    #[test]
    fn expected_values_ignore_intensity() {
        // (data, consolidate intensity, expected, reverse intensity members)
        let cases: &[(&[Code], bool, Code, bool)] = &[
            (&[1, 1, 1, 7, 12, 12], true, 8, false),
            (&[1, 1, 10, 14, 8, 8, 8], true, 3, false),
            (&[1, 1, 1, 3, 3, 8, 8, 8, 8], true, 1, false),
            (&[23, 23, 23, 26, 17, 17, 17, 17], false, 17, false),
            (&[23, 23, 23, 26, 17, 17, 17, 17], true, 23, false),
            (&[23, 23, 26, 26, 17, 17, 17, 17], true, 26, false),
            (&[23, 23, 26, 26, 17, 17, 17, 17], true, 23, true),
            (&[11, 11, 11, 11, 11, 11, 11, 11], true, 11, false),
            (&[5, 5, 6, 6, 1, 1, 1], true, 5, false),
            (&[5, 5, 6, 6, 1, 1, 1], true, 6, true),
        ];
        for &(data, consolidate, expected, reverse) in cases {
            let mut p = plugin();
            if consolidate {
                let groups = uk_intensity_groups();
                p = p.with_intensity_groups(if reverse { groups.with_reversed_members() } else { groups });
            }
            assert_eq!(
                run(&p, &[data]),
                vec![expected],
                "intensity {consolidate}, reversed {reverse}: {data:?}"
            );
        }
    }

    #[test]
    fn intensity_consolidation_per_point() {
        let p = plugin().with_intensity_groups(uk_intensity_groups());
        let out = run(&p, &[&[1, 1, 1, 1, 1, 1, 1, 1], &[23, 23, 26, 26, 17, 17, 17, 17]]);
        assert_eq!(out, vec![1, 26]);
    }

    // ── Interactions ─────────────────────────────────────────────────────────

    #[test]
    fn expected_values_interactions() {
        // (points, bias, weighting, start, end, length, intensity, expected)
        let cases: &[(&[&[Code]], f64, f64, u32, u32, u32, bool, &[Code])] = &[
            (&[&[17, 17, 17, 17, 26, 23, 23, 23]], 1.0, 1.0, 0, 12, 8, false, &[17]),
            (&[&[17, 17, 17, 17, 26, 23, 23, 23]], 1.0, 10.0, 3, 3, 8, false, &[17]),
            (&[&[17, 17, 17, 17, 26, 23, 23, 23]], 1.0, 10.0, 4, 5, 8, false, &[26]),
            (&[&[1, 1, 1, 1, 1, 17, 17, 17]], 2.0, 2.0, 4, 7, 8, false, &[17]),
            (&[&[10, 11, 12, 15, 15, 12, 12, 10, 3, 3, 3]], 1.0, 2.0, 0, 5, 11, false, &[15]),
            (&[&[10, 11, 12, 15, 15, 12, 12, 10, 3, 3, 3]], 1.0, 2.0, 0, 5, 11, true, &[15]),
            (&[&[17, 17, 17, 17, 26, 23, 23, 23]], 2.0, 2.0, 0, 8, 8, true, &[23]),
            (
                &[&[17, 17, 17, 17, 26, 26, 23, 23], &[17, 17, 17, 17, 26, 23, 23, 23]],
                2.0, 2.0, 0, 8, 8, true, &[26, 23],
            ),
            (&[&[1, 1, 12, 12, 8, 1, 1, 1]], 1.0, 2.0, 2, 6, 8, true, &[8]),
            (&[&[6, 6, 12, 12, 3, 1, 1, 5]], 1.0, 2.0, 2, 6, 8, true, &[1]),
            (&[&[6, 6, 12, 12, 3, 1, 1, 5]], 1.0, 2.0, 2, 6, 8, false, &[8]),
            (&[&[6, 6, 12, 12, 3, 1, 1, 5]], 2.0, 2.0, 2, 6, 8, true, &[12]),
        ];
        for &(points, bias, w, start, end, length, intensity, expected) in cases {
            let mut p = plugin().with_params(&params(bias, w, start, end, length)).unwrap();
            if intensity {
                p = p.with_intensity_groups(uk_intensity_groups());
            }
            assert_eq!(
                run(&p, points),
                expected,
                "bias {bias}, weighting {w} over [{start}, {end}) of {length}h, intensity {intensity}: {points:?}"
            );
        }
    }

    // ── Grouping fallbacks ───────────────────────────────────────────────────

    /// Without wet groups, wet points take the plain mode.
    #[test]
    fn no_wet_groups_uses_mode() {
        let data: &[Code] = &[29, 29, 30, 30, 26, 26, 26];
        // Grouped, extreme convection pools 4 against 3 heavy snow showers.
        assert_eq!(run(&plugin(), &[data]), vec![30]);

        let ungrouped =
            ModalFromGroupings::new(uk_tree(), uk_broad_categories(), GroupDefinitionSet::default())
                .unwrap();
        assert_eq!(run(&ungrouped, &[data]), vec![26]);
        assert_eq!(run(&ungrouped, &[&[14, 14, 10, 10]]), vec![14]);
    }

    #[test]
    fn dry_groups_consolidate_dry_side() {
        let dry = GroupDefinitionSet::from_pairs([("low_vis", vec![6, 5]), ("cloud", vec![8, 7]), ("clear", vec![3, 1])]);
        let p = plugin().with_dry_groups(dry);
        // Cloud pools 7 + 8 = 4 against 3 sunny steps; overcast listed first.
        assert_eq!(run(&p, &[&[1, 1, 1, 7, 7, 8, 8]]), vec![8]);
        // Equal pools: low visibility declared first.
        assert_eq!(run(&p, &[&[5, 6, 7, 8]]), vec![6]);
    }

    // ── Configuration and errors ─────────────────────────────────────────────

    #[test]
    fn inconsistent_periods_fail_whole_batch() {
        let p = plugin();
        let mut b = batch(&[&[1, 1, 1, 15], &[1, 1, 1, 15]], 1);
        b[0].period = TimeDelta::minutes(30);
        let err = p.process(&b).unwrap_err();
        assert_eq!(err, ModalError::InconsistentPeriods);
        assert_eq!(err.to_string(), "Input diagnostics do not have consistent periods.");
    }

    #[test]
    fn unmapped_code_fails_whole_batch() {
        let p = plugin();
        let err = p.process(&batch(&[&[1, 1], &[1, 31]], 1)).unwrap_err();
        assert_eq!(err, ModalError::UnmappedCode(31));
    }

    #[test]
    fn empty_series_reports_point() {
        let p = plugin();
        let mut b = batch(&[&[1, 1], &[3]], 1);
        b[1].steps.clear();
        assert_eq!(p.process(&b), Err(ModalError::EmptySeries { point: 1 }));
        assert_eq!(p.process(&[]), Ok(vec![]));
    }

    #[test]
    fn wet_code_without_cloud_equivalent_rejected() {
        let cats = BroadCategories::new(vec![10, 99], vec![1, 3, 8]).unwrap();
        let err = ModalFromGroupings::new(uk_tree(), cats, uk_wet_groups()).unwrap_err();
        assert_eq!(err, ModalError::MissingCloudEquivalent(99));
    }

    #[test]
    fn summarise_single_series() {
        let p = plugin();
        assert_eq!(p.summarise(&series(&[16], 1)), Ok(17));
        assert_eq!(p.summarise(&series(&[2, 2, 0], 3)), Ok(3));
    }

    #[test]
    fn config_from_json_preserves_group_order() {
        let leaves = serde_json::to_string(&crate::presets::uk_leaves()).unwrap();
        // Literal text: a `serde_json::Value` object would sort the group keys.
        let json = format!(
            r#"{{
                "decision_tree": {leaves},
                "broad_categories": {{
                    "wet": [10, 11, 12, 14, 15, 17, 18, 20, 21, 23, 24, 26, 27, 29, 30],
                    "dry": [1, 3, 4, 5, 6, 7, 8]
                }},
                "wet_groups": {{
                    "liquid": [15, 14, 12, 11, 10],
                    "frozen": [27, 26, 24, 23, 18, 17],
                    "extreme_convection": [30, 29, 21, 20]
                }},
                "params": {{ "wet_bias": 2.0 }}
            }}"#
        );
        let config = ModalConfig::from_json(&json).unwrap();
        assert_eq!(config.params.day_length, 24);
        let p = ModalFromGroupings::from_config(config).unwrap();
        // Liquid declared first now wins the liquid/frozen tie.
        assert_eq!(run(&p, &[&[1, 3, 4, 5, 7, 8, 10, 10, 18, 18]]), vec![10]);
    }

    #[test]
    fn config_round_trips_through_json() {
        let mut config = uk_config();
        config.intensity_groups = Some(uk_intensity_groups());
        let json = serde_json::to_string(&config).unwrap();
        assert_eq!(ModalConfig::from_json(&json).unwrap(), config);
    }

    #[test]
    fn malformed_config_rejected() {
        let err = ModalConfig::from_json(r#"{"decision_tree": []}"#).unwrap_err();
        assert!(matches!(err, ModalError::InvalidConfig(_)));
    }
}
