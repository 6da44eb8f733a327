//! Wet/dry classification of codes and of whole points.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::{ModalError, Result};
use crate::series::Code;
use crate::weighting::WeightedTally;

/// Top-level split of weather codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BroadCategory {
    Wet,
    Dry,
}

/// Serialised shape of the mapping: `{"wet": [...], "dry": [...]}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct CategoryLists {
    wet: Vec<Code>,
    dry: Vec<Code>,
}

/// Total mapping from canonical codes to [`BroadCategory`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "CategoryLists", into = "CategoryLists")]
pub struct BroadCategories {
    wet: Vec<Code>,
    dry: Vec<Code>,
    lookup: HashMap<Code, BroadCategory>,
}

impl BroadCategories {
    pub fn new(wet: Vec<Code>, dry: Vec<Code>) -> Result<Self> {
        let mut lookup = HashMap::with_capacity(wet.len() + dry.len());
        for &c in &wet {
            lookup.insert(c, BroadCategory::Wet);
        }
        for &c in &dry {
            if lookup.insert(c, BroadCategory::Dry) == Some(BroadCategory::Wet) {
                return Err(ModalError::ConflictingCategory(c));
            }
        }
        Ok(Self { wet, dry, lookup })
    }

    pub fn category_of(&self, code: Code) -> Result<BroadCategory> {
        self.lookup
            .get(&code)
            .copied()
            .ok_or(ModalError::UnmappedCode(code))
    }

    pub fn is_wet(&self, code: Code) -> bool {
        self.lookup.get(&code) == Some(&BroadCategory::Wet)
    }

    pub fn is_dry(&self, code: Code) -> bool {
        self.lookup.get(&code) == Some(&BroadCategory::Dry)
    }

    pub fn wet_codes(&self) -> &[Code] {
        &self.wet
    }

    pub fn dry_codes(&self) -> &[Code] {
        &self.dry
    }
}

impl TryFrom<CategoryLists> for BroadCategories {
    type Error = ModalError;

    fn try_from(lists: CategoryLists) -> Result<Self> {
        Self::new(lists.wet, lists.dry)
    }
}

impl From<BroadCategories> for CategoryLists {
    fn from(c: BroadCategories) -> Self {
        Self { wet: c.wet, dry: c.dry }
    }
}

/// Decide a point's overall category from its unfolded tally.
///
/// Wet wins when `wet_total >= grand_total / (1 + wet_bias)`. The comparison
/// is done multiplied out so that exact thresholds (e.g. 4 of 12 with a bias
/// of 2) are not lost to division rounding. A point with no wet code at all
/// is always dry.
pub fn classify(raw: &WeightedTally, categories: &BroadCategories, wet_bias: f64) -> Result<BroadCategory> {
    let mut wet_total = 0.0;
    let mut grand_total = 0.0;
    let mut any_wet = false;
    for (code, w) in raw.iter() {
        if categories.category_of(code)? == BroadCategory::Wet {
            wet_total += w;
            any_wet = true;
        }
        grand_total += w;
    }

    if any_wet && wet_total * (1.0 + wet_bias) >= grand_total {
        Ok(BroadCategory::Wet)
    } else {
        Ok(BroadCategory::Dry)
    }
}
