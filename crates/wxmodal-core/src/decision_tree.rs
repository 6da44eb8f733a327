//! Weather-code lookup table derived from the symbol decision tree.
//!
//! Only the leaves matter here: each leaf names a day code, the night code
//! that renders the same phenomenon after dark (if any), and, for
//! precipitating codes, the dry code describing the cloud cover it implies.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::{ModalError, Result};
use crate::series::Code;

/// Day/night and cloud-equivalent lookups the summary needs from a tree.
///
/// Implementations must be pure: the same code always maps to the same answer.
/// One lookup is shared by every point of a batch, possibly across threads.
pub trait CodeLookup: Sync {
    /// Daytime rendering of `code`. Codes without a night variant map to
    /// themselves.
    fn day_form(&self, code: Code) -> Code;

    /// Dry code representing the cloud implied by a wet `code`.
    fn cloud_equivalent(&self, code: Code) -> Option<Code>;
}

/// A single leaf of the decision tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Leaf {
    /// Day (canonical) code of this leaf.
    pub code: Code,
    /// Night rendering of the same phenomenon.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub if_night: Option<Code>,
    /// Dry code carrying this leaf's cloud cover. Set for wet leaves only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cloud_equivalent: Option<Code>,
}

impl Leaf {
    pub fn new(code: Code) -> Self {
        Self { code, if_night: None, cloud_equivalent: None }
    }

    pub fn with_night(mut self, night: Code) -> Self {
        self.if_night = Some(night);
        self
    }

    pub fn with_cloud(mut self, cloud: Code) -> Self {
        self.cloud_equivalent = Some(cloud);
        self
    }
}

/// Table-backed [`CodeLookup`] built from decision-tree leaves.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Leaf>", into = "Vec<Leaf>")]
pub struct DecisionTree {
    leaves: Vec<Leaf>,
    night_to_day: HashMap<Code, Code>,
    cloud: HashMap<Code, Code>,
}

impl DecisionTree {
    /// Build and check a tree from its leaves.
    pub fn new(leaves: Vec<Leaf>) -> Result<Self> {
        let issues = check_leaves(&leaves);
        if !issues.is_empty() {
            return Err(ModalError::InvalidTree(issues.join("; ")));
        }

        let night_to_day = leaves
            .iter()
            .filter_map(|l| l.if_night.map(|n| (n, l.code)))
            .collect();
        let cloud = leaves
            .iter()
            .filter_map(|l| l.cloud_equivalent.map(|c| (l.code, c)))
            .collect();

        Ok(Self { leaves, night_to_day, cloud })
    }

    pub fn leaves(&self) -> &[Leaf] {
        &self.leaves
    }

    /// Every code the tree can emit, day and night forms included, ascending.
    pub fn codes(&self) -> Vec<Code> {
        let mut codes: Vec<Code> = self
            .leaves
            .iter()
            .flat_map(|l| std::iter::once(l.code).chain(l.if_night))
            .collect();
        codes.sort_unstable();
        codes
    }
}

impl CodeLookup for DecisionTree {
    fn day_form(&self, code: Code) -> Code {
        self.night_to_day.get(&code).copied().unwrap_or(code)
    }

    fn cloud_equivalent(&self, code: Code) -> Option<Code> {
        self.cloud.get(&code).copied()
    }
}

impl TryFrom<Vec<Leaf>> for DecisionTree {
    type Error = ModalError;

    fn try_from(leaves: Vec<Leaf>) -> Result<Self> {
        Self::new(leaves)
    }
}

impl From<DecisionTree> for Vec<Leaf> {
    fn from(tree: DecisionTree) -> Self {
        tree.leaves
    }
}

/// List every structural problem with a set of leaves. Empty means valid.
pub fn check_leaves(leaves: &[Leaf]) -> Vec<String> {
    let mut issues = Vec::new();
    let mut day_codes: HashMap<Code, usize> = HashMap::new();
    for l in leaves {
        *day_codes.entry(l.code).or_default() += 1;
    }

    for (&code, &n) in &day_codes {
        if n > 1 {
            issues.push(format!("leaf code {code} appears {n} times"));
        }
    }

    let mut night_owner: HashMap<Code, Code> = HashMap::new();
    for l in leaves {
        if let Some(night) = l.if_night {
            if night == l.code {
                issues.push(format!("leaf {} names itself as its night form", l.code));
            } else if day_codes.contains_key(&night) {
                issues.push(format!(
                    "night code {night} of leaf {} is also a day leaf",
                    l.code
                ));
            }
            if let Some(prev) = night_owner.insert(night, l.code) {
                issues.push(format!(
                    "night code {night} is claimed by leaves {prev} and {}",
                    l.code
                ));
            }
        }
        if let Some(cloud) = l.cloud_equivalent {
            if !day_codes.contains_key(&cloud) {
                issues.push(format!(
                    "cloud equivalent {cloud} of leaf {} is not a day leaf",
                    l.code
                ));
            }
        }
    }

    issues.sort();
    issues
}
