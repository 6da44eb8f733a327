//! Choosing one code from a weighted tally.
//!
//! `category` splits wet from dry, `consolidate` reduces through ordered
//! groups, `mode` is the ungrouped fallback.

pub mod category;
pub mod consolidate;
pub mod groups;
pub mod mode;

pub use category::{classify, BroadCategories, BroadCategory};
pub use consolidate::{consolidate, merge_variants, pick, Pick};
pub use groups::{Group, GroupDefinitionSet};
pub use mode::select_mode;
