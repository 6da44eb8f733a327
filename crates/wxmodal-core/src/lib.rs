//! Period-representative weather codes.
//!
//! Reduces each spatial point's sequence of categorical weather codes to one
//! code summarising the whole period. Entry point: [`ModalFromGroupings`].

pub mod decision_tree;
pub mod error;
pub mod modal;
pub mod presets;
pub mod selection;
pub mod series;
pub mod weighting;

pub use decision_tree::{CodeLookup, DecisionTree, Leaf};
pub use error::{ModalError, Result};
pub use modal::{ModalConfig, ModalFromGroupings, ModalParams};
pub use selection::{BroadCategories, BroadCategory, Group, GroupDefinitionSet};
pub use series::{Code, Step, TimeSeries};
