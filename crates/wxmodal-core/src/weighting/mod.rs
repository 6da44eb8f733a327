//! Turning a point's series into weighted evidence.

pub mod diurnal;
pub mod tally;

pub use diurnal::DiurnalWeighting;
pub use tally::{build_tallies, PointTallies, WeightedTally};
