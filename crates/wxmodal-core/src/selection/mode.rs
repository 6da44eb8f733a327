//! Plain modal selection for tallies with no grouping configured.
//! Ties go to the highest code, the more significant weather.

use crate::series::Code;
use crate::weighting::WeightedTally;

/// Code with the largest weight; the highest code on ties.
pub fn select_mode(tally: &WeightedTally) -> Option<Code> {
    let mut best: Option<(Code, f64)> = None;
    // Ascending iteration, so `>=` lets later (higher) codes take ties.
    for (code, w) in tally.iter() {
        if best.map_or(true, |(_, bw)| w >= bw) {
            best = Some((code, w));
        }
    }
    best.map(|(c, _)| c)
}
