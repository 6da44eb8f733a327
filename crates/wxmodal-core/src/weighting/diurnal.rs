//! Day-period emphasis.
//!
//! Steps whose hour-of-cycle falls in `[day_start, day_end)` count
//! `day_weighting` times; every other step counts once. Hour-of-cycle is the
//! step's offset from the series origin, modulo `day_length`.

use chrono::TimeDelta;

use crate::error::{ModalError, Result};

const SECONDS_PER_HOUR: f64 = 3600.0;

/// Multiplier applied to steps inside the configured day window.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DiurnalWeighting {
    pub day_weighting: f64,
    pub day_start: u32,
    pub day_end: u32,
    /// Hours in one diurnal cycle.
    pub day_length: u32,
}

impl DiurnalWeighting {
    pub fn new(day_weighting: f64, day_start: u32, day_end: u32, day_length: u32) -> Result<Self> {
        if !day_weighting.is_finite() || day_weighting < 0.0 {
            return Err(ModalError::InvalidParameter(format!(
                "day_weighting must be a non-negative number, got {day_weighting}"
            )));
        }
        if day_length == 0 {
            return Err(ModalError::InvalidParameter(
                "day_length must be at least one hour".to_string(),
            ));
        }
        Ok(Self { day_weighting, day_start, day_end, day_length })
    }

    /// No emphasis at all: every step weighs 1.
    pub fn uniform() -> Self {
        Self { day_weighting: 1.0, day_start: 0, day_end: 0, day_length: 24 }
    }

    /// Hour of the diurnal cycle for a step `offset` after the series origin.
    pub fn hour_of_cycle(&self, offset: TimeDelta) -> f64 {
        let hours = offset.num_seconds() as f64 / SECONDS_PER_HOUR;
        hours.rem_euclid(self.day_length as f64)
    }

    /// Weight for a step `offset` after the series origin.
    pub fn multiplier(&self, offset: TimeDelta) -> f64 {
        // An empty window switches the feature off whatever the weighting.
        if self.day_start == self.day_end {
            return 1.0;
        }
        let hour = self.hour_of_cycle(offset);
        if self.day_start as f64 <= hour && hour < self.day_end as f64 {
            self.day_weighting
        } else {
            1.0
        }
    }
}

impl Default for DiurnalWeighting {
    fn default() -> Self {
        Self::uniform()
    }
}
