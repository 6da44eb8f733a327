//! Per-point categorical time series.
//!
//! A batch is a slice of `TimeSeries`, one per spatial point, in output order.
//! Every series in a batch must describe steps of the same duration.

use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{ModalError, Result};

/// A weather code. Opaque to the summary: its meaning comes entirely from the
/// decision tree and the broad category mapping.
pub type Code = u8;

/// One time step: the validity time and the code forecast for it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Step {
    pub time: DateTime<Utc>,
    pub code: Code,
}

/// Ordered codes for one spatial point.
#[derive(Debug, Clone, PartialEq)]
pub struct TimeSeries {
    /// Duration each step represents (the width of its time bounds).
    pub period: TimeDelta,
    /// Steps in time order. The first step is the series origin.
    pub steps: Vec<Step>,
}

impl TimeSeries {
    pub fn new(period: TimeDelta, steps: Vec<Step>) -> Self {
        Self { period, steps }
    }

    /// Build a regularly spaced series starting at `start`, one step per
    /// `period`.
    pub fn regular(start: DateTime<Utc>, period: TimeDelta, codes: &[Code]) -> Self {
        let mut time = start;
        let steps = codes
            .iter()
            .map(|&code| {
                let step = Step { time, code };
                time += period;
                step
            })
            .collect();
        Self { period, steps }
    }

    /// Time of the first step, from which diurnal offsets are measured.
    pub fn origin(&self) -> Option<DateTime<Utc>> {
        self.steps.first().map(|s| s.time)
    }

    /// Iterate `(offset from origin, code)` pairs.
    pub fn offsets(&self) -> impl Iterator<Item = (TimeDelta, Code)> + '_ {
        let origin = self.origin();
        self.steps.iter().map(move |s| {
            let offset = origin.map_or(TimeDelta::zero(), |o| s.time - o);
            (offset, s.code)
        })
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}

/// Return the period shared by every series in the batch.
///
/// Returns `Ok(None)` for an empty batch. Any disagreement is fatal for the
/// whole batch.
pub fn common_period(batch: &[TimeSeries]) -> Result<Option<TimeDelta>> {
    let Some(first) = batch.first() else {
        return Ok(None);
    };
    if batch.iter().any(|s| s.period != first.period) {
        return Err(ModalError::InconsistentPeriods);
    }
    Ok(Some(first.period))
}
