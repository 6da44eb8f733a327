use thiserror::Error;

use crate::series::Code;

/// Errors raised while configuring or running the modal summary.
///
/// Every variant is structural: re-running with the same inputs gives the
/// same error, so there is nothing to retry.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ModalError {
    /// Input series disagree on the duration each step represents.
    #[error("Input diagnostics do not have consistent periods.")]
    InconsistentPeriods,

    /// A canonical code is absent from the wet/dry mapping.
    #[error("Weather code {0} is not assigned to a broad category")]
    UnmappedCode(Code),

    /// A code is listed as both wet and dry.
    #[error("Weather code {0} is listed as both wet and dry")]
    ConflictingCategory(Code),

    /// A wet code has no dry cloud equivalent to fold into.
    #[error("Wet weather code {0} has no dry cloud equivalent")]
    MissingCloudEquivalent(Code),

    #[error("Invalid decision tree: {0}")]
    InvalidTree(String),

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Configuration document could not be parsed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// A point was supplied with no time steps.
    #[error("Point {point} has an empty time series")]
    EmptySeries { point: usize },
}

pub type Result<T> = std::result::Result<T, ModalError>;
