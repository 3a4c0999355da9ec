//! Error taxonomy shared by the engines.

use simscale_core::CoreError;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum SimScaleError {
    /// Invalid metric, aggregation, block size or parallelism, raised before computing
    #[error("configuration error: {0}")]
    Config(String),

    /// Malformed partition or permutation, or an out-of-range index
    #[error("validation error: {0}")]
    Validation(String),

    /// Unsupported element type that could not be converted
    #[error("type error: {0}")]
    Type(String),

    /// Mismatched dimensions
    #[error("shape error: {0}")]
    Shape(String),

    /// Failure reported by a caller-supplied metric or aggregation
    #[error("computation failed: {0}")]
    Compute(String),
}

impl From<CoreError> for SimScaleError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Type(msg) => SimScaleError::Type(msg),
            CoreError::Shape(msg) => SimScaleError::Shape(msg),
            CoreError::Validation(msg) => SimScaleError::Validation(msg),
        }
    }
}

pub type SimResult<T> = Result<T, SimScaleError>;
