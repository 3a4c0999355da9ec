use thiserror::Error;

/// Errors raised while building or validating core data structures.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum CoreError {
    /// Element kind is unsupported and could not be converted to the fallback kind
    #[error("type error: {0}")]
    Type(String),

    /// Inconsistent dimensions (ragged rows, buffer length, mismatched operands)
    #[error("shape error: {0}")]
    Shape(String),

    /// Malformed partition or permutation
    #[error("validation error: {0}")]
    Validation(String),
}

pub type CoreResult<T> = Result<T, CoreError>;
