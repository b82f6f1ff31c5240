//! Error types for quantum models

use thiserror::Error;

/// Errors raised while building or transforming quantum objects
#[derive(Debug, Clone, PartialEq, Error)]
pub enum QuantumError {
    /// Structurally invalid input: zero dimensions, shape mismatches,
    /// matrices that are not density matrices or not unitary
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Accessor called with an index outside the valid range
    #[error("Index out of range: {0}")]
    OutOfRange(String),

    /// Numerical routine failed (eigensolver did not converge)
    #[error("Runtime failure: {0}")]
    RuntimeFailure(String),
}

impl QuantumError {
    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }

    pub fn out_of_range(msg: impl Into<String>) -> Self {
        Self::OutOfRange(msg.into())
    }

    pub fn runtime_failure(msg: impl Into<String>) -> Self {
        Self::RuntimeFailure(msg.into())
    }

    /// Whether this is an `InvalidArgument` error
    pub fn is_invalid_argument(&self) -> bool {
        matches!(self, Self::InvalidArgument(_))
    }

    /// Whether this is an `OutOfRange` error
    pub fn is_out_of_range(&self) -> bool {
        matches!(self, Self::OutOfRange(_))
    }
}

/// Result alias used throughout the crate
pub type Result<T> = std::result::Result<T, QuantumError>;
