//! Core error types for Wayfarer.

use thiserror::Error;

/// Core error type for Wayfarer operations.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Invalid caller input. Never retried; surfaced immediately.
    #[error("Validation error: {0}")]
    Validation(String),

    /// Invalid data in a static dataset or normalized payload.
    #[error("Invalid data: {0}")]
    InvalidData(String),

    /// Serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Generic error with message.
    #[error("{0}")]
    Other(String),
}
