//! Error types for the persistence layer.

use thiserror::Error;

/// Result type for persistence operations.
pub type PersistResult<T> = Result<T, PersistError>;

/// Errors that can occur in persistence operations.
#[derive(Debug, Error)]
pub enum PersistError {
    /// The storage backend rejected an operation.
    #[error("storage backend error: {0}")]
    Backend(String),

    /// Payload (de)serialization failed.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
