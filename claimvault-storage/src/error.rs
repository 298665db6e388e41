//! Storage error types.

use thiserror::Error;

/// Result type for claim persistence operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Errors that can occur in the claim store.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("database error: {0}")]
    Database(#[from] duckdb::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("claim not found: {0}")]
    NotFound(String),
}
