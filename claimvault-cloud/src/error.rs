//! Cloud storage error types.

use thiserror::Error;

/// Result type for object-store orchestration.
pub type CloudResult<T> = Result<T, CloudError>;

/// Errors that can occur while orchestrating claim payload storage.
///
/// Object-store I/O failures are converted to `bool`/`Option` results at
/// the writer/reader/store boundary; the variants here surface caller
/// misuse and upstream crypto/persistence failures.
#[derive(Debug, Error)]
pub enum CloudError {
    #[error("S3 operation failed: {0}")]
    S3(String),

    #[error("{0}")]
    InvalidArgument(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("crypto error: {0}")]
    Crypto(#[from] claimvault_crypto::CryptoError),

    #[error("storage error: {0}")]
    Storage(#[from] claimvault_storage::StorageError),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
