//! Crypto error types.

use thiserror::Error;

/// Result type for envelope operations.
pub type CryptoResult<T> = Result<T, CryptoError>;

/// Errors that can occur while packaging or opening claim envelopes.
#[derive(Debug, Error)]
pub enum CryptoError {
    #[error("encryption failed: {0}")]
    Encryption(String),

    #[error("decryption failed: {0}")]
    Decryption(String),

    #[error("invalid claim: {0}")]
    InvalidClaim(String),

    #[error("invalid key length: expected {expected} bytes, got {actual}")]
    InvalidKeyLength { expected: usize, actual: usize },

    #[error("invalid key encoding: {0}")]
    InvalidKeyEncoding(String),

    #[error("none of the {tried} candidate keys could decrypt the envelope")]
    NoUsableKey { tried: usize },

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
