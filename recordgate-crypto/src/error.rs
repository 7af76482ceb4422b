//! Error types for the hashing layer.

use thiserror::Error;

/// Result type for hashing operations.
pub type HashResult<T> = Result<T, HashError>;

/// Errors that can occur while hashing or verifying passwords.
#[derive(Debug, Error)]
pub enum HashError {
    /// Cost parameters were rejected by the algorithm.
    #[error("invalid hash parameters: {0}")]
    InvalidParams(String),

    /// Hashing failed.
    #[error("hashing failed: {0}")]
    Hashing(String),

    /// The stored hash is not a valid PHC string.
    #[error("malformed hash: {0}")]
    MalformedHash(String),

    /// Verification failed for a reason other than a wrong password.
    #[error("verification failed: {0}")]
    Verification(String),
}
