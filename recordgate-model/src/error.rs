//! Error types for the record model.

use recordgate_crypto::HashError;
use thiserror::Error;

use crate::ErrorCollection;

/// Result type for record operations.
pub type ModelResult<T> = Result<T, ModelError>;

/// Errors that can occur in record operations.
///
/// Ordinary validation failure is not an error: `save` and `is_valid`
/// report it as `Ok(false)`. Only `save_or_fail` turns it into
/// [`ModelError::Validation`].
#[derive(Debug, Error)]
pub enum ModelError {
    /// No rules were supplied and the record type declares none.
    #[error("missing validation rules")]
    MissingRules,

    /// The primary-key value cannot be written into a rule token.
    #[error("primary key value cannot be used in a rule: {0}")]
    UnrenderableKey(String),

    /// Validation rejected the record.
    #[error(transparent)]
    Validation(#[from] ValidationException),

    /// Hashing a password attribute failed.
    #[error("password hashing failed: {0}")]
    Hash(#[from] HashError),

    /// Schema configuration could not be parsed.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// A validation rejection carrying both a message and the errors behind it.
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct ValidationException {
    message: String,
    errors: ErrorCollection,
}

impl ValidationException {
    pub fn new(message: impl Into<String>, errors: ErrorCollection) -> Self {
        Self {
            message: message.into(),
            errors,
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn errors(&self) -> &ErrorCollection {
        &self.errors
    }

    pub fn into_errors(self) -> ErrorCollection {
        self.errors
    }
}
