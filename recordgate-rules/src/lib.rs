//! Validation rule sets for recordgate.
//!
//! This crate owns the declarative side of record validation:
//! - [`RuleDefinition`]: one field's rules as written by the model author
//!   (`"required|unique"` or `["required", "unique"]`)
//! - [`RuleSet`]: the normalized form, field name to ordered rule tokens
//! - [`RuleToken`]: a single parsed token (`unique:users,email`)
//! - [`exclude_self`]: rewrites `unique` tokens so an update does not
//!   collide with the row being updated
//!
//! Evaluating rules against data is the job of a rule engine supplied by the
//! caller; nothing here interprets a constraint beyond `unique`.

mod ruleset;
mod token;
mod unique;

pub use ruleset::{RuleDefinition, RuleDefinitions, RuleSet, normalize};
pub use token::{LIST_SEPARATOR, PARAM_SEPARATOR, RULE_SEPARATOR, RuleToken};
pub use unique::{DEFAULT_PRIMARY_KEY, ExclusionTarget, NULL_KEY, UNIQUE, exclude_self};

/// Result type alias using the crate's error type.
pub type RuleResult<T> = std::result::Result<T, RuleError>;

/// Errors that can occur while reading rule declarations.
#[derive(Debug, thiserror::Error)]
pub enum RuleError {
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("empty rule token")]
    EmptyToken,

    #[error("rule token has no constraint name: {0}")]
    MissingName(String),
}
