//! Record model for recordgate.
//!
//! Adds three conveniences to persisted records:
//! - validation against a declarative [`RuleSet`] before every write, with
//!   `unique` rules rewritten on update so a record never collides with itself
//! - purging of attributes that must never reach storage (confirmation
//!   fields, form control fields, anything a [`PurgeChain`] rejects)
//! - one-way hashing of password attributes that changed since the last write
//!
//! The rule engine, the hashing primitive and the storage layer are supplied
//! by the caller through [`RuleEngine`], [`PasswordHasher`] and
//! [`Persistence`]. A [`RecordType`] binds a [`RecordSchema`] to the first two
//! and mints [`Record`]s.

mod error;
mod gate;
mod messages;
mod password;
mod persistence;
mod purge;
mod record;
mod schema;
mod validator;

pub use error::{ModelError, ModelResult, ValidationException};
pub use gate::{GateOutcome, WriteKind};
pub use messages::ErrorCollection;
pub use password::hash_password_attributes;
pub use persistence::Persistence;
pub use purge::{CONFIRMATION_SUFFIX, METHOD_FIELD, PurgeChain, PurgeFilter, TOKEN_FIELD};
pub use record::{Record, RecordType};
pub use schema::{DELETED_AT, ErrorMode, RecordSchema, RecordSchemaBuilder, SchemaConfig};
pub use validator::{RuleEngine, ValidationReport, Validator};

pub use recordgate_crypto::PasswordHasher;
pub use recordgate_rules::{RuleDefinition, RuleSet};

/// A record's attributes: attribute name to JSON value.
pub type Attributes = serde_json::Map<String, serde_json::Value>;
