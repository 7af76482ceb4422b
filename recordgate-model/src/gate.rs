//! The write lifecycle: validate, purge, hash, then hand off to storage.
//!
//! Each step is callable on its own. [`Record::save`] chains them:
//!
//! 1. [`Record::check_insert`] or [`Record::check_update`] validates; a
//!    failure stops here and storage is never called
//! 2. [`Record::prepare_attributes`] purges and hashes
//! 3. [`Persistence::insert`] or [`Persistence::update`] writes

use serde_json::Value;
use tracing::{debug, warn};

use crate::password::hash_password_attributes;
use crate::{Attributes, ErrorCollection, ModelResult, Persistence, Record, ValidationException};

const VALIDATION_FAILED: &str = "validation failed";

/// Which write a save turns into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteKind {
    Insert,
    Update,
}

/// Result of the validation step that guards a write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GateOutcome {
    pub kind: WriteKind,
    pub passed: bool,
    /// The record's errors after validation, including any accumulated
    /// from earlier runs.
    pub errors: ErrorCollection,
}

impl GateOutcome {
    /// Converts a failed outcome into a [`ValidationException`].
    pub fn into_result(self) -> Result<(), ValidationException> {
        if self.passed {
            Ok(())
        } else {
            Err(ValidationException::new(VALIDATION_FAILED, self.errors))
        }
    }
}

impl Record {
    /// The write a save would perform right now.
    pub fn write_kind(&self) -> WriteKind {
        if self.exists {
            WriteKind::Update
        } else {
            WriteKind::Insert
        }
    }

    /// Validates for an insert, using the schema's rules as declared.
    pub fn check_insert(&mut self) -> ModelResult<GateOutcome> {
        let passed = self.validate(None)?;
        Ok(self.outcome(WriteKind::Insert, passed))
    }

    /// Validates for an update, with `unique` rules excluding this record.
    pub fn check_update(&mut self) -> ModelResult<GateOutcome> {
        let rules = self.build_update_rules(None)?;
        let passed = self.validate(Some(&rules))?;
        Ok(self.outcome(WriteKind::Update, passed))
    }

    /// Runs the check matching [`Record::write_kind`].
    pub fn check(&mut self) -> ModelResult<GateOutcome> {
        match self.write_kind() {
            WriteKind::Insert => self.check_insert(),
            WriteKind::Update => self.check_update(),
        }
    }

    fn outcome(&self, kind: WriteKind, passed: bool) -> GateOutcome {
        GateOutcome {
            kind,
            passed,
            errors: self.errors.clone(),
        }
    }

    /// The attributes as they would be written: purged, then with changed
    /// password attributes hashed.
    pub fn prepare_attributes(&self) -> ModelResult<Attributes> {
        let schema = self.schema();
        let purged = schema.purge.purge(&self.attributes, &schema.primary_key);
        let hashed = hash_password_attributes(
            purged,
            &self.original,
            &schema.password_attributes,
            self.kind.hasher(),
        )?;
        Ok(hashed)
    }

    /// Validates and, if valid, writes the record.
    ///
    /// Returns `Ok(false)` when validation fails (see [`Record::errors`]) or
    /// when storage reports failure. Errors are reserved for missing rules
    /// and hashing failures.
    pub fn save(&mut self, store: &mut dyn Persistence) -> ModelResult<bool> {
        let outcome = self.check()?;
        if !outcome.passed {
            debug!(
                table = %self.schema().table,
                kind = ?outcome.kind,
                errors = outcome.errors.len(),
                "Validation failed; write aborted"
            );
            return Ok(false);
        }
        self.write(outcome.kind, store)
    }

    /// Like [`Record::save`], but a validation failure is returned as
    /// [`crate::ModelError::Validation`].
    pub fn save_or_fail(&mut self, store: &mut dyn Persistence) -> ModelResult<bool> {
        let outcome = self.check()?;
        let kind = outcome.kind;
        outcome.into_result()?;
        self.write(kind, store)
    }

    /// Writes the prepared attributes. The record adopts them only if
    /// storage accepts the write.
    fn write(&mut self, kind: WriteKind, store: &mut dyn Persistence) -> ModelResult<bool> {
        let mut prepared = self.prepare_attributes()?;

        let table = self.schema().table.clone();
        let written = match kind {
            WriteKind::Insert => store.insert(&table, &mut prepared),
            WriteKind::Update => {
                let (primary_key, key) = match self.key_attribute() {
                    Some((name, value)) => (name.to_string(), value.clone()),
                    None => (self.schema().primary_key.clone(), Value::Null),
                };
                store.update(&table, &primary_key, &key, &prepared)
            }
        };

        if written {
            self.attributes = prepared;
            self.exists = true;
            self.sync_original();
            debug!(table = %table, kind = ?kind, "Record written");
        } else {
            warn!(table = %table, kind = ?kind, "Storage rejected write");
        }
        Ok(written)
    }
}
