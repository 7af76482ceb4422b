//! The validation capability and the per-record wrapper around it.

use recordgate_rules::RuleSet;
use std::sync::Arc;
use tracing::warn;

use crate::{Attributes, ErrorCollection, ModelError, ModelResult};

/// Outcome of running a rule engine once.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationReport {
    pub passes: bool,
    pub errors: ErrorCollection,
}

impl ValidationReport {
    pub fn passed() -> Self {
        Self {
            passes: true,
            errors: ErrorCollection::new(),
        }
    }

    pub fn failed(errors: ErrorCollection) -> Self {
        Self {
            passes: false,
            errors,
        }
    }
}

/// A rule engine: given data and rules, decide pass or fail and explain why.
///
/// The engine owns the meaning of every constraint, including how a
/// rewritten `unique:<table>,<column>,<key>[,<keyColumn>]` rule looks up
/// existing rows.
pub trait RuleEngine: Send + Sync {
    fn validate(&self, data: &Attributes, rules: &RuleSet) -> ValidationReport;
}

/// Runs a [`RuleEngine`] with fallback default rules and remembers the
/// errors of the last run.
#[derive(Clone)]
pub struct Validator {
    engine: Arc<dyn RuleEngine>,
    default_rules: RuleSet,
    last_errors: Option<ErrorCollection>,
}

impl Validator {
    pub fn new(engine: Arc<dyn RuleEngine>) -> Self {
        Self {
            engine,
            default_rules: RuleSet::new(),
            last_errors: None,
        }
    }

    /// Rules used when a call supplies none.
    #[must_use]
    pub fn with_default_rules(mut self, rules: RuleSet) -> Self {
        self.default_rules = rules;
        self
    }

    /// Validates `data` against `rules`, or the default rules when `rules`
    /// is empty.
    ///
    /// Returns [`ModelError::MissingRules`] when both are empty.
    pub fn validate(&mut self, data: &Attributes, rules: &RuleSet) -> ModelResult<bool> {
        let rules = if rules.is_empty() {
            &self.default_rules
        } else {
            rules
        };

        if rules.is_empty() {
            warn!("Validation requested without any rules");
            return Err(ModelError::MissingRules);
        }

        let report = self.engine.validate(data, rules);
        self.last_errors = Some(report.errors);
        Ok(report.passes)
    }

    /// Errors from the most recent run, `None` before the first run.
    pub fn errors(&self) -> Option<&ErrorCollection> {
        self.last_errors.as_ref()
    }
}

impl std::fmt::Debug for Validator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Validator")
            .field("default_rules", &self.default_rules)
            .field("last_errors", &self.last_errors)
            .finish_non_exhaustive()
    }
}
