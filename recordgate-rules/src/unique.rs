//! Uniqueness exclusion for update validation.
//!
//! A `unique` rule checks that no row in a table already holds the value.
//! When an existing record is re-validated before an update, its own row
//! holds the value, so the rule would always fail. [`exclude_self`] rewrites
//! every `unique` token to name the row to ignore:
//!
//! ```text
//! unique                     -> unique:<table>,<field>,<key>
//! unique:accounts            -> unique:accounts,<field>,<key>
//! unique:accounts,email      -> unique:accounts,email,<key>
//! unique:accounts,email  (primary key `uuid`)
//!                            -> unique:accounts,email,<key>,uuid
//! ```

use std::collections::BTreeMap;
use tracing::debug;

use crate::{RuleSet, RuleToken};

/// Constraint name of the uniqueness rule.
pub const UNIQUE: &str = "unique";

/// Primary-key attribute name assumed when a model does not declare one.
pub const DEFAULT_PRIMARY_KEY: &str = "id";

/// Exclusion value used when the record has no primary-key value.
pub const NULL_KEY: &str = "NULL";

/// The row a rewritten `unique` rule should ignore.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExclusionTarget {
    /// Table the record lives in; default table for bare `unique` tokens.
    pub table: String,
    /// Name of the primary-key attribute.
    pub primary_key: String,
    /// Rendered primary-key value of the current row, if any.
    pub key_value: Option<String>,
}

impl ExclusionTarget {
    pub fn new(
        table: impl Into<String>,
        primary_key: impl Into<String>,
        key_value: Option<String>,
    ) -> Self {
        Self {
            table: table.into(),
            primary_key: primary_key.into(),
            key_value,
        }
    }

    /// Whether the primary-key name has to be spelled out in the rule.
    pub fn has_custom_primary_key(&self) -> bool {
        self.primary_key != DEFAULT_PRIMARY_KEY
    }

    fn rewrite(&self, field: &str, token: &RuleToken) -> RuleToken {
        let table = token.param(0).unwrap_or(&self.table);
        let column = token.param(1).unwrap_or(field);
        let key_value = self.key_value.as_deref().unwrap_or(NULL_KEY);

        let rewritten = RuleToken::new(UNIQUE)
            .with_param(table)
            .with_param(column)
            .with_param(key_value);

        if self.has_custom_primary_key() {
            rewritten.with_param(self.primary_key.as_str())
        } else {
            rewritten
        }
    }
}

/// Returns a copy of `rules` with every `unique` token rewritten to exclude
/// the row identified by `target`.
///
/// Exclusion parameters already present on a token are replaced, so
/// rewriting twice for the same record yields the same rules. Tokens that
/// are not `unique` constraints, or that do not parse, are copied unchanged.
pub fn exclude_self(rules: &RuleSet, target: &ExclusionTarget) -> RuleSet {
    let rewritten: BTreeMap<String, Vec<String>> = rules
        .as_map()
        .iter()
        .map(|(field, tokens)| {
            let tokens = tokens
                .iter()
                .map(|raw| match RuleToken::parse(raw) {
                    Ok(token) if token.is(UNIQUE) => {
                        let token = target.rewrite(field, &token).to_string();
                        debug!(field = %field, rule = %token, "Excluded current row from unique rule");
                        token
                    }
                    _ => raw.clone(),
                })
                .collect();
            (field.clone(), tokens)
        })
        .collect();

    RuleSet::from_map(rewritten)
}
