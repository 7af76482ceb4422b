use recordgate_rules::{DEFAULT_PRIMARY_KEY, RuleDefinition, RuleDefinitions, RuleSet};
use serde::{Deserialize, Serialize};

use crate::{ModelResult, PurgeChain};

/// Attribute checked by soft-delete aware record types.
pub const DELETED_AT: &str = "deleted_at";

/// What happens to previously collected errors when a record is validated
/// again.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorMode {
    /// New errors are merged into the existing ones (default). Callers clear
    /// them explicitly with `Record::clear_errors`.
    #[default]
    Accumulate,
    /// Errors are cleared at the start of every validation.
    ResetPerValidation,
}

fn default_primary_key() -> String {
    DEFAULT_PRIMARY_KEY.to_string()
}

fn default_password_attributes() -> Vec<String> {
    vec!["password".to_string()]
}

/// Serializable description of a record type.
///
/// ```json
/// {
///   "table": "users",
///   "rules": { "email": "required|email|unique", "password": "required|confirmed" },
///   "soft_delete": true
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchemaConfig {
    pub table: String,
    #[serde(default = "default_primary_key")]
    pub primary_key: String,
    #[serde(default)]
    pub rules: RuleDefinitions,
    #[serde(default = "default_password_attributes")]
    pub password_attributes: Vec<String>,
    #[serde(default)]
    pub soft_delete: bool,
    #[serde(default)]
    pub error_mode: ErrorMode,
    /// Names of related record types.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub relationships: Vec<String>,
}

impl SchemaConfig {
    pub fn from_json(json: &str) -> ModelResult<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Everything a record needs to know about its type.
///
/// Built once per record type and shared behind an `Arc`; nothing in it
/// changes afterwards.
#[derive(Debug, Clone)]
pub struct RecordSchema {
    pub table: String,
    pub primary_key: String,
    /// Rules applied on insert, and on update after unique exclusion.
    pub rules: RuleSet,
    pub password_attributes: Vec<String>,
    pub soft_delete: bool,
    pub error_mode: ErrorMode,
    pub relationships: Vec<String>,
    pub purge: PurgeChain,
}

impl RecordSchema {
    pub fn builder(table: impl Into<String>) -> RecordSchemaBuilder {
        RecordSchemaBuilder::new(table)
    }

    /// Builds a schema from configuration with the default purge filters.
    pub fn from_config(config: SchemaConfig) -> Self {
        RecordSchemaBuilder::from_config(config).build()
    }

    /// Whether the primary key is something other than `id`.
    pub fn has_custom_primary_key(&self) -> bool {
        self.primary_key != DEFAULT_PRIMARY_KEY
    }
}

/// Builder for [`RecordSchema`].
///
/// The built-in purge filters are registered first; filters added with
/// [`RecordSchemaBuilder::purge_filter`] run after them.
#[derive(Debug)]
pub struct RecordSchemaBuilder {
    table: String,
    primary_key: String,
    rules: RuleSet,
    password_attributes: Vec<String>,
    soft_delete: bool,
    error_mode: ErrorMode,
    relationships: Vec<String>,
    purge: PurgeChain,
}

impl RecordSchemaBuilder {
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            primary_key: default_primary_key(),
            rules: RuleSet::new(),
            password_attributes: default_password_attributes(),
            soft_delete: false,
            error_mode: ErrorMode::default(),
            relationships: Vec::new(),
            purge: PurgeChain::with_defaults(),
        }
    }

    pub fn from_config(config: SchemaConfig) -> Self {
        Self {
            table: config.table,
            primary_key: config.primary_key,
            rules: RuleSet::from_definitions(config.rules),
            password_attributes: config.password_attributes,
            soft_delete: config.soft_delete,
            error_mode: config.error_mode,
            relationships: config.relationships,
            purge: PurgeChain::with_defaults(),
        }
    }

    pub fn primary_key(mut self, primary_key: impl Into<String>) -> Self {
        self.primary_key = primary_key.into();
        self
    }

    pub fn rules(mut self, rules: RuleSet) -> Self {
        self.rules = rules;
        self
    }

    /// Adds or replaces the rules for one field.
    pub fn rule(mut self, field: impl Into<String>, rules: impl Into<RuleDefinition>) -> Self {
        self.rules.insert(field, rules);
        self
    }

    pub fn password_attributes<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.password_attributes = names.into_iter().map(Into::into).collect();
        self
    }

    pub fn soft_delete(mut self, enabled: bool) -> Self {
        self.soft_delete = enabled;
        self
    }

    pub fn error_mode(mut self, mode: ErrorMode) -> Self {
        self.error_mode = mode;
        self
    }

    pub fn relationship(mut self, name: impl Into<String>) -> Self {
        self.relationships.push(name.into());
        self
    }

    /// Appends a purge filter after the built-in ones.
    pub fn purge_filter<F>(mut self, filter: F) -> Self
    where
        F: Fn(&str) -> bool + Send + Sync + 'static,
    {
        self.purge.push(filter);
        self
    }

    pub fn build(self) -> RecordSchema {
        RecordSchema {
            table: self.table,
            primary_key: self.primary_key,
            rules: self.rules,
            password_attributes: self.password_attributes,
            soft_delete: self.soft_delete,
            error_mode: self.error_mode,
            relationships: self.relationships,
            purge: self.purge,
        }
    }
}
