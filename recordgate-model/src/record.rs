use recordgate_crypto::PasswordHasher;
use recordgate_rules::{DEFAULT_PRIMARY_KEY, ExclusionTarget, LIST_SEPARATOR, RuleSet, exclude_self};
use serde_json::Value;
use std::sync::Arc;

use crate::schema::DELETED_AT;
use crate::{
    Attributes, ErrorCollection, ErrorMode, ModelError, ModelResult, RecordSchema, RuleEngine,
    Validator,
};

/// A record type: a schema bound to the rule engine and hasher its records
/// use.
///
/// Cheap to clone; every record minted from it shares the same schema.
#[derive(Clone)]
pub struct RecordType {
    schema: Arc<RecordSchema>,
    engine: Arc<dyn RuleEngine>,
    hasher: Arc<dyn PasswordHasher>,
}

impl RecordType {
    pub fn new(
        schema: RecordSchema,
        engine: Arc<dyn RuleEngine>,
        hasher: Arc<dyn PasswordHasher>,
    ) -> Self {
        Self {
            schema: Arc::new(schema),
            engine,
            hasher,
        }
    }

    pub fn schema(&self) -> &RecordSchema {
        &self.schema
    }

    pub fn hasher(&self) -> &dyn PasswordHasher {
        self.hasher.as_ref()
    }

    /// A new record that has never been persisted.
    pub fn make(&self, attributes: Attributes) -> Record {
        Record::new(self.clone(), attributes, Attributes::new(), false)
    }

    /// A record loaded from storage: `attributes` are also its original
    /// values.
    pub fn hydrate(&self, attributes: Attributes) -> Record {
        let original = attributes.clone();
        Record::new(self.clone(), attributes, original, true)
    }
}

impl std::fmt::Debug for RecordType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecordType")
            .field("schema", &self.schema)
            .finish_non_exhaustive()
    }
}

/// One persistable entity.
///
/// Holds the current attributes, the attributes as last loaded or written
/// (`original`), and the validation errors collected so far. A record is
/// owned by whoever is operating on it; nothing inside is shared mutably.
#[derive(Debug, Clone)]
pub struct Record {
    pub(crate) kind: RecordType,
    pub(crate) validator: Validator,
    pub(crate) attributes: Attributes,
    pub(crate) original: Attributes,
    pub(crate) exists: bool,
    pub(crate) errors: ErrorCollection,
}

impl Record {
    fn new(kind: RecordType, attributes: Attributes, original: Attributes, exists: bool) -> Self {
        let validator =
            Validator::new(Arc::clone(&kind.engine)).with_default_rules(kind.schema.rules.clone());
        Self {
            kind,
            validator,
            attributes,
            original,
            exists,
            errors: ErrorCollection::new(),
        }
    }

    pub fn schema(&self) -> &RecordSchema {
        &self.kind.schema
    }

    pub fn record_type(&self) -> &RecordType {
        &self.kind
    }

    // ── Attributes ───────────────────────────────────────────────

    pub fn attributes(&self) -> &Attributes {
        &self.attributes
    }

    pub fn original(&self) -> &Attributes {
        &self.original
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.attributes.get(key)
    }

    /// Extract a string attribute.
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.attributes.get(key).and_then(Value::as_str)
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.attributes.insert(key.into(), value.into());
    }

    /// Sets every attribute in `attributes`, keeping the others.
    pub fn fill(&mut self, attributes: Attributes) {
        self.attributes.extend(attributes);
    }

    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.attributes.remove(key)
    }

    /// Whether `key` differs from its original value.
    pub fn is_dirty(&self, key: &str) -> bool {
        self.attributes.get(key) != self.original.get(key)
    }

    /// Attributes that differ from their original values.
    pub fn dirty(&self) -> Attributes {
        self.attributes
            .iter()
            .filter(|(key, value)| self.original.get(key.as_str()) != Some(*value))
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect()
    }

    /// Makes the current attributes the original ones.
    pub fn sync_original(&mut self) {
        self.original = self.attributes.clone();
    }

    /// Whether the record has a persisted identity.
    pub fn exists(&self) -> bool {
        self.exists
    }

    /// Whether the record is soft-deleted. Always `false` for record types
    /// without soft deletes.
    pub fn is_deleted(&self) -> bool {
        self.schema().soft_delete
            && self
                .attributes
                .get(DELETED_AT)
                .is_some_and(|v| !v.is_null())
    }

    // ── Identity ─────────────────────────────────────────────────

    /// The attribute holding the record's identity and its value.
    ///
    /// Reads the declared primary-key attribute, falling back to `id` when
    /// that is missing. The returned name is the attribute actually read, so
    /// a fallback pairs the `id` value with the `id` column. Null counts as
    /// missing.
    pub fn key_attribute(&self) -> Option<(&str, &Value)> {
        let primary_key = self.schema().primary_key.as_str();
        [primary_key, DEFAULT_PRIMARY_KEY]
            .into_iter()
            .find_map(|name| {
                self.attributes
                    .get(name)
                    .filter(|v| !v.is_null())
                    .map(|value| (name, value))
            })
    }

    /// The primary-key value, see [`Record::key_attribute`].
    pub fn key(&self) -> Option<&Value> {
        self.key_attribute().map(|(_, value)| value)
    }

    /// The primary-key value as it appears inside a rule token.
    pub fn key_string(&self) -> Option<String> {
        self.key().map(render_key)
    }

    /// Key values containing the parameter separator are refused.
    fn exclusion_target(&self) -> ModelResult<ExclusionTarget> {
        let schema = self.schema();
        let Some((column, value)) = self.key_attribute() else {
            return Ok(ExclusionTarget::new(
                schema.table.as_str(),
                schema.primary_key.as_str(),
                None,
            ));
        };

        let rendered = render_key(value);
        if rendered.contains(LIST_SEPARATOR) {
            return Err(ModelError::UnrenderableKey(rendered));
        }
        Ok(ExclusionTarget::new(
            schema.table.as_str(),
            column,
            Some(rendered),
        ))
    }

    // ── Errors ───────────────────────────────────────────────────

    /// Validation messages collected so far.
    pub fn errors(&self) -> &ErrorCollection {
        &self.errors
    }

    pub fn add_error(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors.add(field, message);
    }

    pub fn add_errors(&mut self, errors: &ErrorCollection) {
        self.errors.merge(errors);
    }

    pub fn clear_errors(&mut self) {
        self.errors.clear();
    }

    // ── Validation ───────────────────────────────────────────────

    /// Validates the current attributes against `rules`, or the schema's
    /// rules when `rules` is `None` or empty.
    ///
    /// Failure messages are merged into [`Record::errors`]; with
    /// [`ErrorMode::Accumulate`] they pile up across calls. Storage is not
    /// touched.
    pub fn validate(&mut self, rules: Option<&RuleSet>) -> ModelResult<bool> {
        if self.schema().error_mode == ErrorMode::ResetPerValidation {
            self.errors.clear();
        }

        let no_rules = RuleSet::new();
        let rules = rules.unwrap_or(&no_rules);

        let passes = self.validator.validate(&self.attributes, rules)?;
        if !passes {
            if let Some(errors) = self.validator.errors() {
                self.errors.merge(errors);
            }
        }
        Ok(passes)
    }

    /// Alias for [`Record::validate`].
    pub fn is_valid(&mut self, rules: Option<&RuleSet>) -> ModelResult<bool> {
        self.validate(rules)
    }

    /// Rules for validating an update: `rules` (or the schema's rules) with
    /// every `unique` constraint excluding this record's own row.
    ///
    /// Fails with [`ModelError::UnrenderableKey`] when the key value
    /// contains `,`.
    pub fn build_update_rules(&self, rules: Option<&RuleSet>) -> ModelResult<RuleSet> {
        let rules = match rules {
            Some(rules) if !rules.is_empty() => rules,
            _ => &self.schema().rules,
        };
        Ok(exclude_self(rules, &self.exclusion_target()?))
    }
}

fn render_key(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
