//! Rule declarations and their normalized form.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::token::RULE_SEPARATOR;
use crate::RuleResult;

/// One field's rules as declared on a model.
///
/// Deserializes from either a pipe-delimited string or a JSON array, so both
/// `{"email": "required|email"}` and `{"email": ["required", "email"]}` are
/// accepted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RuleDefinition {
    Piped(String),
    List(Vec<String>),
}

impl RuleDefinition {
    /// Splits the definition into ordered rule tokens.
    ///
    /// Piped strings are split on `|` with empty segments dropped; lists are
    /// returned as they are.
    pub fn into_tokens(self) -> Vec<String> {
        match self {
            Self::Piped(rules) => rules
                .split(RULE_SEPARATOR)
                .filter(|segment| !segment.is_empty())
                .map(str::to_string)
                .collect(),
            Self::List(tokens) => tokens,
        }
    }
}

impl From<&str> for RuleDefinition {
    fn from(rules: &str) -> Self {
        Self::Piped(rules.to_string())
    }
}

impl From<String> for RuleDefinition {
    fn from(rules: String) -> Self {
        Self::Piped(rules)
    }
}

impl From<Vec<String>> for RuleDefinition {
    fn from(tokens: Vec<String>) -> Self {
        Self::List(tokens)
    }
}

impl From<Vec<&str>> for RuleDefinition {
    fn from(tokens: Vec<&str>) -> Self {
        Self::List(tokens.into_iter().map(str::to_string).collect())
    }
}

/// Field name to declared rules, in either form.
pub type RuleDefinitions = BTreeMap<String, RuleDefinition>;

/// Normalized rules: field name to an ordered list of rule tokens.
///
/// A `RuleSet` held by a schema is template data. Operations that change
/// tokens (see [`crate::exclude_self`]) take `&RuleSet` and return a new one.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RuleSet(BTreeMap<String, Vec<String>>);

impl RuleSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a rule set from declarations, normalizing each field.
    pub fn from_definitions(definitions: RuleDefinitions) -> Self {
        normalize(definitions)
    }

    /// Parses declarations from JSON (`{"field": "a|b"}` or `{"field": ["a", "b"]}`).
    pub fn from_json(json: &str) -> RuleResult<Self> {
        let definitions: RuleDefinitions = serde_json::from_str(json)?;
        Ok(normalize(definitions))
    }

    /// Adds or replaces the rules for `field`.
    pub fn insert(&mut self, field: impl Into<String>, rules: impl Into<RuleDefinition>) {
        self.0.insert(field.into(), rules.into().into_tokens());
    }

    /// Builder form of [`RuleSet::insert`].
    #[must_use]
    pub fn with(mut self, field: impl Into<String>, rules: impl Into<RuleDefinition>) -> Self {
        self.insert(field, rules);
        self
    }

    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.0.get(field).map(Vec::as_slice)
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.0.iter().map(|(field, tokens)| (field.as_str(), tokens.as_slice()))
    }

    /// Number of fields with rules.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub(crate) fn from_map(map: BTreeMap<String, Vec<String>>) -> Self {
        Self(map)
    }

    pub(crate) fn as_map(&self) -> &BTreeMap<String, Vec<String>> {
        &self.0
    }
}

impl FromIterator<(String, RuleDefinition)> for RuleSet {
    fn from_iter<I: IntoIterator<Item = (String, RuleDefinition)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(field, rules)| (field, rules.into_tokens()))
                .collect(),
        )
    }
}

impl<'a> IntoIterator for &'a RuleSet {
    type Item = (&'a String, &'a Vec<String>);
    type IntoIter = std::collections::btree_map::Iter<'a, String, Vec<String>>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Converts every field's declaration into an ordered token list.
pub fn normalize(definitions: RuleDefinitions) -> RuleSet {
    definitions.into_iter().collect()
}
