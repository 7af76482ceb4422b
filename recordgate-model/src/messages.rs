use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Validation messages keyed by field name.
///
/// Messages for a field keep the order they were added in. Nothing is ever
/// removed except by [`ErrorCollection::clear`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ErrorCollection(BTreeMap<String, Vec<String>>);

impl ErrorCollection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a message for `field`.
    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.entry(field.into()).or_default().push(message.into());
    }

    /// Appends every message from `other`, field by field.
    pub fn merge(&mut self, other: &ErrorCollection) {
        for (field, messages) in &other.0 {
            self.0
                .entry(field.clone())
                .or_default()
                .extend(messages.iter().cloned());
        }
    }

    /// Whether any message exists for `field`.
    pub fn has(&self, field: &str) -> bool {
        self.0.get(field).is_some_and(|m| !m.is_empty())
    }

    /// The first message for `field`.
    pub fn first(&self, field: &str) -> Option<&str> {
        self.0.get(field).and_then(|m| m.first()).map(String::as_str)
    }

    /// All messages for `field`, empty when there are none.
    pub fn get(&self, field: &str) -> &[String] {
        self.0.get(field).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Every message, ordered by field name.
    pub fn all(&self) -> Vec<&str> {
        self.0
            .values()
            .flat_map(|m| m.iter().map(String::as_str))
            .collect()
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.0.iter().map(|(f, m)| (f.as_str(), m.as_slice()))
    }

    /// Total number of messages across all fields.
    pub fn len(&self) -> usize {
        self.0.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }
}

impl From<BTreeMap<String, Vec<String>>> for ErrorCollection {
    fn from(map: BTreeMap<String, Vec<String>>) -> Self {
        Self(map)
    }
}

impl<F: Into<String>, M: Into<String>> FromIterator<(F, M)> for ErrorCollection {
    fn from_iter<I: IntoIterator<Item = (F, M)>>(iter: I) -> Self {
        let mut errors = Self::new();
        for (field, message) in iter {
            errors.add(field, message);
        }
        errors
    }
}

impl fmt::Display for ErrorCollection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.all().join("; "))
    }
}
