//! Removal of attributes that must never be persisted.

use std::fmt;
use std::sync::Arc;

use crate::Attributes;

/// Suffix of confirmation fields (`password_confirmation`).
pub const CONFIRMATION_SUFFIX: &str = "_confirmation";

/// Form field used to simulate HTTP verbs.
pub const METHOD_FIELD: &str = "_method";

/// Form field carrying the CSRF token.
pub const TOKEN_FIELD: &str = "_token";

/// Predicate over an attribute name: `true` if it may be persisted.
pub type PurgeFilter = Arc<dyn Fn(&str) -> bool + Send + Sync>;

fn basic_filter(key: &str) -> bool {
    !(key.ends_with(CONFIRMATION_SUFFIX) || key == METHOD_FIELD || key == TOKEN_FIELD)
}

/// An ordered list of purge filters.
///
/// The chain is assembled once, when the record type is built, and then
/// shared. Filters run in registration order and evaluation stops at the
/// first rejection.
#[derive(Clone, Default)]
pub struct PurgeChain {
    filters: Vec<PurgeFilter>,
}

impl PurgeChain {
    /// A chain with no filters; it keeps every attribute.
    pub fn empty() -> Self {
        Self::default()
    }

    /// A chain holding the built-in filter, which rejects confirmation
    /// fields, `_method` and `_token`.
    pub fn with_defaults() -> Self {
        let mut chain = Self::empty();
        chain.push(basic_filter);
        chain
    }

    pub fn push<F>(&mut self, filter: F)
    where
        F: Fn(&str) -> bool + Send + Sync + 'static,
    {
        self.filters.push(Arc::new(filter));
    }

    #[must_use]
    pub fn with_filter<F>(mut self, filter: F) -> Self
    where
        F: Fn(&str) -> bool + Send + Sync + 'static,
    {
        self.push(filter);
        self
    }

    pub fn len(&self) -> usize {
        self.filters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }

    /// Whether every filter allows `key`.
    pub fn allows(&self, key: &str) -> bool {
        self.filters.iter().all(|filter| filter(key))
    }

    /// Returns the attributes every filter allows. `primary_key` is always
    /// kept.
    pub fn purge(&self, attributes: &Attributes, primary_key: &str) -> Attributes {
        attributes
            .iter()
            .filter(|(key, _)| key.as_str() == primary_key || self.allows(key))
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect()
    }
}

impl fmt::Debug for PurgeChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PurgeChain")
            .field("filters", &self.filters.len())
            .finish()
    }
}
