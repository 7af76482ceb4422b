use std::fmt;
use std::str::FromStr;

use crate::{RuleError, RuleResult};

/// Separates rules in a piped declaration (`required|email`).
pub const RULE_SEPARATOR: char = '|';

/// Separates a constraint name from its parameters (`max:50`).
pub const PARAM_SEPARATOR: char = ':';

/// Separates the parameters of a token (`unique:users,email`).
pub const LIST_SEPARATOR: &str = ",";

/// A single parsed rule token: a constraint name and its parameters.
///
/// `unique:users,email` parses to name `unique` with params `["users", "email"]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleToken {
    pub name: String,
    pub params: Vec<String>,
}

impl RuleToken {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            params: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_param(mut self, param: impl Into<String>) -> Self {
        self.params.push(param.into());
        self
    }

    /// Parses a token string.
    pub fn parse(token: &str) -> RuleResult<Self> {
        if token.is_empty() {
            return Err(RuleError::EmptyToken);
        }

        let (name, params) = match token.split_once(PARAM_SEPARATOR) {
            Some((name, rest)) => (
                name,
                rest.split(LIST_SEPARATOR).map(str::to_string).collect(),
            ),
            None => (token, Vec::new()),
        };

        if name.is_empty() {
            return Err(RuleError::MissingName(token.to_string()));
        }

        Ok(Self {
            name: name.to_string(),
            params,
        })
    }

    /// Whether this token's constraint name is exactly `name`.
    pub fn is(&self, name: &str) -> bool {
        self.name == name
    }

    /// The parameter at `index`, treating empty strings as absent.
    pub fn param(&self, index: usize) -> Option<&str> {
        self.params
            .get(index)
            .map(String::as_str)
            .filter(|p| !p.is_empty())
    }
}

impl FromStr for RuleToken {
    type Err = RuleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for RuleToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)?;
        if !self.params.is_empty() {
            write!(f, "{PARAM_SEPARATOR}{}", self.params.join(LIST_SEPARATOR))?;
        }
        Ok(())
    }
}
