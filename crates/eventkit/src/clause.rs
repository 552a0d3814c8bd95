//! Clause types for matcher predicates.
//!
//! A [`Clause`] is a single parsed matcher expression: a field path and a
//! [`Test`] to run on whatever the path resolves to.

use std::fmt;

use crate::path::FieldPath;
use crate::value::{is_truthy, Literal, Record};

/// What a clause checks about the value at its path.
#[derive(Debug, Clone, PartialEq)]
pub enum Test {
    /// Bare `path`: the value exists and is truthy.
    Exists,
    /// `path==literal`: the value is strictly equal to the literal.
    Equals(Literal),
}

/// A single matcher predicate.
///
/// # Example
///
/// ```
/// use eventkit::Clause;
/// use serde_json::json;
///
/// let clause = Clause::equals("type", "generic");
/// assert!(clause.matches(&json!({"type": "generic"})));
/// assert!(!clause.matches(&json!({"type": "other"})));
/// assert_eq!(clause.to_string(), "type=='generic'");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Clause {
    /// The field path to resolve.
    pub path: FieldPath,
    /// The check applied to the resolved value.
    pub test: Test,
}

impl Clause {
    /// Creates an existence clause.
    pub fn exists(path: impl Into<FieldPath>) -> Self {
        Clause {
            path: path.into(),
            test: Test::Exists,
        }
    }

    /// Creates an equality clause.
    pub fn equals(path: impl Into<FieldPath>, literal: impl Into<Literal>) -> Self {
        Clause {
            path: path.into(),
            test: Test::Equals(literal.into()),
        }
    }

    /// Evaluates this clause against a record.
    ///
    /// A path that does not resolve never matches.
    pub fn matches(&self, record: &Record) -> bool {
        let value = self.path.resolve(record);
        match &self.test {
            Test::Exists => is_truthy(value),
            Test::Equals(literal) => value.is_some_and(|v| literal.equals(v)),
        }
    }
}

impl fmt::Display for Clause {
    /// Renders the clause in matcher-expression syntax.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.test {
            Test::Exists => write!(f, "{}", self.path),
            Test::Equals(literal) => write!(f, "{}=={}", self.path, literal),
        }
    }
}
