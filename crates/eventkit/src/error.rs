//! Error types for the eventkit crate.
//!
//! Only construction can fail: compiling a matcher expression, compiling a
//! schema document, expanding colliding paths, or reading a bulk rule.
//! Evaluating a matcher or validating a record never returns an error.

use thiserror::Error;

/// Errors that can occur when building matchers, validators and rules.
#[derive(Debug, Error)]
pub enum KitError {
    /// Matcher expression could not be parsed.
    #[error("invalid matcher expression {expr:?}: {reason}")]
    MatcherSyntax { expr: String, reason: String },

    /// Schema document is not a valid JSON-Schema.
    #[error("invalid schema: {0}")]
    InvalidSchema(String),

    /// Two flat entries addressed the same location with incompatible values.
    #[error("path collision at '{path}': a non-object value is already set there")]
    PathCollision { path: String },

    /// A bulk rule supplied both `modifications` and `mods`.
    #[error("rule supplies both 'modifications' and 'mods'; use exactly one")]
    ConflictingPatch,

    /// A bulk rule supplied neither `modifications` nor `mods`.
    #[error("rule has no 'modifications' or 'mods' patch")]
    MissingPatch,

    /// A rule or descriptor document had the wrong shape.
    #[error("invalid rule: {0}")]
    InvalidRule(String),

    /// JSON (de)serialization failure.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

impl KitError {
    pub(crate) fn syntax(expr: &str, reason: impl Into<String>) -> Self {
        KitError::MatcherSyntax {
            expr: expr.to_string(),
            reason: reason.into(),
        }
    }
}

/// Result type for eventkit operations.
pub type Result<T> = std::result::Result<T, KitError>;
