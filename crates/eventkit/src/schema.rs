//! JSON-Schema validation with structured violations.
//!
//! A [`SchemaValidator`] is compiled once from a schema document (draft-07
//! semantics) and then checks any number of records. A malformed schema is
//! rejected at construction with [`KitError::InvalidSchema`]; a record
//! failing validation is never an error, it yields [`Violation`]s.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{KitError, Result};
use crate::path::FieldPath;
use crate::value::Record;

/// One schema-validation failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Violation {
    /// Dotted path of the offending value (`""` for the record itself).
    pub path: String,
    /// Human-readable description.
    pub message: String,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.path.is_empty() {
            write!(f, "(root): {}", self.message)
        } else {
            write!(f, "{}: {}", self.path, self.message)
        }
    }
}

/// A compiled schema document.
///
/// # Example
///
/// ```
/// use eventkit::SchemaValidator;
/// use serde_json::json;
///
/// let validator = SchemaValidator::new(&json!({
///     "type": "object",
///     "required": ["type"],
///     "properties": {"type": {"const": "generic"}}
/// }))
/// .unwrap();
///
/// assert!(validator.is_valid(&json!({"type": "generic"})));
/// assert_eq!(validator.errors(&json!({"type": "generic"})), None);
///
/// let violations = validator.errors(&json!({"type": "other"})).unwrap();
/// assert_eq!(violations.len(), 1);
/// assert_eq!(violations[0].path, "type");
/// ```
pub struct SchemaValidator {
    inner: jsonschema::Validator,
}

impl SchemaValidator {
    /// Compiles `schema` with draft-07 semantics.
    pub fn new(schema: &Record) -> Result<Self> {
        let inner = jsonschema::draft7::new(schema)
            .map_err(|err| KitError::InvalidSchema(err.to_string()))?;
        log::debug!("compiled schema {}", schema_label(schema));
        Ok(SchemaValidator { inner })
    }

    /// Returns `true` iff `record` satisfies the schema.
    pub fn is_valid(&self, record: &Record) -> bool {
        self.inner.is_valid(record)
    }

    /// Returns `None` when `record` is valid, otherwise every violation in
    /// the validator's traversal order.
    pub fn errors(&self, record: &Record) -> Option<Vec<Violation>> {
        let violations: Vec<Violation> = self
            .inner
            .iter_errors(record)
            .map(|err| Violation {
                path: pointer_to_path(&err.instance_path.to_string()),
                message: err.to_string(),
            })
            .collect();
        if violations.is_empty() {
            None
        } else {
            log::trace!("record failed schema with {} violation(s)", violations.len());
            Some(violations)
        }
    }
}

impl fmt::Debug for SchemaValidator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SchemaValidator").finish_non_exhaustive()
    }
}

/// Curried form: compile once, get back a boolean check.
///
/// ```
/// use eventkit::validate_schema;
/// use serde_json::json;
///
/// let is_string = validate_schema(&json!({"type": "string"})).unwrap();
/// assert!(is_string(&json!("x")));
/// assert!(!is_string(&json!(1)));
/// ```
pub fn validate_schema(schema: &Record) -> Result<impl Fn(&Record) -> bool> {
    let validator = SchemaValidator::new(schema)?;
    Ok(move |record: &Record| validator.is_valid(record))
}

/// Compiles `schema` and lists the violations of `record` (`None` if valid).
pub fn schema_errors(schema: &Record, record: &Record) -> Result<Option<Vec<Violation>>> {
    Ok(SchemaValidator::new(schema)?.errors(record))
}

/// Converts a JSON pointer (`/payload/ACPExtensionEventType`) to a dotted path.
fn pointer_to_path(pointer: &str) -> String {
    let segments = pointer
        .split('/')
        .skip(1)
        .map(|segment| segment.replace("~1", "/").replace("~0", "~"));
    FieldPath::from_segments(segments).to_string()
}

fn schema_label(schema: &Record) -> &str {
    schema
        .get("$id")
        .or_else(|| schema.get("title"))
        .and_then(Record::as_str)
        .unwrap_or("<anonymous>")
}
