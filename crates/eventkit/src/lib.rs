//! Eventkit - query and transform toolkit for JSON-like telemetry records.
//!
//! Eventkit works on generic record trees ([`serde_json::Value`]) and the
//! path and predicate strings that per-event-type descriptors are written
//! in. It supports:
//!
//! - Dotted-path field access, optionally through an alias table
//! - A small matcher language: `path`, `path=='literal'`, `path==true`
//! - AND / OR / NOR combinators over expressions and built matchers
//! - Expansion of flat `path -> value` mappings into nested records
//! - JSON-Schema (draft-07) validation with structured violations
//! - Non-mutating patch application, single or bulk
//!
//! # Quick Start
//!
//! ```rust
//! use eventkit::{expand_with_paths, modify_owned, AliasTable, Matcher};
//! use serde_json::json;
//!
//! // A descriptor's alias table
//! let aliases = AliasTable::new()
//!     .with("rootType", "type")
//!     .with("eventType", "payload.ACPExtensionEventType");
//!
//! // Build records from short names
//! let event = expand_with_paths(&aliases, [
//!     ("rootType", json!("generic")),
//!     ("eventType", json!("com.adobe.eventtype.places")),
//! ])
//! .unwrap();
//! let records = vec![event, json!({"type": "other"})];
//!
//! // Match and patch
//! let matcher = Matcher::all([
//!     "type=='generic'",
//!     "payload.ACPExtensionEventType",
//! ])
//! .unwrap();
//! assert_eq!(matcher.count(&records), 1);
//!
//! let patch = json!({"color": "red"}).as_object().cloned().unwrap();
//! let patched = modify_owned(&patch, &matcher, &records);
//! assert_eq!(patched[0]["color"], "red");
//! assert!(patched[1].get("color").is_none());
//! ```
//!
//! # Matcher Semantics
//!
//! ```text
//! path            = value at path exists and is truthy
//! path==literal   = value at path is strictly equal to literal
//! all(ms)         = every m matches       (empty = everything)
//! any(ms)         = some m matches        (empty = nothing)
//! none(ms)        = no m matches          (empty = everything)
//! ```
//!
//! Paths that do not resolve (missing keys, or stepping through a
//! sequence or scalar) are absent, and an absent value never matches.
//!
//! # Errors
//!
//! Only construction fails: parsing an expression, compiling a schema,
//! expanding colliding paths, or reading a rule. Evaluation, validation
//! and patching always return values.

mod clause;
pub mod descriptor;
mod error;
mod expand;
pub mod kit;
mod matcher;
mod modify;
mod parse;
mod path;
mod schema;
mod value;

// Re-export public API
pub use clause::{Clause, Test};
pub use descriptor::{Descriptor, DescriptorSpec};
pub use error::{KitError, Result};
pub use expand::{expand, expand_with_paths};
pub use matcher::{Matcher, Term};
pub use modify::{modify, modify_bulk, modify_bulk_owned, modify_owned, Rule};
pub use parse::compile;
pub use path::{field_getter, get, AliasTable, FieldPath};
pub use schema::{schema_errors, validate_schema, SchemaValidator, Violation};
pub use value::{is_truthy, Literal, Mapping, Number, Record};
