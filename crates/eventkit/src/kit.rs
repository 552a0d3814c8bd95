//! Flat function facade.
//!
//! The free functions here are the names descriptor modules and callers
//! program against: `get`, `combine_all`, `is_match`, `filter`, `expand`,
//! `validate_schema`, `modify` and friends. They are thin wrappers over
//! the typed API in the rest of the crate.

use crate::error::Result;
use crate::matcher::{Matcher, Term};
use crate::value::Record;

pub use crate::expand::{expand, expand_with_paths};
pub use crate::modify::{modify, modify_bulk, modify_bulk_owned, modify_owned};
pub use crate::parse::compile;
pub use crate::path::{field_getter, get};
pub use crate::schema::{schema_errors, validate_schema};

/// AND over a mixed list of expressions and matchers.
pub fn combine_all<I>(terms: I) -> Result<Matcher>
where
    I: IntoIterator,
    I::Item: Into<Term>,
{
    Matcher::all(terms)
}

/// OR over a mixed list of expressions and matchers.
pub fn combine_any<I>(terms: I) -> Result<Matcher>
where
    I: IntoIterator,
    I::Item: Into<Term>,
{
    Matcher::any(terms)
}

/// NOR over a mixed list of expressions and matchers.
pub fn combine_none<I>(terms: I) -> Result<Matcher>
where
    I: IntoIterator,
    I::Item: Into<Term>,
{
    Matcher::none(terms)
}

/// Evaluates a matcher, or an expression compiled on the spot, against
/// one record. Only a malformed expression can fail.
///
/// ```
/// use eventkit::kit;
/// use serde_json::json;
///
/// assert!(kit::is_match("type=='generic'", &json!({"type": "generic"})).unwrap());
/// assert!(kit::is_match("type=='generic", &json!({})).is_err());
/// ```
pub fn is_match(matcher: impl Into<Term>, record: &Record) -> Result<bool> {
    Ok(matcher.into().into_matcher()?.is_match(record))
}

/// Keeps the records `matcher` matches, in input order.
pub fn filter<'a>(matcher: &Matcher, records: &'a [Record]) -> Vec<&'a Record> {
    matcher.filter(records)
}
