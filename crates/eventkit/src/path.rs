//! Dotted-path field access.
//!
//! A [`FieldPath`] addresses a value inside a [`Record`] by mapping keys,
//! written externally as `payload.ACPExtensionEventData.count`. Resolution
//! never fails: a missing key, or descending through anything that is not
//! a mapping, resolves to `None`.
//!
//! An [`AliasTable`] maps short names (`eventName`) to canonical paths
//! (`payload.ACPExtensionEventName`). Descriptors own their table and pass
//! it explicitly; keys not in the table are read as literal paths.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::value::{Mapping, Record};

/// Path separator in the external string form.
pub const SEPARATOR: char = '.';

/// A parsed dotted path.
///
/// The empty string parses to the root path, which resolves to the whole
/// record.
///
/// # Example
///
/// ```
/// use eventkit::FieldPath;
/// use serde_json::json;
///
/// let path = FieldPath::parse("payload.data.count");
/// let record = json!({"payload": {"data": {"count": 10}}});
///
/// assert_eq!(path.resolve(&record), Some(&json!(10)));
/// assert_eq!(FieldPath::parse("payload.missing").resolve(&record), None);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct FieldPath {
    segments: Vec<String>,
}

impl FieldPath {
    /// Returns the root path (no segments).
    pub fn root() -> Self {
        FieldPath::default()
    }

    /// Parses a dotted path string.
    pub fn parse(path: &str) -> Self {
        if path.is_empty() {
            return FieldPath::root();
        }
        FieldPath {
            segments: path.split(SEPARATOR).map(str::to_string).collect(),
        }
    }

    /// Builds a path from individual segments.
    pub fn from_segments<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        FieldPath {
            segments: segments.into_iter().map(Into::into).collect(),
        }
    }

    /// Returns the path segments.
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Returns `true` for the root path.
    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    /// Returns a new path with `suffix` (itself dotted) appended.
    pub fn join(&self, suffix: &str) -> Self {
        let mut segments = self.segments.clone();
        segments.extend(FieldPath::parse(suffix).segments);
        FieldPath { segments }
    }

    /// Resolves this path against a record.
    ///
    /// Each step descends only into a mapping that has the key; anything
    /// else (missing key, sequence, scalar) ends the walk with `None`.
    pub fn resolve<'r>(&self, record: &'r Record) -> Option<&'r Record> {
        let mut current = record;
        for segment in &self.segments {
            current = match current {
                Value::Object(map) => map.get(segment)?,
                _ => return None,
            };
        }
        Some(current)
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.segments.join("."))
    }
}

impl FromStr for FieldPath {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(FieldPath::parse(s))
    }
}

impl From<&str> for FieldPath {
    fn from(s: &str) -> Self {
        FieldPath::parse(s)
    }
}

/// Maps short identifiers to canonical dotted paths.
///
/// Deserializes from a flat JSON object of strings, and preserves the
/// declaration order of its entries.
///
/// # Example
///
/// ```
/// use eventkit::AliasTable;
///
/// let aliases = AliasTable::from_iter([("eventName", "payload.ACPExtensionEventName")]);
/// assert_eq!(aliases.resolve("eventName"), "payload.ACPExtensionEventName");
/// assert_eq!(aliases.resolve("vendor"), "vendor");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "Mapping", into = "Mapping")]
pub struct AliasTable {
    entries: Mapping,
}

impl TryFrom<Mapping> for AliasTable {
    type Error = String;

    fn try_from(entries: Mapping) -> Result<Self, Self::Error> {
        match entries.iter().find(|(_, path)| !path.is_string()) {
            Some((alias, _)) => Err(format!("alias '{}' must map to a path string", alias)),
            None => Ok(AliasTable { entries }),
        }
    }
}

impl From<AliasTable> for Mapping {
    fn from(table: AliasTable) -> Self {
        table.entries
    }
}

impl AliasTable {
    /// Creates an empty alias table.
    pub fn new() -> Self {
        AliasTable::default()
    }

    /// Adds or replaces an alias.
    pub fn insert(&mut self, alias: impl Into<String>, path: impl Into<String>) {
        self.entries.insert(alias.into(), Value::String(path.into()));
    }

    /// Builder form of [`AliasTable::insert`].
    pub fn with(mut self, alias: impl Into<String>, path: impl Into<String>) -> Self {
        self.insert(alias, path);
        self
    }

    /// Looks up an alias, returning its canonical path.
    pub fn lookup(&self, alias: &str) -> Option<&str> {
        self.entries.get(alias).and_then(Value::as_str)
    }

    /// Resolves `key` through the table, falling back to `key` itself.
    pub fn resolve<'a>(&'a self, key: &'a str) -> &'a str {
        self.lookup(key).unwrap_or(key)
    }

    /// Iterates `(alias, path)` pairs in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .filter_map(|(alias, path)| path.as_str().map(|p| (alias.as_str(), p)))
    }

    /// Number of aliases.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the table has no aliases.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<A, P> FromIterator<(A, P)> for AliasTable
where
    A: Into<String>,
    P: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (A, P)>>(iter: I) -> Self {
        let mut table = AliasTable::new();
        for (alias, path) in iter {
            table.insert(alias, path);
        }
        table
    }
}

/// Resolves `path` (or an alias of `aliases`) against `record`.
///
/// # Example
///
/// ```
/// use eventkit::{get, AliasTable};
/// use serde_json::json;
///
/// let aliases = AliasTable::from_iter([("count", "payload.data.count")]);
/// let record = json!({"payload": {"data": {"count": 10}}});
///
/// assert_eq!(get("count", Some(&aliases), &record), Some(&json!(10)));
/// assert_eq!(get("payload.data", None, &record), Some(&json!({"count": 10})));
/// assert_eq!(get("", None, &record), Some(&record));
/// ```
pub fn get<'r>(path: &str, aliases: Option<&AliasTable>, record: &'r Record) -> Option<&'r Record> {
    let canonical = match aliases {
        Some(table) => table.resolve(path),
        None => path,
    };
    FieldPath::parse(canonical).resolve(record)
}

/// Parses `path` once and returns a getter bound to it.
///
/// ```
/// use eventkit::field_getter;
/// use serde_json::json;
///
/// let vendor = field_getter("vendor");
/// assert_eq!(vendor(&json!({"vendor": "x"})), Some(&json!("x")));
/// ```
pub fn field_getter(path: &str) -> impl Fn(&Record) -> Option<&Record> {
    let path = FieldPath::parse(path);
    move |record| path.resolve(record)
}
