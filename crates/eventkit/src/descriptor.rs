//! Per-event-type descriptors.
//!
//! A descriptor bundles the configuration one event type supplies: its
//! alias table, JSON-Schema document and matcher. [`Descriptor`] compiles
//! that configuration once and hands back the toolkit operations bound to
//! it, so callers never thread alias tables or schemas through by hand.

use std::borrow::Cow;

use serde::Deserialize;
use serde_json::Value;

use crate::error::Result;
use crate::expand::expand_with_paths;
use crate::matcher::Matcher;
use crate::modify::{modify, modify_bulk, Rule};
use crate::path::{get, AliasTable, FieldPath};
use crate::schema::{SchemaValidator, Violation};
use crate::value::{Mapping, Record};

/// Raw descriptor configuration, as a descriptor module declares it.
///
/// ```
/// use eventkit::DescriptorSpec;
/// use serde_json::json;
///
/// let spec: DescriptorSpec = serde_json::from_value(json!({
///     "label": "Generic Mobile Event",
///     "group": "event",
///     "parentDepth": 1,
///     "path": {"rootType": "type", "vendor": "vendor"},
///     "schema": {"type": "object"},
///     "matcher": ["type=='generic'", "timestamp"]
/// }))
/// .unwrap();
/// assert_eq!(spec.path.resolve("rootType"), "type");
/// ```
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DescriptorSpec {
    /// Human-readable name of the event type.
    pub label: String,
    /// Grouping the type belongs to (e.g. `event`).
    #[serde(default)]
    pub group: Option<String>,
    /// Number of schema ancestors; more specific descriptors have more.
    #[serde(default)]
    pub parent_depth: u32,
    /// Alias table.
    pub path: AliasTable,
    /// JSON-Schema document.
    pub schema: Value,
    /// Matcher identifying records of this type, if the type has one.
    #[serde(default)]
    pub matcher: Option<Matcher>,
}

/// A compiled descriptor with its operations bound.
#[derive(Debug)]
pub struct Descriptor {
    label: String,
    group: Option<String>,
    parent_depth: u32,
    aliases: AliasTable,
    schema: Value,
    validator: SchemaValidator,
    matcher: Option<Matcher>,
}

impl Descriptor {
    /// Compiles a descriptor. Fails if the schema document is invalid.
    pub fn new(spec: DescriptorSpec) -> Result<Self> {
        let validator = SchemaValidator::new(&spec.schema)?;
        log::debug!(
            "built descriptor '{}' with {} alias(es)",
            spec.label,
            spec.path.len()
        );
        Ok(Descriptor {
            label: spec.label,
            group: spec.group,
            parent_depth: spec.parent_depth,
            aliases: spec.path,
            schema: spec.schema,
            validator,
            matcher: spec.matcher,
        })
    }

    /// Reads and compiles a descriptor from its JSON form.
    ///
    /// The matcher is compiled apart from the rest of the document so a bad
    /// expression surfaces as [`KitError::MatcherSyntax`](crate::KitError::MatcherSyntax).
    pub fn from_value(mut value: Value) -> Result<Self> {
        let matcher = match value.as_object_mut().and_then(|doc| doc.remove("matcher")) {
            None | Some(Value::Null) => None,
            Some(raw) => Some(Matcher::from_value(raw)?),
        };
        let mut spec: DescriptorSpec = serde_json::from_value(value)?;
        spec.matcher = matcher;
        Descriptor::new(spec)
    }

    /// Human-readable name.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Grouping, if declared.
    pub fn group(&self) -> Option<&str> {
        self.group.as_deref()
    }

    /// Number of schema ancestors.
    pub fn parent_depth(&self) -> u32 {
        self.parent_depth
    }

    /// The alias table.
    pub fn aliases(&self) -> &AliasTable {
        &self.aliases
    }

    /// The schema document.
    pub fn schema(&self) -> &Value {
        &self.schema
    }

    /// The matcher, if the type declares one.
    pub fn matcher(&self) -> Option<&Matcher> {
        self.matcher.as_ref()
    }

    /// Canonical path for an alias (or the input itself if not an alias).
    pub fn path(&self, alias: &str) -> FieldPath {
        FieldPath::parse(self.aliases.resolve(alias))
    }

    /// Reads a value by alias or dotted path.
    pub fn get<'r>(&self, alias: &str, record: &'r Record) -> Option<&'r Record> {
        get(alias, Some(&self.aliases), record)
    }

    /// Reads `sub_path` below the value an alias points at
    /// (e.g. a key inside the event data).
    pub fn get_key<'r>(&self, alias: &str, sub_path: &str, record: &'r Record) -> Option<&'r Record> {
        self.path(alias).join(sub_path).resolve(record)
    }

    /// Tests a record against the descriptor's matcher. Types without a
    /// matcher match nothing.
    pub fn is_match(&self, record: &Record) -> bool {
        self.matcher.as_ref().is_some_and(|m| m.is_match(record))
    }

    /// Keeps the records this descriptor matches, in order.
    pub fn filter<'a>(&self, records: &'a [Record]) -> Vec<&'a Record> {
        records.iter().filter(|r| self.is_match(r)).collect()
    }

    /// Returns `true` iff the record satisfies the schema.
    pub fn is_valid(&self, record: &Record) -> bool {
        self.validator.is_valid(record)
    }

    /// Schema violations of a record, or `None` if it is valid.
    pub fn schema_errors(&self, record: &Record) -> Option<Vec<Violation>> {
        self.validator.errors(record)
    }

    /// Merges `patch` into every record this descriptor matches.
    pub fn modify<'a>(&self, patch: &Mapping, records: &'a [Record]) -> Vec<Cow<'a, Record>> {
        match &self.matcher {
            Some(matcher) => modify(patch, matcher, records),
            None => records.iter().map(Cow::Borrowed).collect(),
        }
    }

    /// Applies bulk rules. Each rule carries its own matcher, so the
    /// descriptor's matcher plays no part.
    pub fn modify_bulk<'a>(&self, rules: &[Rule], records: &'a [Record]) -> Vec<Cow<'a, Record>> {
        modify_bulk(rules, records)
    }

    /// Builds a record from a flat mapping keyed by aliases or paths.
    pub fn expand<I, K>(&self, flat: I) -> Result<Record>
    where
        I: IntoIterator<Item = (K, Value)>,
        K: AsRef<str>,
    {
        expand_with_paths(&self.aliases, flat)
    }
}
