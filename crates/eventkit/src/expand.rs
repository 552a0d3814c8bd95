//! Flat-path to nested-record expansion.
//!
//! Turns `{"size.width": 200, "size.height": 300}` into
//! `{"size": {"width": 200, "height": 300}}`. The aliased form resolves each
//! key through an [`AliasTable`] first, which is how descriptors build mock
//! events from short names.
//!
//! Merge rules, applied entry by entry in input order:
//!
//! - descending into an existing mapping merges into it;
//! - writing a non-mapping over a non-mapping replaces it, and writing a
//!   mapping over a mapping merges the two;
//! - descending through an existing non-mapping value, or writing where a
//!   mapping and a non-mapping meet, is a [`KitError::PathCollision`]
//!   whatever the entry order.

use serde_json::Value;

use crate::error::{KitError, Result};
use crate::path::{AliasTable, FieldPath};
use crate::value::{Mapping, Record};

/// Expands a flat mapping of dotted paths into a nested record.
///
/// # Example
///
/// ```
/// use eventkit::expand;
/// use serde_json::json;
///
/// let record = expand([("size.width", json!(200)), ("size.height", json!(300))]).unwrap();
/// assert_eq!(record, json!({"size": {"width": 200, "height": 300}}));
/// ```
pub fn expand<I, K>(flat: I) -> Result<Record>
where
    I: IntoIterator<Item = (K, Value)>,
    K: AsRef<str>,
{
    let mut root = Mapping::new();
    for (key, value) in flat {
        insert_path(&mut root, &FieldPath::parse(key.as_ref()), value)?;
    }
    Ok(Value::Object(root))
}

/// Expands a flat mapping whose keys are aliases of `aliases` (or literal
/// dotted paths) into a nested record.
///
/// # Example
///
/// ```
/// use eventkit::{expand_with_paths, get, AliasTable};
/// use serde_json::json;
///
/// let aliases = AliasTable::from_iter([("count", "payload.data.count")]);
/// let record = expand_with_paths(&aliases, [("count", json!(10))]).unwrap();
///
/// assert_eq!(record, json!({"payload": {"data": {"count": 10}}}));
/// assert_eq!(get("count", Some(&aliases), &record), Some(&json!(10)));
/// ```
pub fn expand_with_paths<I, K>(aliases: &AliasTable, flat: I) -> Result<Record>
where
    I: IntoIterator<Item = (K, Value)>,
    K: AsRef<str>,
{
    expand(
        flat.into_iter()
            .map(|(key, value)| (aliases.resolve(key.as_ref()).to_string(), value)),
    )
}

fn insert_path(root: &mut Mapping, path: &FieldPath, value: Value) -> Result<()> {
    let Some((last, parents)) = path.segments().split_last() else {
        // The root path merges a mapping into the result and rejects anything else.
        return match value {
            Value::Object(map) => merge_mapping(root, &[], map),
            _ => Err(collision(&[])),
        };
    };

    let mut node = root;
    for (depth, segment) in parents.iter().enumerate() {
        let child = node
            .entry(segment.clone())
            .or_insert_with(|| Value::Object(Mapping::new()));
        node = match child {
            Value::Object(map) => map,
            _ => return Err(collision(&parents[..=depth])),
        };
    }

    merge_value(node, parents, last.clone(), value)
}

/// Deep-merges `incoming` into `target`, which sits at `at`.
fn merge_mapping(target: &mut Mapping, at: &[String], incoming: Mapping) -> Result<()> {
    for (key, value) in incoming {
        merge_value(target, at, key, value)?;
    }
    Ok(())
}

/// Writes `key` into `target`. Scalars replace scalars, mappings merge
/// into mappings, and a mapping never trades places with a non-mapping.
fn merge_value(target: &mut Mapping, at: &[String], key: String, value: Value) -> Result<()> {
    match (target.get_mut(&key), value) {
        (Some(Value::Object(existing)), Value::Object(incoming)) => {
            let mut child = at.to_vec();
            child.push(key);
            merge_mapping(existing, &child, incoming)
        }
        (Some(old), value) if old.is_object() || value.is_object() => {
            let mut child = at.to_vec();
            child.push(key);
            Err(collision(&child))
        }
        (_, value) => {
            target.insert(key, value);
            Ok(())
        }
    }
}

fn collision(segments: &[String]) -> KitError {
    KitError::PathCollision {
        path: FieldPath::from_segments(segments).to_string(),
    }
}
