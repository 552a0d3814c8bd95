//! Descriptors for AEP Mobile SDK events and Places objects.
//!
//! Each module describes one record type the way every eventkit descriptor
//! does: an alias table, an embedded draft-07 schema, an optional matcher,
//! and record builders for tests and fixtures.
//!
//! | Module             | Label                  | Parent depth | Matcher |
//! |--------------------|------------------------|--------------|---------|
//! | [`mobile_event`]   | Generic Mobile Event   | 1            | yes     |
//! | [`request_places`] | Request Places Event   | 3            | yes     |
//! | [`poi`]            | POI Object             | 0            | no      |
//!
//! ```rust
//! use eventkit_aep::{classify, mobile_event, request_places};
//! use serde_json::json;
//!
//! let event = request_places::mock([("count", json!(5))]).unwrap();
//! assert_eq!(request_places::count(&event), Some(&json!(5)));
//!
//! // Both event descriptors match, the more specific one wins.
//! assert!(mobile_event::is_match(&event));
//! assert_eq!(classify(&event).map(|d| d.label()), Some(request_places::LABEL));
//! ```

use eventkit::{Descriptor, DescriptorSpec, Matcher, Record, Result};
use serde_json::Value;

/// Generates one alias getter per entry, reading through a descriptor.
macro_rules! alias_getters {
    ($descriptor:ident; $($(#[$meta:meta])* $name:ident => $alias:literal),* $(,)?) => {
        $(
            $(#[$meta])*
            pub fn $name(record: &Record) -> Option<&Record> {
                $descriptor.get($alias, record)
            }
        )*
    };
}

pub mod mobile_event;
pub mod poi;
pub mod request_places;

/// Mock `vendor` shared by every SDK event.
pub const VENDOR: &str = "com.adobe.mobile.sdk";
/// Mock `clientId`.
pub const CLIENT_ID: &str = "appleABC";
/// Mock `timestamp`: 12 Jan 2020 07:23:17 GMT, in epoch milliseconds.
pub const TIMESTAMP: u64 = 1_578_813_797_000;
/// Mock event `uuid`.
pub const ROOT_ID: &str = "123";

/// Event descriptors, most specific first.
pub fn event_descriptors() -> [&'static Descriptor; 2] {
    [request_places::descriptor(), mobile_event::descriptor()]
}

/// Picks the most specific event descriptor matching `record`.
///
/// Descriptors with a deeper schema ancestry are preferred, so a places
/// request is reported as such rather than as a generic event.
pub fn classify(record: &Record) -> Option<&'static Descriptor> {
    event_descriptors()
        .into_iter()
        .filter(|d| d.is_match(record))
        .max_by_key(|d| d.parent_depth())
}

/// Compiles an embedded descriptor.
///
/// Descriptor sources are compiled into the binary, so failing here is a
/// packaging bug rather than a runtime condition.
fn build(
    label: &str,
    group: Option<&str>,
    parent_depth: u32,
    paths: &[(&str, &str)],
    schema: &str,
    matcher: Option<&[&str]>,
) -> Descriptor {
    let schema: Value = serde_json::from_str(schema)
        .unwrap_or_else(|err| panic!("embedded schema for '{label}' is not JSON: {err}"));
    let matcher = matcher.map(|exprs| {
        Matcher::all(exprs.iter().copied())
            .unwrap_or_else(|err| panic!("embedded matcher for '{label}' is invalid: {err}"))
    });
    let spec = DescriptorSpec {
        label: label.to_string(),
        group: group.map(str::to_string),
        parent_depth,
        path: paths.iter().copied().collect(),
        schema,
        matcher,
    };
    Descriptor::new(spec)
        .unwrap_or_else(|err| panic!("embedded descriptor '{label}' failed to compile: {err}"))
}

/// Expands `base` entries followed by `overrides`; later entries win.
fn layered<I, K>(descriptor: &Descriptor, base: Vec<(&str, Value)>, overrides: I) -> Result<Record>
where
    I: IntoIterator<Item = (K, Value)>,
    K: AsRef<str>,
{
    let base = base.into_iter().map(|(key, value)| (key.to_string(), value));
    let overrides = overrides
        .into_iter()
        .map(|(key, value)| (key.as_ref().to_string(), value));
    descriptor.expand(base.chain(overrides))
}

/// Defaults every SDK event mock carries.
fn event_defaults() -> Vec<(&'static str, Value)> {
    vec![
        ("vendor", Value::from(VENDOR)),
        ("clientId", Value::from(CLIENT_ID)),
        ("timestamp", Value::from(TIMESTAMP)),
        ("rootId", Value::from(ROOT_ID)),
    ]
}
