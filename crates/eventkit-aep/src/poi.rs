//! POI Object.
//!
//! A point of interest as the Places extension reports it. POIs appear
//! inside event data rather than as events, so the descriptor has no
//! matcher.
//!
//! ```text
//! {
//!   latitude: <number>,
//!   libraryid: <string>,
//!   longitude: <number>,
//!   regionname: <string>,
//!   regionmetadata: {
//!     category: <string>,
//!     city: <string>,
//!     country: <string>,
//!     state: <string>,
//!     street: <string>,
//!   },
//!   radius: <number>,
//!   regionid: <string>,
//!   useriswithin: <boolean>,
//!   weight: <number>,
//!   type: <string>,
//!   uuid: <string>,
//! }
//! ```

use eventkit::{Descriptor, Record, Result};
use once_cell::sync::Lazy;
use serde_json::Value;

pub const LABEL: &str = "POI Object";

/// Alias table.
pub const PATHS: &[(&str, &str)] = &[
    ("latitude", "latitude"),
    ("libraryId", "libraryid"),
    ("longitude", "longitude"),
    ("name", "regionname"),
    ("metadata", "regionmetadata"),
    ("category", "regionmetadata.category"),
    ("city", "regionmetadata.city"),
    ("country", "regionmetadata.country"),
    ("state", "regionmetadata.state"),
    ("street", "regionmetadata.street"),
    ("radius", "radius"),
    ("id", "regionid"),
    ("within", "useriswithin"),
    ("weight", "weight"),
    ("type", "type"),
    ("uuid", "uuid"),
];

static DESCRIPTOR: Lazy<Descriptor> = Lazy::new(|| {
    crate::build(
        LABEL,
        None,
        0,
        PATHS,
        include_str!("../schemas/poi.json"),
        None,
    )
});

/// The compiled descriptor.
pub fn descriptor() -> &'static Descriptor {
    &DESCRIPTOR
}

/// Reads a value by alias or dotted path.
pub fn get<'r>(alias: &str, record: &'r Record) -> Option<&'r Record> {
    DESCRIPTOR.get(alias, record)
}

alias_getters! { DESCRIPTOR;
    latitude => "latitude",
    /// The Places library the POI belongs to.
    library_id => "libraryId",
    longitude => "longitude",
    name => "name",
    /// Defined metadata items plus custom data.
    metadata => "metadata",
    category => "category",
    city => "city",
    country => "country",
    state => "state",
    street => "street",
    radius => "radius",
    /// The unique region id.
    id => "id",
    /// Whether the user is currently inside the POI.
    within => "within",
    /// Priority among overlapping POIs the user is inside.
    weight => "weight",
    /// Scope of the annotation, usually the plugin that wrote it.
    kind => "type",
    uuid => "uuid",
}

/// Reads `key` inside the POI metadata.
pub fn metadata_key<'r>(key: &str, record: &'r Record) -> Option<&'r Record> {
    DESCRIPTOR.get_key("metadata", key, record)
}

/// Validates a POI against its schema.
pub fn validate(record: &Record) -> bool {
    DESCRIPTOR.is_valid(record)
}

/// Builds a POI with mock defaults. Overrides are keyed by raw dotted
/// field paths (`regionname`, `regionmetadata.city`), not by aliases.
pub fn mock<I, K>(overrides: I) -> Result<Record>
where
    I: IntoIterator<Item = (K, Value)>,
    K: AsRef<str>,
{
    let base = vec![
        ("latitude", Value::from(40.4045982)),
        ("libraryid", Value::from("04213")),
        ("longitude", Value::from(-111.8636017)),
        ("regionname", Value::from("Adobe")),
        ("radius", Value::from(375)),
        ("regionid", Value::from("31512")),
        ("useriswithin", Value::from(false)),
        ("weight", Value::from(2)),
        ("type", Value::from("test_suite")),
        ("uuid", Value::from("423")),
    ];
    let overrides = overrides
        .into_iter()
        .map(|(key, value)| (key.as_ref().to_string(), value));
    eventkit::expand(
        base.into_iter()
            .map(|(key, value)| (key.to_string(), value))
            .chain(overrides),
    )
}
