//! Generic Mobile Event.
//!
//! The envelope every Mobile SDK event shares:
//!
//! ```text
//! {
//!   payload: {
//!     ACPExtensionEventData: <object>,
//!     ACPExtensionEventName: <string>,
//!     ACPExtensionEventNumber: <integer>,
//!     ACPExtensionEventSource: <string>,
//!     ACPExtensionEventType: <string>,
//!     ACPExtensionEventUniqueIdentifier: <string>,
//!   },
//!   type: 'generic',
//!   vendor: <string>,
//!   annotations: <array>,
//!   clientId: <string>,
//!   timestamp: <number>,
//!   uuid: <string>,
//! }
//! ```

use eventkit::{Descriptor, Record, Result};
use once_cell::sync::Lazy;
use serde_json::Value;

pub const LABEL: &str = "Generic Mobile Event";
pub const GROUP: &str = "event";
pub const PARENT_DEPTH: u32 = 1;

/// Value of `rootType` (`type`).
pub const ROOT_TYPE: &str = "generic";

/// Alias table.
pub const PATHS: &[(&str, &str)] = &[
    ("payload", "payload"),
    ("eventData", "payload.ACPExtensionEventData"),
    ("eventName", "payload.ACPExtensionEventName"),
    ("sdkEventNumber", "payload.ACPExtensionEventNumber"),
    ("eventSource", "payload.ACPExtensionEventSource"),
    ("eventType", "payload.ACPExtensionEventType"),
    ("eventId", "payload.ACPExtensionEventUniqueIdentifier"),
    ("rootType", "type"),
    ("vendor", "vendor"),
    ("annotations", "annotations"),
    ("clientId", "clientId"),
    ("timestamp", "timestamp"),
    ("rootId", "uuid"),
];

pub const MATCHER: &[&str] = &[
    "payload.ACPExtensionEventSource",
    "payload.ACPExtensionEventType",
    "type=='generic'",
    "timestamp",
];

static DESCRIPTOR: Lazy<Descriptor> = Lazy::new(|| {
    crate::build(
        LABEL,
        Some(GROUP),
        PARENT_DEPTH,
        PATHS,
        include_str!("../schemas/mobile_event.json"),
        Some(MATCHER),
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
    /// `payload.ACPExtensionEventData`
    event_data => "eventData",
    /// `payload.ACPExtensionEventName`
    event_name => "eventName",
    /// `payload.ACPExtensionEventNumber`, the event number generated by the SDK.
    sdk_event_number => "sdkEventNumber",
    /// `payload.ACPExtensionEventSource`
    event_source => "eventSource",
    /// `payload.ACPExtensionEventType`
    event_type => "eventType",
    /// `payload.ACPExtensionEventUniqueIdentifier`
    event_id => "eventId",
    /// `vendor`, the vendor of the plugin that sent the event.
    vendor => "vendor",
}

/// Reads `key` inside the event data.
pub fn event_data_key<'r>(key: &str, record: &'r Record) -> Option<&'r Record> {
    DESCRIPTOR.get_key("eventData", key, record)
}

/// Returns `true` if `record` is a Generic Mobile Event.
pub fn is_match(record: &Record) -> bool {
    DESCRIPTOR.is_match(record)
}

/// Builds an event with the constant values set, plus `overrides`.
pub fn make<I, K>(overrides: I) -> Result<Record>
where
    I: IntoIterator<Item = (K, Value)>,
    K: AsRef<str>,
{
    crate::layered(&DESCRIPTOR, constants(), overrides)
}

/// Builds a complete event with mock defaults, overridable per key.
pub fn mock<I, K>(overrides: I) -> Result<Record>
where
    I: IntoIterator<Item = (K, Value)>,
    K: AsRef<str>,
{
    let mut base = vec![
        ("eventSource", Value::from("com.adobe.eventsource.responsecontent")),
        ("eventType", Value::from("test event")),
    ];
    base.extend(constants());
    base.extend(crate::event_defaults());
    crate::layered(&DESCRIPTOR, base, overrides)
}

fn constants() -> Vec<(&'static str, Value)> {
    vec![("rootType", Value::from(ROOT_TYPE))]
}
