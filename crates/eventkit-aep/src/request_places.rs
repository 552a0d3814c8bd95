//! Request Places Event.
//!
//! Sent when the app asks the Places extension for nearby points of
//! interest:
//!
//! ```text
//! {
//!   payload: {
//!     ACPExtensionEventData: {
//!       count: <number>,
//!       latitude: <number>,
//!       longitude: <number>,
//!       requesttype: 'requestgetnearbyplaces'
//!     },
//!     ACPExtensionEventSource: 'com.adobe.eventsource.requestcontent',
//!     ACPExtensionEventType: 'com.adobe.eventtype.places',
//!     ...
//!   },
//!   type: 'generic',
//!   ...
//! }
//! ```

use eventkit::{Descriptor, Record, Result};
use once_cell::sync::Lazy;
use serde_json::Value;

pub const LABEL: &str = "Request Places Event";
pub const GROUP: &str = "event";
pub const PARENT_DEPTH: u32 = 3;

/// Value of `requestType`.
pub const REQUEST_TYPE: &str = "requestgetnearbyplaces";
/// Value of `eventSource`.
pub const EVENT_SOURCE: &str = "com.adobe.eventsource.requestcontent";
/// Value of `eventType`.
pub const EVENT_TYPE: &str = "com.adobe.eventtype.places";
/// Value of `rootType` (`type`).
pub const ROOT_TYPE: &str = "generic";

/// Alias table.
pub const PATHS: &[(&str, &str)] = &[
    ("payload", "payload"),
    ("data", "payload.ACPExtensionEventData"),
    ("count", "payload.ACPExtensionEventData.count"),
    ("latitude", "payload.ACPExtensionEventData.latitude"),
    ("longitude", "payload.ACPExtensionEventData.longitude"),
    ("requestType", "payload.ACPExtensionEventData.requesttype"),
    ("eventSource", "payload.ACPExtensionEventSource"),
    ("eventType", "payload.ACPExtensionEventType"),
    ("eventName", "payload.ACPExtensionEventName"),
    ("sdkEventNumber", "payload.ACPExtensionEventNumber"),
    ("eventId", "payload.ACPExtensionEventUniqueIdentifier"),
    ("rootType", "type"),
    ("vendor", "vendor"),
    ("annotations", "annotations"),
    ("clientId", "clientId"),
    ("timestamp", "timestamp"),
    ("rootId", "uuid"),
];

pub const MATCHER: &[&str] = &[
    "payload.ACPExtensionEventData.requesttype=='requestgetnearbyplaces'",
    "payload.ACPExtensionEventSource=='com.adobe.eventsource.requestcontent'",
    "payload.ACPExtensionEventType=='com.adobe.eventtype.places'",
    "type=='generic'",
    "timestamp",
];

static DESCRIPTOR: Lazy<Descriptor> = Lazy::new(|| {
    crate::build(
        LABEL,
        Some(GROUP),
        PARENT_DEPTH,
        PATHS,
        include_str!("../schemas/request_places.json"),
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
    data => "data",
    /// Number of POIs to return.
    count => "count",
    /// Latitude to search from.
    latitude => "latitude",
    /// Longitude to search from.
    longitude => "longitude",
    /// Type of request being made.
    request_type => "requestType",
}

/// Reads `key` inside the event data.
pub fn data_key<'r>(key: &str, record: &'r Record) -> Option<&'r Record> {
    DESCRIPTOR.get_key("data", key, record)
}

/// Returns `true` if `record` is a Request Places Event.
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
        ("count", Value::from(10)),
        ("latitude", Value::from(40.4349)),
        ("longitude", Value::from(-111.891)),
    ];
    base.extend(constants());
    base.extend(crate::event_defaults());
    crate::layered(&DESCRIPTOR, base, overrides)
}

fn constants() -> Vec<(&'static str, Value)> {
    vec![
        ("requestType", Value::from(REQUEST_TYPE)),
        ("eventSource", Value::from(EVENT_SOURCE)),
        ("eventType", Value::from(EVENT_TYPE)),
        ("rootType", Value::from(ROOT_TYPE)),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn make_is_a_match_once_timestamped() {
        let bare = make(Vec::<(&str, Value)>::new()).unwrap();
        assert_eq!(request_type(&bare), Some(&json!(REQUEST_TYPE)));
        assert!(!is_match(&bare));

        let stamped = make([("timestamp", json!(1))]).unwrap();
        assert!(is_match(&stamped));
    }

    #[test]
    fn mock_shape() {
        let event = mock(Vec::<(&str, Value)>::new()).unwrap();
        insta::assert_json_snapshot!(event, @r###"
        {
          "payload": {
            "ACPExtensionEventData": {
              "count": 10,
              "latitude": 40.4349,
              "longitude": -111.891,
              "requesttype": "requestgetnearbyplaces"
            },
            "ACPExtensionEventSource": "com.adobe.eventsource.requestcontent",
            "ACPExtensionEventType": "com.adobe.eventtype.places"
          },
          "type": "generic",
          "vendor": "com.adobe.mobile.sdk",
          "clientId": "appleABC",
          "timestamp": 1578813797000,
          "uuid": "123"
        }
        "###);
    }

    #[test]
    fn getters() {
        let event = mock([("count", json!(3)), ("latitude", json!(1.5))]).unwrap();
        assert_eq!(count(&event), Some(&json!(3)));
        assert_eq!(latitude(&event), Some(&json!(1.5)));
        assert_eq!(longitude(&event), Some(&json!(-111.891)));
        assert_eq!(data_key("count", &event), Some(&json!(3)));
        assert_eq!(data(&event).and_then(|d| d.get("requesttype")), Some(&json!(REQUEST_TYPE)));
        assert_eq!(get("payload.ACPExtensionEventType", &event), Some(&json!(EVENT_TYPE)));
    }

    #[test]
    fn schema_rejects_wrong_request_type() {
        let event = mock([("requestType", json!("requestreset"))]).unwrap();
        assert!(!is_match(&event));
        let violations = descriptor().schema_errors(&event).unwrap();
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].path, "payload.ACPExtensionEventData.requesttype");
    }
}
