//! The toolkit driven through the shipped descriptors.

use eventkit::{kit, Matcher, Record, Rule, Term};
use eventkit_aep::{mobile_event, poi, request_places};
use serde_json::{json, Value};

fn no_overrides() -> Vec<(&'static str, Value)> {
    Vec::new()
}

fn places_mock() -> Record {
    request_places::mock(no_overrides()).unwrap()
}

fn generic_mock() -> Record {
    mobile_event::mock(no_overrides()).unwrap()
}

fn events() -> Vec<Record> {
    vec![places_mock(), generic_mock()]
}

fn places_matcher() -> &'static Matcher {
    request_places::descriptor().matcher().unwrap()
}

// The path of an alias used as an existence test.
fn event_source() -> String {
    mobile_event::descriptor().path("eventSource").to_string()
}

#[test]
fn can_match_events() {
    let events = events();
    assert_eq!(kit::filter(places_matcher(), &events), vec![&events[0]]);
    assert_eq!(request_places::descriptor().filter(&events), vec![&events[0]]);
    assert_eq!(mobile_event::descriptor().filter(&events).len(), 2);
}

#[test]
fn can_match_against_all_events() {
    let events = events();
    let terms: Vec<Term> = vec![event_source().into(), places_matcher().into()];
    assert_eq!(kit::combine_all(terms).unwrap().count(&events), 1);
}

#[test]
fn can_match_against_any_events() {
    let events = events();
    let terms: Vec<Term> = vec![event_source().into(), places_matcher().into()];
    assert_eq!(kit::combine_any(terms).unwrap().count(&events), 2);
}

#[test]
fn can_match_against_none_of_the_events() {
    let events = events();
    let terms: Vec<Term> = vec![event_source().into(), places_matcher().into()];
    assert_eq!(kit::combine_none(terms).unwrap().count(&events), 0);
    assert_eq!(kit::combine_none([places_matcher()]).unwrap().count(&events), 1);
}

#[test]
fn can_test_against_a_schema() {
    let is_places = kit::validate_schema(request_places::descriptor().schema()).unwrap();
    assert!(is_places(&places_mock()));
    assert!(!is_places(&generic_mock()));
}

#[test]
fn can_provide_schema_errors() {
    let schema = request_places::descriptor().schema();
    assert_eq!(kit::schema_errors(schema, &places_mock()).unwrap(), None);

    let violations = kit::schema_errors(schema, &generic_mock()).unwrap().unwrap();
    let mut paths: Vec<&str> = violations.iter().map(|v| v.path.as_str()).collect();
    paths.sort_unstable();
    assert_eq!(
        paths,
        vec!["payload", "payload.ACPExtensionEventSource", "payload.ACPExtensionEventType"]
    );
}

#[test]
fn can_modify_data_in_the_results() {
    let events = events();
    let patch = json!({"color": "red"}).as_object().cloned().unwrap();
    let results = request_places::descriptor().modify(&patch, &events);

    assert_eq!(results.len(), 2);
    assert_eq!(results[0]["color"], "red");
    assert_eq!(results[0]["uuid"], "123");
    assert!(results[1].get("color").is_none());
}

#[test]
fn can_modify_the_results_in_bulk() {
    let events = events();
    let rules: Vec<Rule> = serde_json::from_value(json!([
        {"matcher": places_matcher(), "modifications": {"color": "red"}},
        {"matcher": event_source(), "mods": {"size": "large"}},
    ]))
    .unwrap();
    let results = kit::modify_bulk_owned(&rules, &events);

    assert_eq!(results.len(), 2);
    assert_eq!(results[0]["color"], "red");
    assert_eq!(results[0]["uuid"], "123");
    assert!(results[1].get("color").is_none());
    assert_eq!(results[0]["size"], "large");
    assert_eq!(results[1]["size"], "large");
}

#[test]
fn descriptors_expand_their_aliases() {
    let places = request_places::descriptor();
    let record = places
        .expand([("count", json!(1)), ("payload.ACPExtensionEventData.extra", json!(true))])
        .unwrap();
    assert_eq!(
        record,
        json!({"payload": {"ACPExtensionEventData": {"count": 1, "extra": true}}})
    );
}

#[test]
fn poi_inside_event_data() {
    let poi = poi::mock([("regionmetadata.city", json!("Lehi"))]).unwrap();
    let event = mobile_event::mock([("eventData", json!({"poi": poi}))]).unwrap();

    let nested = mobile_event::event_data_key("poi", &event).unwrap();
    assert!(poi::validate(nested));
    assert_eq!(poi::city(nested), Some(&json!("Lehi")));
    assert!(mobile_event::is_match(&event));
}
