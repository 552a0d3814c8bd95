//! Property-based tests for eventkit using proptest.

use std::borrow::Cow;

use eventkit::{
    expand, get, is_truthy, modify, modify_bulk_owned, Matcher, Record, Rule, SchemaValidator,
};
use proptest::prelude::*;
use serde_json::{json, Map, Value};

// ============================================================================
// Test helpers
// ============================================================================

const KEYS: &[&str] = &["type", "vendor", "timestamp", "payload"];

// Small scalar domain so that generated expressions actually hit values.
fn scalar_strategy() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        (0i64..3).prop_map(|n| json!(n)),
        prop::sample::select(vec!["", "generic", "other"]).prop_map(|s| json!(s)),
    ]
}

fn value_strategy() -> impl Strategy<Value = Value> {
    scalar_strategy().prop_recursive(2, 8, 3, |inner| {
        prop::collection::vec((prop::sample::select(KEYS.to_vec()), inner), 0..3).prop_map(
            |entries| {
                let map: Map<String, Value> = entries
                    .into_iter()
                    .map(|(k, v)| (k.to_string(), v))
                    .collect();
                Value::Object(map)
            },
        )
    })
}

fn record_strategy() -> impl Strategy<Value = Record> {
    prop::collection::vec((prop::sample::select(KEYS.to_vec()), value_strategy()), 0..4).prop_map(
        |entries| {
            let map: Map<String, Value> = entries
                .into_iter()
                .map(|(k, v)| (k.to_string(), v))
                .collect();
            Value::Object(map)
        },
    )
}

fn path_strategy() -> impl Strategy<Value = String> {
    prop::collection::vec(prop::sample::select(KEYS.to_vec()), 1..3).prop_map(|s| s.join("."))
}

fn literal_strategy() -> impl Strategy<Value = String> {
    prop::sample::select(vec!["'generic'", "'other'", "''", "0", "1", "2", "true", "false", "null"])
        .prop_map(String::from)
}

fn expr_strategy() -> impl Strategy<Value = String> {
    (path_strategy(), prop::option::of(literal_strategy())).prop_map(|(path, literal)| match literal {
        Some(literal) => format!("{path}=={literal}"),
        None => path,
    })
}

fn matchers_strategy() -> impl Strategy<Value = Vec<Matcher>> {
    prop::collection::vec(
        expr_strategy().prop_map(|e| Matcher::parse(&e).unwrap()),
        0..4,
    )
}

proptest! {
    /// all(ms) filters like applying every m in sequence.
    #[test]
    fn all_is_sequential_filtering(
        records in prop::collection::vec(record_strategy(), 0..20),
        matchers in matchers_strategy(),
    ) {
        let combined = Matcher::all(matchers.clone()).unwrap();

        let mut sequential: Vec<&Record> = records.iter().collect();
        for m in &matchers {
            sequential.retain(|r| m.is_match(r));
        }

        prop_assert_eq!(combined.filter(&records), sequential);
    }

    /// any(ms) keeps a record iff some m keeps it, in input order.
    #[test]
    fn any_is_ordered_union(
        records in prop::collection::vec(record_strategy(), 0..20),
        matchers in matchers_strategy(),
    ) {
        let combined = Matcher::any(matchers.clone()).unwrap();
        let union: Vec<&Record> = records
            .iter()
            .filter(|r| matchers.iter().any(|m| m.is_match(r)))
            .collect();

        prop_assert_eq!(combined.filter(&records), union);
    }

    /// none(ms) is the complement of any(ms).
    #[test]
    fn none_is_complement_of_any(
        records in prop::collection::vec(record_strategy(), 0..20),
        matchers in matchers_strategy(),
    ) {
        let any = Matcher::any(matchers.clone()).unwrap();
        let none = Matcher::none(matchers).unwrap();

        for record in &records {
            prop_assert_ne!(any.is_match(record), none.is_match(record));
        }
        prop_assert_eq!(any.count(&records) + none.count(&records), records.len());
    }

    /// A bare path matches exactly when its value is truthy.
    #[test]
    fn existence_is_truthiness(record in record_strategy(), path in path_strategy()) {
        let matcher = Matcher::parse(&path).unwrap();
        prop_assert_eq!(matcher.is_match(&record), is_truthy(get(&path, None, &record)));
    }

    /// Paths written by expand read back through get.
    #[test]
    fn expand_then_get_round_trips(
        entries in prop::collection::btree_map(
            prop::sample::select(vec!["a.b", "a.c", "d", "e.f.g"]),
            scalar_strategy(),
            0..4,
        ),
    ) {
        let record = expand(entries.iter().map(|(k, v)| (*k, v.clone()))).unwrap();
        for (path, value) in &entries {
            prop_assert_eq!(get(path, None, &record), Some(value));
        }
    }

    /// Modifying with a matcher that never matches leaves every record borrowed.
    #[test]
    fn modify_without_matches_is_identity(records in prop::collection::vec(record_strategy(), 0..20)) {
        let never = Matcher::any(Vec::<Matcher>::new()).unwrap();
        let patch = json!({"tag": "x"}).as_object().cloned().unwrap();

        let out = modify(&patch, &never, &records);
        prop_assert_eq!(out.len(), records.len());
        for (out, original) in out.iter().zip(&records) {
            prop_assert!(matches!(out, Cow::Borrowed(r) if std::ptr::eq(*r, original)));
        }
    }

    /// Bulk modification keeps order and length, and records matched by no
    /// rule come back unchanged.
    #[test]
    fn bulk_modify_preserves_shape(
        records in prop::collection::vec(record_strategy(), 0..20),
        exprs in prop::collection::vec(expr_strategy(), 0..3),
    ) {
        let rules: Vec<Rule> = exprs
            .iter()
            .enumerate()
            .map(|(i, e)| {
                let mut patch = Map::new();
                patch.insert(format!("rule{i}"), json!(i));
                Rule::new(e.as_str(), patch).unwrap()
            })
            .collect();

        let out = modify_bulk_owned(&rules, &records);
        prop_assert_eq!(out.len(), records.len());
        for (out, original) in out.iter().zip(&records) {
            if !rules.iter().any(|rule| rule.matcher.is_match(original)) {
                prop_assert_eq!(out, original);
            }
        }
    }

    /// schema errors are absent exactly when the record is valid.
    #[test]
    fn errors_absent_iff_valid(record in record_strategy()) {
        let validator = SchemaValidator::new(&json!({
            "type": "object",
            "required": ["type"],
            "properties": {
                "type": {"enum": ["generic", "other"]},
                "timestamp": {"type": "integer"},
            },
        }))
        .unwrap();

        prop_assert_eq!(validator.errors(&record).is_none(), validator.is_valid(&record));
    }

    /// Rendered matchers parse back to the same matcher.
    #[test]
    fn expression_display_round_trips(expr in expr_strategy()) {
        let matcher = Matcher::parse(&expr).unwrap();
        let reparsed = Matcher::parse(&matcher.to_string()).unwrap();
        prop_assert_eq!(matcher, reparsed);
    }
}
