//! Non-mutating patch application.
//!
//! [`modify`] merges one patch into every matching record; [`modify_bulk`]
//! applies a list of [`Rule`]s, stacking the patches of every rule a record
//! matches. Both keep the input order and length, and neither touches the
//! input: records that do not change are handed back borrowed.

use std::borrow::Cow;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{KitError, Result};
use crate::matcher::{Matcher, Term};
use crate::value::{Mapping, Record};

/// A matcher paired with the patch to merge into records it matches.
///
/// Deserializes from `{"matcher": ..., "modifications": {...}}`; `mods` is
/// accepted as a synonym for `modifications`, but a rule may not carry both.
///
/// # Example
///
/// ```
/// use eventkit::Rule;
/// use serde_json::json;
///
/// let rule = Rule::from_value(json!({"matcher": "type=='generic'", "mods": {"tag": "g"}})).unwrap();
/// assert_eq!(rule.patch["tag"], "g");
///
/// let both = Rule::from_value(json!({"matcher": "a", "mods": {}, "modifications": {}}));
/// assert!(both.is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RuleRepr")]
pub struct Rule {
    /// Which records the rule applies to.
    pub matcher: Matcher,
    /// Keys merged over the top level of each matching record.
    #[serde(rename = "modifications")]
    pub patch: Mapping,
}

impl Rule {
    /// Builds a rule from a matcher term and a patch.
    pub fn new(matcher: impl Into<Term>, patch: Mapping) -> Result<Self> {
        Ok(Rule {
            matcher: matcher.into().into_matcher()?,
            patch,
        })
    }

    /// Reads a rule from its JSON form.
    pub fn from_value(value: Value) -> Result<Self> {
        let repr: RuleRepr =
            serde_json::from_value(value).map_err(|err| KitError::InvalidRule(err.to_string()))?;
        Rule::try_from(repr)
    }
}

#[derive(Deserialize)]
struct RuleRepr {
    matcher: Matcher,
    modifications: Option<Mapping>,
    mods: Option<Mapping>,
}

impl TryFrom<RuleRepr> for Rule {
    type Error = KitError;

    fn try_from(repr: RuleRepr) -> Result<Self> {
        let patch = match (repr.modifications, repr.mods) {
            (Some(_), Some(_)) => return Err(KitError::ConflictingPatch),
            (None, None) => return Err(KitError::MissingPatch),
            (Some(patch), None) | (None, Some(patch)) => patch,
        };
        Ok(Rule {
            matcher: repr.matcher,
            patch,
        })
    }
}

/// Shallow-merges `patch` over a record. Non-mapping records are returned
/// unchanged.
fn apply_patch<'a>(record: Cow<'a, Record>, patch: &Mapping) -> Cow<'a, Record> {
    if !record.is_object() || patch.is_empty() {
        return record;
    }
    let mut owned = record.into_owned();
    if let Value::Object(map) = &mut owned {
        for (key, value) in patch {
            map.insert(key.clone(), value.clone());
        }
    }
    Cow::Owned(owned)
}

/// Merges `patch` into every record matching `matcher`.
///
/// Matching records come back as owned copies with the patch keys on top;
/// every other record comes back borrowed from the input.
///
/// # Example
///
/// ```
/// use eventkit::{modify, Matcher};
/// use serde_json::json;
///
/// let records = vec![json!({"type": "generic"}), json!({"type": "other"})];
/// let patch = json!({"tag": "g"}).as_object().unwrap().clone();
/// let matcher = Matcher::parse("type=='generic'").unwrap();
///
/// let out = modify(&patch, &matcher, &records);
/// assert_eq!(*out[0], json!({"type": "generic", "tag": "g"}));
/// assert_eq!(*out[1], records[1]);
/// ```
pub fn modify<'a>(patch: &Mapping, matcher: &Matcher, records: &'a [Record]) -> Vec<Cow<'a, Record>> {
    records
        .iter()
        .map(|record| {
            let record = Cow::Borrowed(record);
            if matcher.is_match(&record) {
                apply_patch(record, patch)
            } else {
                record
            }
        })
        .collect()
}

/// [`modify`] returning owned records.
pub fn modify_owned(patch: &Mapping, matcher: &Matcher, records: &[Record]) -> Vec<Record> {
    modify(patch, matcher, records)
        .into_iter()
        .map(Cow::into_owned)
        .collect()
}

/// Applies every rule to every record.
///
/// Each rule is tested against the record as it was given, and the patches
/// of all matching rules are merged in rule order, so later rules win on
/// shared keys.
///
/// # Example
///
/// ```
/// use eventkit::{modify_bulk, Rule};
/// use serde_json::json;
///
/// let rules = vec![Rule::from_value(json!({
///     "matcher": "type=='generic'",
///     "modifications": {"tag": "g"}
/// }))
/// .unwrap()];
/// let records = vec![json!({"type": "generic"}), json!({"type": "other"})];
///
/// let out = modify_bulk(&rules, &records);
/// assert_eq!(*out[0], json!({"type": "generic", "tag": "g"}));
/// assert_eq!(*out[1], json!({"type": "other"}));
/// ```
pub fn modify_bulk<'a>(rules: &[Rule], records: &'a [Record]) -> Vec<Cow<'a, Record>> {
    let mut patched = 0usize;
    let out: Vec<Cow<'a, Record>> = records
        .iter()
        .map(|original| {
            let mut record = Cow::Borrowed(original);
            for rule in rules.iter().filter(|rule| rule.matcher.is_match(original)) {
                record = apply_patch(record, &rule.patch);
            }
            if matches!(record, Cow::Owned(_)) {
                patched += 1;
            }
            record
        })
        .collect();
    log::debug!(
        "applied {} rule(s) to {} record(s), {} patched",
        rules.len(),
        records.len(),
        patched
    );
    out
}

/// [`modify_bulk`] returning owned records.
pub fn modify_bulk_owned(rules: &[Rule], records: &[Record]) -> Vec<Record> {
    modify_bulk(rules, records)
        .into_iter()
        .map(Cow::into_owned)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn patch(value: Value) -> Mapping {
        value.as_object().cloned().unwrap()
    }

    fn records() -> Vec<Record> {
        vec![
            json!({"type": "generic", "uuid": "123", "timestamp": 1}),
            json!({"type": "other", "payload": {"ACPExtensionEventSource": "s"}}),
        ]
    }

    #[test]
    fn modify_patches_matches_only() {
        let input = records();
        let matcher = Matcher::parse("type=='generic'").unwrap();
        let out = modify(&patch(json!({"color": "red"})), &matcher, &input);

        assert_eq!(out.len(), 2);
        assert_eq!(out[0]["color"], "red");
        assert_eq!(out[0]["uuid"], "123");
        assert!(out[1].get("color").is_none());
    }

    #[test]
    fn modify_borrows_untouched_records() {
        let input = records();
        let matcher = Matcher::parse("type=='generic'").unwrap();
        let out = modify(&patch(json!({"color": "red"})), &matcher, &input);

        assert!(matches!(out[0], Cow::Owned(_)));
        match &out[1] {
            Cow::Borrowed(r) => assert!(std::ptr::eq(*r, &input[1])),
            Cow::Owned(_) => panic!("non-matching record was copied"),
        }
    }

    #[test]
    fn modify_never_mutates_input() {
        let input = records();
        let before = input.clone();
        let matcher = Matcher::all(["type"]).unwrap();
        let _ = modify(&patch(json!({"type": "changed"})), &matcher, &input);
        assert_eq!(input, before);
    }

    #[test]
    fn patch_keys_win_and_merge_is_shallow() {
        let input = vec![json!({"type": "generic", "payload": {"a": 1, "b": 2}})];
        let matcher = Matcher::parse("type").unwrap();
        let out = modify_owned(&patch(json!({"type": "x", "payload": {"c": 3}})), &matcher, &input);
        assert_eq!(out[0], json!({"type": "x", "payload": {"c": 3}}));
    }

    #[test]
    fn non_mapping_records_pass_through() {
        let input = vec![json!("generic"), json!([1, 2])];
        let everything = Matcher::all(Vec::<Term>::new()).unwrap();
        let out = modify(&patch(json!({"tag": "g"})), &everything, &input);
        assert_eq!(out[0].as_ref(), &input[0]);
        assert_eq!(out[1].as_ref(), &input[1]);
    }

    #[test]
    fn bulk_accumulates_matching_rules() {
        let input = records();
        let rules = vec![
            Rule::from_value(json!({"matcher": "type=='generic'", "modifications": {"color": "red"}}))
                .unwrap(),
            Rule::from_value(json!({"matcher": {"any": ["uuid", "payload"]}, "mods": {"size": "large"}}))
                .unwrap(),
        ];
        let out = modify_bulk_owned(&rules, &input);

        assert_eq!(out.len(), 2);
        assert_eq!(out[0]["color"], "red");
        assert_eq!(out[0]["uuid"], "123");
        assert!(out[1].get("color").is_none());
        assert_eq!(out[0]["size"], "large");
        assert_eq!(out[1]["size"], "large");
    }

    #[test]
    fn later_rules_win() {
        let input = vec![json!({"type": "generic"})];
        let rules = vec![
            Rule::new("type", patch(json!({"tag": "first", "a": 1}))).unwrap(),
            Rule::new("type", patch(json!({"tag": "second"}))).unwrap(),
        ];
        let out = modify_bulk_owned(&rules, &input);
        assert_eq!(out[0], json!({"type": "generic", "tag": "second", "a": 1}));
    }

    #[test]
    fn rules_match_against_the_original_record() {
        let input = vec![json!({"type": "generic"})];
        let rules = vec![
            Rule::new("type", patch(json!({"tag": "g"}))).unwrap(),
            Rule::new("tag", patch(json!({"seen": true}))).unwrap(),
        ];
        let out = modify_bulk_owned(&rules, &input);
        assert_eq!(out[0], json!({"type": "generic", "tag": "g"}));
    }

    #[test]
    fn bulk_with_no_rules_is_identity() {
        let input = records();
        let out = modify_bulk(&[], &input);
        assert!(out.iter().all(|r| matches!(r, Cow::Borrowed(_))));
        assert_eq!(modify_bulk_owned(&[], &input), input);
    }

    #[test]
    fn rule_patch_field_validation() {
        assert!(matches!(
            Rule::from_value(json!({"matcher": "a", "modifications": {}, "mods": {}})),
            Err(KitError::ConflictingPatch)
        ));
        assert!(matches!(
            Rule::from_value(json!({"matcher": "a"})),
            Err(KitError::MissingPatch)
        ));
        assert!(matches!(
            Rule::from_value(json!({"matcher": "a==", "mods": {}})),
            Err(KitError::InvalidRule(_))
        ));
        assert!(matches!(
            Rule::from_value(json!({"mods": {}})),
            Err(KitError::InvalidRule(_))
        ));
    }

    #[test]
    fn rules_deserialize_in_lists() {
        let rules: Vec<Rule> = serde_json::from_value(json!([
            {"matcher": "a", "mods": {"x": 1}},
            {"matcher": ["a", "b"], "modifications": {"y": 2}},
        ]))
        .unwrap();
        assert_eq!(rules.len(), 2);
        assert_eq!(rules[1].matcher, Matcher::all(["a", "b"]).unwrap());

        let written = serde_json::to_value(&rules[0]).unwrap();
        assert_eq!(written, json!({"matcher": "a", "modifications": {"x": 1}}));
    }
}
