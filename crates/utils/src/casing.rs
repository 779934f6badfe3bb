//! Structural key-casing conversion for JSON payloads.
//!
//! Records are stored and served in camelCase while relational-style
//! clients speak snake_case. [`to_camel_case`] and [`to_snake_case`] walk a
//! [`serde_json::Value`] and rewrite every object key, recursing through
//! arrays and nested objects. Scalars and `null` pass through unchanged.
//!
//! The conversion is a bijection only over a restricted key grammar: ASCII
//! lowercase words, each optionally followed by digits, joined by single
//! underscores (`jira_issue_id`, `step2_name`) or by a capitalised word start
//! (`jiraIssueId`, `step2Name`). Acronyms (`ABTest`), leading underscores
//! and digit-led words (`id_2x`) are still rewritten but are not guaranteed
//! to survive a round trip. Use [`is_round_trip_key`] to check a key.

use std::{fmt, str::FromStr, sync::LazyLock};

use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

static UNDERSCORE_LETTER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"_([a-z])").expect("valid regex"));
static UPPERCASE_LETTER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[A-Z]").expect("valid regex"));
static SNAKE_GRAMMAR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z]+[0-9]*(?:_[a-z]+[0-9]*)*$").expect("valid regex"));
static CAMEL_GRAMMAR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z]+[0-9]*(?:[A-Z][a-z]*[0-9]*)*$").expect("valid regex"));

/// Rewrite a single snake_case key as camelCase (`due_date` -> `dueDate`).
pub fn camel_key(key: &str) -> String {
    UNDERSCORE_LETTER
        .replace_all(key, |caps: &Captures| caps[1].to_ascii_uppercase())
        .into_owned()
}

/// Rewrite a single camelCase key as snake_case (`dueDate` -> `due_date`).
pub fn snake_key(key: &str) -> String {
    UPPERCASE_LETTER
        .replace_all(key, |caps: &Captures| format!("_{}", caps[0].to_ascii_lowercase()))
        .into_owned()
}

/// Whether `key` belongs to the grammar over which the two conversions are
/// exact inverses of each other.
pub fn is_round_trip_key(key: &str) -> bool {
    SNAKE_GRAMMAR.is_match(key) || CAMEL_GRAMMAR.is_match(key)
}

/// Recursively rewrite every object key in `value` to camelCase.
pub fn to_camel_case(value: &Value) -> Value {
    transform_keys(value, &camel_key, &[])
}

/// Recursively rewrite every object key in `value` to snake_case.
pub fn to_snake_case(value: &Value) -> Value {
    transform_keys(value, &snake_key, &[])
}

/// `opaque` names (in camelCase) fields whose values are user data: the key
/// itself is renamed but everything beneath it is copied verbatim.
fn transform_keys(value: &Value, rename: &dyn Fn(&str) -> String, opaque: &[&str]) -> Value {
    match value {
        Value::Array(items) => Value::Array(
            items
                .iter()
                .map(|item| transform_keys(item, rename, opaque))
                .collect(),
        ),
        Value::Object(map) => {
            let mut out = Map::with_capacity(map.len());
            for (key, inner) in map {
                let inner = if opaque.contains(&camel_key(key).as_str()) {
                    inner.clone()
                } else {
                    transform_keys(inner, rename, opaque)
                };
                out.insert(rename(key), inner);
            }
            Value::Object(out)
        }
        scalar => scalar.clone(),
    }
}

/// Key convention applied to a payload at the API boundary.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KeyCase {
    #[default]
    Camel,
    Snake,
}

impl KeyCase {
    pub fn apply(self, value: &Value) -> Value {
        self.apply_preserving(value, &[])
    }

    /// Like [`KeyCase::apply`], but leaves the contents of the `opaque`
    /// fields (named in camelCase) untouched.
    pub fn apply_preserving(self, value: &Value, opaque: &[&str]) -> Value {
        match self {
            KeyCase::Camel => transform_keys(value, &camel_key, opaque),
            KeyCase::Snake => transform_keys(value, &snake_key, opaque),
        }
    }
}

impl fmt::Display for KeyCase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeyCase::Camel => f.write_str("camel"),
            KeyCase::Snake => f.write_str("snake"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown key case '{0}', expected 'camel' or 'snake'")]
pub struct UnknownKeyCase(pub String);

impl FromStr for KeyCase {
    type Err = UnknownKeyCase;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "camel" | "camelcase" => Ok(KeyCase::Camel),
            "snake" | "snake_case" => Ok(KeyCase::Snake),
            other => Err(UnknownKeyCase(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;
    use serde_json::json;

    use super::*;

    #[test]
    fn test_camel_key_rewrites_each_underscore_letter() {
        assert_eq!(camel_key("jira_issue_id"), "jiraIssueId");
        assert_eq!(camel_key("created_at"), "createdAt");
        assert_eq!(camel_key("name"), "name");
        assert_eq!(camel_key("item_2"), "item_2");
    }

    #[test]
    fn test_snake_key_rewrites_each_uppercase_letter() {
        assert_eq!(snake_key("jiraIssueId"), "jira_issue_id");
        assert_eq!(snake_key("updatedAt"), "updated_at");
        assert_eq!(snake_key("ABTest"), "_a_b_test");
    }

    #[test]
    fn test_nested_structures_are_converted() {
        let input = json!({
            "team_id": "t1",
            "custom_fields": { "story_points": 3 },
            "labels": ["needs_review"],
            "sub_items": [{ "due_date": null }]
        });
        let camel = to_camel_case(&input);
        assert_eq!(
            camel,
            json!({
                "teamId": "t1",
                "customFields": { "storyPoints": 3 },
                "labels": ["needs_review"],
                "subItems": [{ "dueDate": null }]
            })
        );
        assert_eq!(to_snake_case(&camel), input);
    }

    #[test]
    fn test_opaque_fields_keep_their_contents() {
        let input = json!({
            "milestone_id": "m1",
            "custom_fields": { "sprint_goal": "ship", "releaseV2": true },
            "children": [{ "customFields": { "story_points": 3 }, "due_date": null }]
        });

        let camel = KeyCase::Camel.apply_preserving(&input, &["customFields"]);
        assert_eq!(
            camel,
            json!({
                "milestoneId": "m1",
                "customFields": { "sprint_goal": "ship", "releaseV2": true },
                "children": [{ "customFields": { "story_points": 3 }, "dueDate": null }]
            })
        );

        let snake = KeyCase::Snake.apply_preserving(&camel, &["customFields"]);
        assert_eq!(snake["custom_fields"], json!({ "sprint_goal": "ship", "releaseV2": true }));
        assert_eq!(snake["children"][0]["custom_fields"], json!({ "story_points": 3 }));
        assert_eq!(snake["children"][0]["due_date"], Value::Null);
    }

    #[test]
    fn test_scalars_pass_through() {
        for value in [json!(null), json!(42), json!("some_value"), json!(true)] {
            assert_eq!(to_camel_case(&value), value);
            assert_eq!(to_snake_case(&value), value);
        }
    }

    #[test]
    fn test_input_is_not_mutated() {
        let input = json!({ "parent_id": "p" });
        let snapshot = input.clone();
        let _ = to_camel_case(&input);
        assert_eq!(input, snapshot);
    }

    #[test]
    fn test_round_trip_grammar() {
        assert!(is_round_trip_key("jira_issue_id"));
        assert!(is_round_trip_key("jiraIssueId"));
        assert!(is_round_trip_key("step2_name"));
        assert!(!is_round_trip_key("ABTest"));
        assert!(!is_round_trip_key("_private"));
        assert!(!is_round_trip_key("double__underscore"));
    }

    #[test]
    fn test_key_case_parsing() {
        assert_eq!("snake".parse::<KeyCase>(), Ok(KeyCase::Snake));
        assert_eq!("Camel".parse::<KeyCase>(), Ok(KeyCase::Camel));
        assert!("kebab".parse::<KeyCase>().is_err());
    }

    fn snake_word() -> impl Strategy<Value = String> {
        "[a-z]{1,6}[0-9]{0,2}"
    }

    fn snake_key_strategy() -> impl Strategy<Value = String> {
        prop::collection::vec(snake_word(), 1..4).prop_map(|words| words.join("_"))
    }

    fn snake_object() -> impl Strategy<Value = Value> {
        let leaf = prop_oneof![
            Just(Value::Null),
            any::<i64>().prop_map(Value::from),
            "[a-z_]{0,8}".prop_map(Value::from),
        ];
        leaf.prop_recursive(3, 24, 4, |inner| {
            prop_oneof![
                prop::collection::vec(inner.clone(), 0..4).prop_map(Value::Array),
                prop::collection::btree_map(snake_key_strategy(), inner, 0..4)
                    .prop_map(|map| Value::Object(map.into_iter().collect())),
            ]
        })
    }

    proptest! {
        #[test]
        fn prop_snake_keys_survive_round_trip(key in snake_key_strategy()) {
            prop_assert!(is_round_trip_key(&key));
            prop_assert_eq!(snake_key(&camel_key(&key)), key);
        }

        #[test]
        fn prop_camel_keys_survive_round_trip(key in snake_key_strategy()) {
            let camel = camel_key(&key);
            prop_assert!(is_round_trip_key(&camel));
            prop_assert_eq!(camel_key(&snake_key(&camel)), camel);
        }

        #[test]
        fn prop_objects_survive_round_trip(value in snake_object()) {
            prop_assert_eq!(to_snake_case(&to_camel_case(&value)), value.clone());
            let camel = to_camel_case(&value);
            prop_assert_eq!(to_camel_case(&to_snake_case(&camel)), camel);
        }
    }
}
