//! Filter-set cleaning and list parsing.

use serde_json::{Map, Value};

/// Removes empty entries from a JSON object, recursing into nested objects.
///
/// An entry is empty when it is null, a blank string, a list with no
/// remaining elements once its strings are trimmed and its null/blank
/// elements dropped, or an object that is itself empty after cleaning.
/// Surviving strings are trimmed. Numbers and booleans are always kept,
/// including `0` and `false`.
#[must_use]
pub fn clean_empty(input: &Map<String, Value>) -> Map<String, Value> {
    input
        .iter()
        .filter_map(|(key, value)| clean_value(value).map(|v| (key.clone(), v)))
        .collect()
}

/// Cleans a single value, returning `None` if it is empty.
#[must_use]
pub fn clean_value(value: &Value) -> Option<Value> {
    match value {
        Value::Null => None,
        Value::String(s) => {
            let trimmed = s.trim();
            (!trimmed.is_empty()).then(|| Value::String(trimmed.to_string()))
        }
        Value::Array(items) => {
            let cleaned: Vec<Value> = items
                .iter()
                .filter_map(|item| match item {
                    Value::Null => None,
                    Value::String(s) => {
                        let trimmed = s.trim();
                        (!trimmed.is_empty()).then(|| Value::String(trimmed.to_string()))
                    }
                    other => Some(other.clone()),
                })
                .collect();
            (!cleaned.is_empty()).then_some(Value::Array(cleaned))
        }
        Value::Object(map) => {
            let cleaned = clean_empty(map);
            (!cleaned.is_empty()).then_some(Value::Object(cleaned))
        }
        other => Some(other.clone()),
    }
}

/// Splits a comma-separated list, trimming entries and dropping blanks.
///
/// An all-blank input yields an empty list.
#[must_use]
pub fn parse_hashtags(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|tag| !tag.is_empty())
        .map(str::to_string)
        .collect()
}
