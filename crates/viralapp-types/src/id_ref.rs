//! Entity references that may arrive as a raw ID, a locator object, or a list.

use serde_json::Value;

/// A caller-supplied reference to one or more entities.
///
/// Hosts hand these over in several shapes: `"abc"`, `42`,
/// `{"mode": "list", "value": "abc"}`, or a list mixing all of them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IdRef {
    /// A bare identifier.
    Scalar(String),
    /// A structured selection; the identifier is the first present of `value`, `id`, `name`.
    Locator {
        /// Selected value.
        value: Option<String>,
        /// Entity ID.
        id: Option<String>,
        /// Entity name.
        name: Option<String>,
    },
    /// Several references.
    List(Vec<IdRef>),
}

impl IdRef {
    /// Interprets a JSON value as a reference. Returns `None` for null and
    /// for values that cannot carry an identifier.
    #[must_use]
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::String(s) => Some(Self::Scalar(s.clone())),
            Value::Number(n) => Some(Self::Scalar(n.to_string())),
            Value::Array(items) => {
                Some(Self::List(items.iter().filter_map(Self::from_value).collect()))
            }
            Value::Object(map) => Some(Self::Locator {
                value: map.get("value").and_then(scalar_text),
                id: map.get("id").and_then(scalar_text),
                name: map.get("name").and_then(scalar_text),
            }),
            Value::Null | Value::Bool(_) => None,
        }
    }

    /// Returns the single identifier this reference points at.
    ///
    /// For a list this is its first usable entry.
    #[must_use]
    pub fn first_id(&self) -> Option<String> {
        match self {
            Self::Scalar(s) => non_blank(s),
            Self::Locator { value, id, name } => {
                value.as_deref().or(id.as_deref()).or(name.as_deref()).and_then(non_blank)
            }
            Self::List(items) => items.iter().find_map(Self::first_id),
        }
    }

    /// Flattens the reference into an ordered list of non-blank IDs.
    ///
    /// Returns `None` instead of an empty list so that callers omit the field.
    #[must_use]
    pub fn ids(&self) -> Option<Vec<String>> {
        let mut ids = Vec::new();
        self.collect_ids(&mut ids);
        (!ids.is_empty()).then_some(ids)
    }

    fn collect_ids(&self, out: &mut Vec<String>) {
        match self {
            Self::List(items) => items.iter().for_each(|item| item.collect_ids(out)),
            other => out.extend(other.first_id()),
        }
    }
}

impl From<&str> for IdRef {
    fn from(value: &str) -> Self {
        Self::Scalar(value.to_string())
    }
}

/// Normalizes an optional JSON parameter into a list of IDs.
#[must_use]
pub fn normalize_ids(value: Option<&Value>) -> Option<Vec<String>> {
    value.and_then(IdRef::from_value).and_then(|r| r.ids())
}

/// Extracts a single ID from an optional JSON parameter.
#[must_use]
pub fn normalize_id(value: Option<&Value>) -> Option<String> {
    value.and_then(IdRef::from_value).and_then(|r| r.first_id())
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn non_blank(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}
