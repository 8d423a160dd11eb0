//! Resolved operation parameters.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use viralapp_types::{Result, ViralAppError, normalize_id, normalize_ids};

/// The bag of parameter values a host resolved for one invocation.
///
/// Lookups accept dotted paths (`options.simplifyOutput`), and a JSON `null`
/// reads the same as a missing key.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Parameters(Map<String, Value>);

impl Parameters {
    /// Creates an empty parameter bag.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Wraps a JSON value; anything but an object yields an empty bag.
    #[must_use]
    pub fn from_value(value: Value) -> Self {
        match value {
            Value::Object(map) => Self(map),
            _ => Self::default(),
        }
    }

    /// Sets a top-level parameter.
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    /// Returns the underlying map.
    #[must_use]
    pub const fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    /// Looks up a value by dotted path.
    #[must_use]
    pub fn get(&self, path: &str) -> Option<&Value> {
        let mut segments = path.split('.');
        let first = segments.next()?;
        let mut current = self.0.get(first)?;
        for segment in segments {
            current = current.get(segment)?;
        }
        (!current.is_null()).then_some(current)
    }

    /// Returns a string parameter.
    #[must_use]
    pub fn str(&self, path: &str) -> Option<&str> {
        self.get(path).and_then(Value::as_str)
    }

    /// Returns an integer parameter, accepting numeric strings.
    #[must_use]
    pub fn i64(&self, path: &str) -> Option<i64> {
        match self.get(path)? {
            Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    /// Returns a boolean flag; missing or non-boolean values read as `false`.
    #[must_use]
    pub fn flag(&self, path: &str) -> bool {
        match self.get(path) {
            Some(Value::Bool(b)) => *b,
            Some(Value::String(s)) => s.eq_ignore_ascii_case("true"),
            _ => false,
        }
    }

    /// Returns a nested collection, empty when missing.
    #[must_use]
    pub fn collection(&self, path: &str) -> Self {
        self.get(path).cloned().map(Self::from_value).unwrap_or_default()
    }

    /// Returns the entries of a repeated collection such as `accounts.account`.
    ///
    /// A single object counts as one entry.
    #[must_use]
    pub fn entries(&self, path: &str) -> Vec<Self> {
        match self.get(path) {
            Some(Value::Array(items)) => items.iter().cloned().map(Self::from_value).collect(),
            Some(object @ Value::Object(_)) => vec![Self::from_value(object.clone())],
            _ => Vec::new(),
        }
    }

    /// Returns the single ID behind a scalar or locator parameter.
    #[must_use]
    pub fn id(&self, path: &str) -> Option<String> {
        normalize_id(self.get(path))
    }

    /// Returns the ID list behind a scalar, locator or list parameter.
    #[must_use]
    pub fn ids(&self, path: &str) -> Option<Vec<String>> {
        normalize_ids(self.get(path))
    }

    /// Returns a required ID, failing with `message` when it is missing.
    ///
    /// # Errors
    ///
    /// Returns a validation error when no ID can be derived.
    pub fn required_id(&self, path: &str, message: &str) -> Result<String> {
        self.id(path).ok_or_else(|| ViralAppError::validation(message))
    }
}

impl From<Map<String, Value>> for Parameters {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn params(value: Value) -> Parameters {
        Parameters::from_value(value)
    }

    #[test]
    fn test_dotted_lookup() {
        let p = params(json!({"options": {"simplifyOutput": true}, "nothing": null}));
        assert!(p.flag("options.simplifyOutput"));
        assert!(!p.flag("options.missing"));
        assert!(p.get("nothing").is_none());
    }

    #[test]
    fn test_entries() {
        let p = params(json!({
            "accounts": {"account": [{"platform": "tiktok"}, {"platform": "youtube"}]},
            "single": {"entry": {"x": 1}},
        }));
        let entries = p.entries("accounts.account");
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[1].str("platform"), Some("youtube"));
        assert_eq!(p.entries("single.entry").len(), 1);
        assert!(p.entries("missing.entry").is_empty());
    }

    #[test]
    fn test_numbers() {
        let p = params(json!({"limit": 25, "text": " 7 ", "float": 3.0}));
        assert_eq!(p.i64("limit"), Some(25));
        assert_eq!(p.i64("text"), Some(7));
        assert_eq!(p.i64("float"), Some(3));
    }

    #[test]
    fn test_ids() {
        let p = params(json!({"projectId": {"mode": "list", "value": "p1"}, "blank": " "}));
        assert_eq!(p.id("projectId"), Some("p1".to_string()));
        assert!(p.required_id("blank", "Project ID is required.").is_err());
    }
}
