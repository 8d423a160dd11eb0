//! Request descriptors.

use serde_json::{Map, Value};
use viralapp_types::clean_empty;

use crate::url::normalize_path;

/// Endpoints that must always receive a JSON body on POST, even an empty one.
pub const EXPORT_PATHS: [&str; 3] = [
    "/videos/export",
    "/accounts/export",
    "/analytics/video-daily-gains/export",
];

/// HTTP verbs used by the ViralApp API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    /// GET
    Get,
    /// POST
    Post,
    /// PUT
    Put,
    /// PATCH
    Patch,
    /// DELETE
    Delete,
}

impl HttpMethod {
    /// Returns the method name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Patch => "PATCH",
            Self::Delete => "DELETE",
        }
    }

    /// Returns true for verbs that always carry a JSON body.
    #[must_use]
    pub const fn carries_body(&self) -> bool {
        matches!(self, Self::Post | Self::Put | Self::Patch)
    }
}

impl std::fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single API call: method, path, query and body.
///
/// Query and body are kept as raw JSON objects and cleaned of empty entries
/// when the request is serialized.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    /// HTTP method.
    pub method: HttpMethod,
    /// Endpoint path relative to the API root, with a leading slash.
    pub path: String,
    /// Query parameters.
    pub query: Map<String, Value>,
    /// JSON body; ignored for GET and DELETE.
    pub body: Map<String, Value>,
    /// Send the body as given instead of cleaning it.
    pub verbatim_body: bool,
}

impl ApiRequest {
    /// Creates a request with an empty query and body.
    pub fn new(method: HttpMethod, path: impl AsRef<str>) -> Self {
        Self {
            method,
            path: normalize_path(path.as_ref()),
            query: Map::new(),
            body: Map::new(),
            verbatim_body: false,
        }
    }

    /// Creates a GET request.
    pub fn get(path: impl AsRef<str>) -> Self {
        Self::new(HttpMethod::Get, path)
    }

    /// Creates a POST request.
    pub fn post(path: impl AsRef<str>) -> Self {
        Self::new(HttpMethod::Post, path)
    }

    /// Creates a PUT request.
    pub fn put(path: impl AsRef<str>) -> Self {
        Self::new(HttpMethod::Put, path)
    }

    /// Creates a DELETE request.
    pub fn delete(path: impl AsRef<str>) -> Self {
        Self::new(HttpMethod::Delete, path)
    }

    /// Merges query parameters into the request.
    #[must_use]
    pub fn with_query(mut self, query: Map<String, Value>) -> Self {
        self.query.extend(query);
        self
    }

    /// Sets one query parameter.
    #[must_use]
    pub fn with_query_param(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.query.insert(key.into(), value.into());
        self
    }

    /// Replaces the body.
    #[must_use]
    pub fn with_body(mut self, body: Map<String, Value>) -> Self {
        self.body = body;
        self
    }

    /// Sends the body exactly as given, so explicit empty lists survive.
    #[must_use]
    pub const fn verbatim(mut self) -> Self {
        self.verbatim_body = true;
        self
    }

    /// Returns true if this is a POST to one of the [`EXPORT_PATHS`].
    #[must_use]
    pub fn is_export(&self) -> bool {
        self.method == HttpMethod::Post && EXPORT_PATHS.contains(&self.path.as_str())
    }

    /// Serializes the query in repeat format (`key=a&key=b`).
    ///
    /// Empty entries are dropped; nested objects become bracketed keys.
    #[must_use]
    pub fn query_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = Vec::new();
        for (key, value) in clean_empty(&self.query) {
            push_pairs(&mut pairs, &key, &value);
        }
        pairs
    }

    /// Returns the body to send, or `None` for verbs without one.
    ///
    /// POST, PUT and PATCH always produce an object, `{}` when nothing is left.
    #[must_use]
    pub fn json_body(&self) -> Option<Value> {
        if !self.method.carries_body() {
            return None;
        }
        let body = if self.verbatim_body {
            self.body.clone()
        } else {
            clean_empty(&self.body)
        };
        Some(Value::Object(body))
    }
}

fn push_pairs(pairs: &mut Vec<(String, String)>, key: &str, value: &Value) {
    match value {
        Value::Null => {}
        Value::String(s) => pairs.push((key.to_string(), s.clone())),
        Value::Number(n) => pairs.push((key.to_string(), n.to_string())),
        Value::Bool(b) => pairs.push((key.to_string(), b.to_string())),
        Value::Array(items) => items.iter().for_each(|item| push_pairs(pairs, key, item)),
        Value::Object(map) => {
            for (sub_key, sub_value) in map {
                push_pairs(pairs, &format!("{key}[{sub_key}]"), sub_value);
            }
        }
    }
}
