//! Operation results and their normalization into host records.

use bytes::Bytes;
use serde::Serialize;
use serde_json::{Map, Value, json};

/// A file produced by an export or a video download.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BinaryData {
    /// Raw file contents.
    #[serde(skip_serializing)]
    pub data: Bytes,
    /// Suggested file name.
    pub file_name: String,
    /// MIME type of the contents.
    pub mime_type: String,
}

impl BinaryData {
    /// Size of the contents in bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns true if the file is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// One output item that carries a file alongside its metadata.
#[derive(Debug, Clone, PartialEq)]
pub struct FileItem {
    /// Metadata describing the file.
    pub json: Value,
    /// The attached file.
    pub binary: BinaryData,
}

/// What a handler returns.
#[derive(Debug, Clone, PartialEq)]
pub enum OperationOutput {
    /// Nothing to report.
    Empty,
    /// A single value.
    Record(Value),
    /// A list of values.
    Records(Vec<Value>),
    /// Items with attached files.
    Files(Vec<FileItem>),
}

impl OperationOutput {
    /// Wraps a raw API response: arrays become records, `null` becomes empty.
    #[must_use]
    pub fn from_response(value: Value) -> Self {
        match value {
            Value::Null => Self::Empty,
            Value::Array(items) => Self::Records(items),
            other => Self::Record(other),
        }
    }

    /// Normalizes the output into execution records paired with `item`.
    ///
    /// Objects pass through, other values are wrapped as `{"value": ...}`, and
    /// an empty result yields a single `{"success": true}` record.
    #[must_use]
    pub fn into_records(self, item: usize) -> Vec<ExecutionRecord> {
        let records: Vec<ExecutionRecord> = match self {
            Self::Empty => Vec::new(),
            Self::Record(Value::Array(items)) | Self::Records(items) => items
                .into_iter()
                .map(|value| ExecutionRecord::new(value, item))
                .collect(),
            Self::Record(Value::Null) => Vec::new(),
            Self::Record(value) => vec![ExecutionRecord::new(value, item)],
            Self::Files(files) => files
                .into_iter()
                .map(|file| ExecutionRecord {
                    binary: Some(file.binary),
                    ..ExecutionRecord::new(file.json, item)
                })
                .collect(),
        };

        if records.is_empty() {
            return vec![ExecutionRecord::new(json!({"success": true}), item)];
        }
        records
    }
}

/// One record emitted to the host.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutionRecord {
    /// Record payload; always an object.
    pub json: Map<String, Value>,
    /// Attached file, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub binary: Option<BinaryData>,
    /// Index of the input item this record came from.
    pub paired_item: usize,
}

impl ExecutionRecord {
    /// Creates a record, wrapping non-object values as `{"value": ...}`.
    #[must_use]
    pub fn new(value: Value, paired_item: usize) -> Self {
        let json = match value {
            Value::Object(map) => map,
            other => {
                let mut map = Map::new();
                map.insert("value".to_string(), other);
                map
            }
        };
        Self {
            json,
            binary: None,
            paired_item,
        }
    }

    /// Creates the error record emitted under continue-on-fail.
    #[must_use]
    pub fn failure(message: &str, resource: &str, operation: &str, paired_item: usize) -> Self {
        Self::new(
            json!({"error": message, "resource": resource, "operation": operation}),
            paired_item,
        )
    }
}
