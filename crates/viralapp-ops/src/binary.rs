//! Follow-fetch of pre-signed file URLs.

use serde_json::{Map, Value};
use tracing::debug;
use viralapp_fetch::Transport;
use viralapp_types::{Result, clean_empty};

use crate::{BinaryData, FileItem, OperationOutput};

/// MIME type assumed for export files.
pub(crate) const EXPORT_MIME: &str = "text/csv";
/// MIME type assumed for video downloads.
pub(crate) const VIDEO_MIME: &str = "video/mp4";

/// Which metadata field accompanies the file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum FileKind {
    /// CSV exports report `rowCount`.
    Export,
    /// Video downloads report `consumedExtraCredit`.
    Download,
}

impl FileKind {
    const fn extra_field(self) -> &'static str {
        match self {
            Self::Export => "rowCount",
            Self::Download => "consumedExtraCredit",
        }
    }
}

/// Downloads the file a response points at through `downloadUrl`.
///
/// A response without a usable `downloadUrl` is returned unchanged.
pub(crate) async fn follow_download(
    transport: &dyn Transport,
    response: Value,
    default_file_name: &str,
    fallback_mime: &str,
    kind: FileKind,
) -> Result<OperationOutput> {
    let Some(url) = string_field(&response, "downloadUrl") else {
        return Ok(OperationOutput::from_response(response));
    };

    let file_name =
        string_field(&response, "fileName").unwrap_or_else(|| default_file_name.to_string());
    let mime_type = string_field(&response, "contentType")
        .or_else(|| string_field(&response, "mimeType"))
        .unwrap_or_else(|| fallback_mime.to_string());

    let data = transport.download(&url).await?;
    debug!(file_name, bytes = data.len(), "downloaded attachment");

    let mut meta = Map::new();
    meta.insert("fileName".to_string(), Value::String(file_name.clone()));
    meta.insert("downloadUrl".to_string(), Value::String(url));
    for field in ["expiresAt", kind.extra_field()] {
        if let Some(value) = response.get(field) {
            meta.insert(field.to_string(), value.clone());
        }
    }

    Ok(OperationOutput::Files(vec![FileItem {
        json: Value::Object(clean_empty(&meta)),
        binary: BinaryData {
            data,
            file_name,
            mime_type,
        },
    }]))
}

fn string_field(value: &Value, key: &str) -> Option<String> {
    value
        .get(key)
        .and_then(Value::as_str)
        .filter(|s| !s.trim().is_empty())
        .map(str::to_string)
}
