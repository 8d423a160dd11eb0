//! ViralApp base URL resolution.

use viralapp_types::{Result, ViralAppError};

/// Production API root.
pub const DEFAULT_BASE_URL: &str = "https://viral.app/api/v1";

/// Environment variable that overrides [`DEFAULT_BASE_URL`].
pub const BASE_URL_ENV: &str = "VIRALAPP_BASE_URL";

/// Resolves the API root from an optional override.
///
/// The override is trimmed and loses one trailing slash. When it is absent the
/// default is used.
///
/// # Example
///
/// ```
/// use viralapp_fetch::url::resolve_base_url;
///
/// assert_eq!(resolve_base_url(None).unwrap(), "https://viral.app/api/v1");
/// assert_eq!(
///     resolve_base_url(Some(" https://preview.viral.app/api/v1/ ")).unwrap(),
///     "https://preview.viral.app/api/v1"
/// );
/// ```
///
/// # Errors
///
/// Returns a configuration error if the override is present but blank.
pub fn resolve_base_url(override_value: Option<&str>) -> Result<String> {
    let Some(value) = override_value else {
        return Ok(DEFAULT_BASE_URL.to_string());
    };

    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ViralAppError::Config(format!(
            "{BASE_URL_ENV} is set but empty. Set it to https://preview.viral.app/api/v1 or {DEFAULT_BASE_URL}."
        )));
    }

    Ok(trimmed.strip_suffix('/').unwrap_or(trimmed).to_string())
}

/// Ensures an endpoint path starts with a single leading slash.
#[must_use]
pub fn normalize_path(path: &str) -> String {
    if path.starts_with('/') {
        path.to_string()
    } else {
        format!("/{path}")
    }
}

/// Joins the API root and an endpoint path.
#[must_use]
pub fn endpoint_url(base_url: &str, path: &str) -> String {
    format!("{}{}", base_url.trim_end_matches('/'), normalize_path(path))
}
