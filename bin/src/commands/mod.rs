//! CLI command implementations.

pub(crate) mod run;
pub(crate) mod search;
pub(crate) mod verify;

use anyhow::{Context, Result};
use viralapp_lib::prelude::*;
use viralapp_lib::url::resolve_base_url;

/// Builds the API client from the global flags.
pub(crate) fn build_client(api_key: Option<&str>, base_url: Option<&str>) -> Result<ApiClient> {
    let api_key = ApiKey::new(api_key.unwrap_or_default())
        .context("Pass --api-key or set VIRALAPP_API_KEY")?;
    let config = match base_url {
        Some(url) => ClientConfig::default().with_base_url(resolve_base_url(Some(url))?),
        None => ClientConfig::from_env()?,
    };
    Ok(ApiClient::new(config, api_key)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_client_with_base_url() {
        let client = build_client(Some("k"), Some(" http://localhost:4010/api/v1/ ")).unwrap();
        assert_eq!(client.config().base_url, "http://localhost:4010/api/v1");
    }

    #[test]
    fn test_build_client_requires_key() {
        assert!(build_client(None, Some("http://localhost:4010/api/v1")).is_err());
        assert!(build_client(Some("  "), None).is_err());
    }
}
