//! Transport port.

use async_trait::async_trait;
use bytes::Bytes;
use serde_json::Value;
use viralapp_types::Result;

use crate::ApiRequest;

/// Executes API requests.
///
/// This trait separates request building and pagination from the HTTP
/// library, so handlers can run against [`ApiClient`](crate::ApiClient) or an
/// in-memory double.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Sends an authenticated API request and returns the decoded JSON body.
    ///
    /// A successful response with an empty body decodes to `Value::Null`.
    ///
    /// # Errors
    ///
    /// Returns `NotFound`, `Unauthorized`, `RateLimited` or `Api` for non-2xx
    /// responses and network failures.
    async fn send(&self, request: &ApiRequest) -> Result<Value>;

    /// Fetches the raw bytes behind a pre-signed download URL.
    ///
    /// # Errors
    ///
    /// Returns the same error kinds as [`Transport::send`].
    async fn download(&self, url: &str) -> Result<Bytes>;
}
