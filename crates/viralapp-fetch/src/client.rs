//! HTTP client for the ViralApp API.

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, Method, Response};
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, warn};
use viralapp_types::{Result, ViralAppError};

use crate::url::{BASE_URL_ENV, DEFAULT_BASE_URL, endpoint_url, resolve_base_url};
use crate::{ApiRequest, HttpMethod, Transport};

/// Header carrying the API key.
pub const API_KEY_HEADER: &str = "x-api-key";

/// Configuration for the API client.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// API root, without a trailing slash.
    pub base_url: String,
    /// Request timeout.
    pub timeout: Duration,
    /// User agent string.
    pub user_agent: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(60),
            user_agent: format!("viralapp/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl ClientConfig {
    /// Creates a configuration whose base URL honours `VIRALAPP_BASE_URL`.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the variable is set but blank.
    pub fn from_env() -> Result<Self> {
        let base_url = resolve_base_url(std::env::var(BASE_URL_ENV).ok().as_deref())?;
        Ok(Self {
            base_url,
            ..Default::default()
        })
    }

    /// Sets the API root.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

/// The API key. Its `Debug` output is redacted.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKey(String);

impl ApiKey {
    /// Wraps a key.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the key is blank.
    pub fn new(key: impl Into<String>) -> Result<Self> {
        let key = key.into().trim().to_string();
        if key.is_empty() {
            return Err(ViralAppError::Config("API key is required".to_string()));
        }
        Ok(Self(key))
    }

    /// Returns the key itself.
    #[must_use]
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("ApiKey(***)")
    }
}

/// Authenticated HTTP client for the ViralApp API.
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
    config: ClientConfig,
    api_key: ApiKey,
}

impl ApiClient {
    /// Creates a new client with the given configuration and key.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the HTTP client cannot be created.
    pub fn new(config: ClientConfig, api_key: ApiKey) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .connect_timeout(Duration::from_secs(10))
            .user_agent(&config.user_agent)
            .gzip(true)
            .build()
            .map_err(|e| ViralAppError::Config(format!("failed to build HTTP client: {e}")))?;
        Ok(Self {
            client,
            config,
            api_key,
        })
    }

    /// Returns the client configuration.
    #[must_use]
    pub const fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Checks that the API key is accepted by issuing a cheap authenticated call.
    ///
    /// # Errors
    ///
    /// Returns `Unauthorized` for a rejected key, or any other transport error.
    pub async fn verify_credentials(&self) -> Result<()> {
        self.send(&ApiRequest::get("/accounts/tracked/count"))
            .await
            .map(|_| ())
    }

    /// Builds the `reqwest` request for a descriptor without sending it.
    ///
    /// # Errors
    ///
    /// Returns an `Api` error if the URL or body cannot be encoded.
    pub fn build_request(&self, request: &ApiRequest) -> Result<reqwest::Request> {
        let url = endpoint_url(&self.config.base_url, &request.path);
        let mut builder = self
            .client
            .request(to_reqwest_method(request.method), url)
            .header(API_KEY_HEADER, self.api_key.expose())
            .query(&request.query_pairs());

        if let Some(body) = request.json_body() {
            // Export endpoints reject requests without a parseable body.
            if request.is_export() {
                builder = builder.header(CONTENT_TYPE, "application/json");
            }
            builder = builder.json(&body);
        }

        builder.build().map_err(transport_error)
    }
}

#[async_trait]
impl Transport for ApiClient {
    async fn send(&self, request: &ApiRequest) -> Result<Value> {
        debug!(method = %request.method, path = %request.path, "sending request");
        let built = self.build_request(request)?;
        let response = self.client.execute(built).await.map_err(transport_error)?;
        let status = response.status().as_u16();
        let body = read_json(response).await?;

        if (200..300).contains(&status) {
            return Ok(body);
        }

        let error = classify_status(status, Some(body).filter(|b| !b.is_null()));
        warn!(
            method = %request.method,
            path = %request.path,
            status,
            error = %error,
            "request failed"
        );
        Err(error)
    }

    async fn download(&self, url: &str) -> Result<Bytes> {
        debug!(url, "downloading file");
        let response = self.client.get(url).send().await.map_err(transport_error)?;
        let status = response.status().as_u16();

        if !(200..300).contains(&status) {
            let body = read_json(response).await.ok().filter(|b| !b.is_null());
            let error = classify_status(status, body);
            warn!(status, error = %error, "download failed");
            return Err(error);
        }

        response.bytes().await.map_err(transport_error)
    }
}

/// Maps a non-2xx status and its body to an error.
///
/// 404, 401 and 429 get dedicated kinds; everything else becomes `Api` with
/// the body preserved.
#[must_use]
pub fn classify_status(status: u16, body: Option<Value>) -> ViralAppError {
    match status {
        404 => ViralAppError::NotFound { body },
        401 => ViralAppError::Unauthorized { body },
        429 => ViralAppError::RateLimited { body },
        _ => {
            let message = body
                .as_ref()
                .and_then(server_message)
                .unwrap_or_else(|| format!("ViralApp API request failed with status {status}"));
            ViralAppError::Api {
                status: Some(status),
                message,
                body,
            }
        }
    }
}

fn server_message(body: &Value) -> Option<String> {
    ["message", "error"]
        .iter()
        .find_map(|key| body.get(key).and_then(Value::as_str))
        .map(str::to_string)
}

async fn read_json(response: Response) -> Result<Value> {
    let text = response.text().await.map_err(transport_error)?;
    if text.trim().is_empty() {
        return Ok(Value::Null);
    }
    Ok(serde_json::from_str(&text).unwrap_or(Value::String(text)))
}

fn transport_error(error: reqwest::Error) -> ViralAppError {
    ViralAppError::Api {
        status: error.status().map(|s| s.as_u16()),
        message: format!("Request failed: {error}"),
        body: None,
    }
}

const fn to_reqwest_method(method: HttpMethod) -> Method {
    match method {
        HttpMethod::Get => Method::GET,
        HttpMethod::Post => Method::POST,
        HttpMethod::Put => Method::PUT,
        HttpMethod::Patch => Method::PATCH,
        HttpMethod::Delete => Method::DELETE,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use tokio::task::JoinHandle;
    use viralapp_types::ErrorKind;

    fn client() -> ApiClient {
        ApiClient::new(ClientConfig::default(), ApiKey::new("secret").unwrap()).unwrap()
    }

    /// Client pointed at a local server, bypassing any proxy from the environment.
    fn local_client(base_url: &str) -> ApiClient {
        ApiClient {
            client: Client::builder().no_proxy().build().unwrap(),
            config: ClientConfig::default().with_base_url(base_url),
            api_key: ApiKey::new("secret").unwrap(),
        }
    }

    /// Answers a single HTTP request with `status` and `body`.
    ///
    /// Returns the base URL and a handle yielding the raw request text.
    async fn serve_once(status: &'static str, body: &'static str) -> (String, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut raw = Vec::new();
            let mut chunk = [0u8; 1024];
            while !request_complete(&raw) {
                let n = socket.read(&mut chunk).await.unwrap();
                if n == 0 {
                    break;
                }
                raw.extend_from_slice(&chunk[..n]);
            }

            let response = format!(
                "HTTP/1.1 {status}\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
                body.len()
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            let _ = socket.shutdown().await;
            String::from_utf8(raw).unwrap()
        });

        (format!("http://{addr}/api/v1"), handle)
    }

    fn request_complete(raw: &[u8]) -> bool {
        let text = String::from_utf8_lossy(raw);
        let Some((head, body)) = text.split_once("\r\n\r\n") else {
            return false;
        };
        let length = head
            .lines()
            .find_map(|line| {
                let (name, value) = line.split_once(':')?;
                if name.eq_ignore_ascii_case("content-length") {
                    value.trim().parse::<usize>().ok()
                } else {
                    None
                }
            })
            .unwrap_or(0);
        body.len() >= length
    }

    fn body_json(request: &reqwest::Request) -> Option<Value> {
        request
            .body()
            .and_then(reqwest::Body::as_bytes)
            .map(|bytes| serde_json::from_slice(bytes).unwrap())
    }

    #[test]
    fn test_client_config_default() {
        let config = ClientConfig::default();
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.timeout, Duration::from_secs(60));
        assert!(config.user_agent.starts_with("viralapp/"));
    }

    #[test]
    fn test_api_key_blank_rejected() {
        assert_eq!(ApiKey::new("  ").unwrap_err().kind(), ErrorKind::Config);
        assert_eq!(format!("{:?}", ApiKey::new("secret").unwrap()), "ApiKey(***)");
    }

    #[test]
    fn test_build_get_request() {
        let request = ApiRequest::get("videos").with_query(
            json!({"platforms": ["tiktok", "youtube"], "search": " "})
                .as_object()
                .cloned()
                .unwrap(),
        );
        let built = client().build_request(&request).unwrap();

        assert_eq!(*built.method(), Method::GET);
        assert_eq!(built.url().path(), "/api/v1/videos");
        let pairs: Vec<(String, String)> = built.url().query_pairs().into_owned().collect();
        assert_eq!(
            pairs,
            vec![
                ("platforms".to_string(), "tiktok".to_string()),
                ("platforms".to_string(), "youtube".to_string()),
            ]
        );
        assert_eq!(built.headers()[API_KEY_HEADER], "secret");
        assert!(built.body().is_none());
    }

    #[test]
    fn test_build_export_request_sends_empty_object() {
        let built = client()
            .build_request(&ApiRequest::post("/accounts/export"))
            .unwrap();
        assert_eq!(built.headers()[CONTENT_TYPE], "application/json");
        assert_eq!(body_json(&built), Some(json!({})));
    }

    #[test]
    fn test_build_against_override() {
        let config = ClientConfig::default().with_base_url("http://localhost:4010/api/v1");
        let client = ApiClient::new(config, ApiKey::new("k").unwrap()).unwrap();
        let built = client.build_request(&ApiRequest::get("/apps")).unwrap();
        assert_eq!(built.url().as_str(), "http://localhost:4010/api/v1/apps");
    }

    #[test]
    fn test_client_config_from_env() {
        let expected = resolve_base_url(std::env::var(BASE_URL_ENV).ok().as_deref());
        match ClientConfig::from_env() {
            Ok(config) => {
                assert_eq!(Some(config.base_url), expected.ok());
                assert_eq!(config.timeout, Duration::from_secs(60));
            }
            Err(err) => {
                assert_eq!(err.kind(), ErrorKind::Config);
                assert!(expected.is_err());
            }
        }
    }

    #[tokio::test]
    async fn test_send_not_found_keeps_body() {
        let (base_url, server) = serve_once("404 Not Found", r#"{"message":"nope"}"#).await;

        let err = local_client(&base_url)
            .send(&ApiRequest::get("/videos/tiktok/123"))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
        assert_eq!(err.body(), Some(&json!({"message": "nope"})));

        let raw = server.await.unwrap().to_ascii_lowercase();
        assert!(raw.starts_with("get /api/v1/videos/tiktok/123 http/1.1"));
        assert!(raw.contains("x-api-key: secret"));
    }

    #[tokio::test]
    async fn test_send_non_json_error_body() {
        let (base_url, server) = serve_once("500 Internal Server Error", "oops").await;

        let err = local_client(&base_url)
            .send(&ApiRequest::get("/apps"))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Api);
        assert_eq!(err.status(), Some(500));
        assert_eq!(err.body(), Some(&json!("oops")));
        server.await.unwrap();
    }

    #[tokio::test]
    async fn test_send_export_with_empty_response() {
        let (base_url, server) = serve_once("200 OK", "").await;

        let body = local_client(&base_url)
            .send(&ApiRequest::post("/accounts/export"))
            .await
            .unwrap();
        assert_eq!(body, Value::Null);

        let raw = server.await.unwrap().to_ascii_lowercase();
        assert!(raw.starts_with("post /api/v1/accounts/export "));
        assert!(raw.contains("content-type: application/json"));
        assert!(raw.ends_with("\r\n\r\n{}"));
    }

    #[tokio::test]
    async fn test_send_plain_text_success() {
        let (base_url, server) = serve_once("200 OK", "queued").await;

        let body = local_client(&base_url)
            .send(&ApiRequest::post("/accounts/tracked/refresh"))
            .await
            .unwrap();
        assert_eq!(body, json!("queued"));
        server.await.unwrap();
    }

    #[tokio::test]
    async fn test_download_bytes() {
        let (base_url, server) = serve_once("200 OK", "id,views\n1,10\n").await;

        let bytes = local_client(&base_url)
            .download(&format!("{base_url}/files/export.csv"))
            .await
            .unwrap();
        assert_eq!(&bytes[..], b"id,views\n1,10\n");

        let raw = server.await.unwrap();
        assert!(raw.starts_with("GET /api/v1/files/export.csv "));
        assert!(!raw.to_ascii_lowercase().contains("x-api-key"));
    }

    #[tokio::test]
    async fn test_download_failure() {
        let (base_url, server) = serve_once("403 Forbidden", r#"{"error":"link expired"}"#).await;

        let err = local_client(&base_url)
            .download(&format!("{base_url}/files/video.mp4"))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Api);
        assert_eq!(err.status(), Some(403));
        assert_eq!(err.to_string(), "link expired");
        server.await.unwrap();
    }

    #[test]
    fn test_classify_status() {
        let err = classify_status(404, None);
        assert_eq!(err.kind(), ErrorKind::NotFound);
        assert_eq!(err.to_string(), "Resource not found");

        assert_eq!(classify_status(401, None).kind(), ErrorKind::Unauthorized);
        assert_eq!(classify_status(429, None).kind(), ErrorKind::RateLimited);

        let body = json!({"message": "validation failed", "issues": [1]});
        let err = classify_status(422, Some(body.clone()));
        assert_eq!(err.kind(), ErrorKind::Api);
        assert_eq!(err.status(), Some(422));
        assert_eq!(err.to_string(), "validation failed");
        assert_eq!(err.body(), Some(&body));

        let err = classify_status(503, None);
        assert_eq!(
            err.to_string(),
            "ViralApp API request failed with status 503"
        );
    }
}
