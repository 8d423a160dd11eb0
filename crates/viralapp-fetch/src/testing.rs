//! Scripted in-memory transport for tests.

use async_trait::async_trait;
use bytes::Bytes;
use serde_json::Value;
use std::collections::VecDeque;
use std::sync::{Mutex, PoisonError};
use viralapp_types::{Result, ViralAppError};

use crate::{ApiRequest, Transport};

/// A [`Transport`] that replays queued responses and records every call.
///
/// Calls beyond the script fail with an `Api` error.
#[derive(Debug, Default)]
pub struct ScriptedTransport {
    responses: Mutex<VecDeque<Result<Value>>>,
    downloads: Mutex<VecDeque<Result<Bytes>>>,
    requests: Mutex<Vec<ApiRequest>>,
    download_urls: Mutex<Vec<String>>,
}

impl ScriptedTransport {
    /// Creates an empty script.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a successful API response.
    #[must_use]
    pub fn respond(self, value: Value) -> Self {
        lock(&self.responses).push_back(Ok(value));
        self
    }

    /// Queues a failed API call.
    #[must_use]
    pub fn fail(self, error: ViralAppError) -> Self {
        lock(&self.responses).push_back(Err(error));
        self
    }

    /// Queues the bytes returned by the next download.
    #[must_use]
    pub fn respond_download(self, bytes: impl Into<Bytes>) -> Self {
        lock(&self.downloads).push_back(Ok(bytes.into()));
        self
    }

    /// Returns every API request sent so far.
    #[must_use]
    pub fn requests(&self) -> Vec<ApiRequest> {
        lock(&self.requests).clone()
    }

    /// Returns every download URL fetched so far.
    #[must_use]
    pub fn download_urls(&self) -> Vec<String> {
        lock(&self.download_urls).clone()
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn send(&self, request: &ApiRequest) -> Result<Value> {
        lock(&self.requests).push(request.clone());
        lock(&self.responses)
            .pop_front()
            .unwrap_or_else(|| Err(unscripted(&request.path)))
    }

    async fn download(&self, url: &str) -> Result<Bytes> {
        lock(&self.download_urls).push(url.to_string());
        lock(&self.downloads)
            .pop_front()
            .unwrap_or_else(|| Err(unscripted(url)))
    }
}

fn unscripted(target: &str) -> ViralAppError {
    ViralAppError::Api {
        status: None,
        message: format!("no scripted response for {target}"),
        body: None,
    }
}

fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
