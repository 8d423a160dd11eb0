//! Paged list retrieval.

use serde_json::Value;
use tracing::debug;
use viralapp_types::Result;

use crate::{ApiRequest, Transport};

/// Page size used when draining a list endpoint.
pub const PER_PAGE: u64 = 100;

/// One page of a list endpoint: `{data, pageCount, totalRows}`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Page {
    /// Records on this page.
    pub data: Vec<Value>,
    /// Index of the last page (1-based); zero when the server omits it.
    pub page_count: u64,
    /// Total matching rows, when reported.
    pub total_rows: Option<u64>,
}

impl Page {
    /// Decodes a list response, tolerating missing or mistyped fields.
    #[must_use]
    pub fn from_response(response: Value) -> Self {
        let page_count = response.get("pageCount").and_then(as_count).unwrap_or(0);
        let total_rows = response.get("totalRows").and_then(as_count);
        let data = match response {
            Value::Object(mut map) => match map.remove("data") {
                Some(Value::Array(items)) => items,
                _ => Vec::new(),
            },
            _ => Vec::new(),
        };
        Self {
            data,
            page_count,
            total_rows,
        }
    }

    /// Returns true if a page after `page` exists.
    #[must_use]
    pub const fn has_after(&self, page: u64) -> bool {
        self.page_count > page
    }
}

/// Clamps a caller-supplied limit to a valid page size (1 to [`PER_PAGE`]).
#[must_use]
pub fn page_size(limit: i64) -> u64 {
    limit.clamp(1, PER_PAGE as i64) as u64
}

/// Fetches a single page of `request`.
///
/// # Errors
///
/// Returns the transport error of the call.
pub async fn fetch_page<T>(
    transport: &T,
    request: &ApiRequest,
    page: u64,
    per_page: u64,
) -> Result<Page>
where
    T: Transport + ?Sized,
{
    let paged = request
        .clone()
        .with_query_param("page", page)
        .with_query_param("perPage", per_page);
    let response = transport.send(&paged).await?;
    Ok(Page::from_response(response))
}

/// Drains every page of a list endpoint into one sequence.
///
/// Pages are requested in order starting at 1 with `perPage=100`, merged over
/// the request's own query. The walk stops when `pageCount` is missing or
/// zero, or the current page reaches it.
///
/// # Errors
///
/// Returns the first transport error; records from earlier pages are discarded.
pub async fn fetch_all<T>(transport: &T, request: &ApiRequest) -> Result<Vec<Value>>
where
    T: Transport + ?Sized,
{
    let mut aggregated = Vec::new();
    let mut page = 1;

    loop {
        let Page {
            data, page_count, ..
        } = fetch_page(transport, request, page, PER_PAGE).await?;
        debug!(path = %request.path, page, page_count, records = data.len(), "fetched page");
        aggregated.extend(data);

        if page_count == 0 || page >= page_count {
            break;
        }
        page += 1;
    }

    Ok(aggregated)
}

/// Fetches at most `limit` records with a single call.
///
/// The response may be a list page or a bare array.
///
/// # Errors
///
/// Returns the transport error of the call.
pub async fn fetch_limited<T>(transport: &T, request: &ApiRequest, limit: i64) -> Result<Vec<Value>>
where
    T: Transport + ?Sized,
{
    let per_page = page_size(limit);
    let paged = request
        .clone()
        .with_query_param("page", 1)
        .with_query_param("perPage", per_page);

    let records = match transport.send(&paged).await? {
        Value::Array(items) => items,
        other => Page::from_response(other).data,
    };

    Ok(records.into_iter().take(per_page as usize).collect())
}

fn as_count(value: &Value) -> Option<u64> {
    value
        .as_u64()
        .or_else(|| value.as_f64().filter(|f| *f > 0.0).map(|f| f as u64))
}
