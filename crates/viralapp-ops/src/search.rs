//! Paged option lookups for resource pickers.

use serde::Serialize;
use serde_json::{Map, Value, json};
use viralapp_fetch::{ApiRequest, PER_PAGE, Page, Transport, fetch_page};
use viralapp_types::{Result, platform_display_name};

use crate::handlers::object;

/// One selectable option.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchOption {
    /// Display name.
    pub name: String,
    /// Value to submit.
    pub value: String,
    /// Secondary text.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// One page of options.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResults {
    /// Options on this page.
    pub results: Vec<SearchOption>,
    /// Token for the next page, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pagination_token: Option<String>,
}

async fn search_page<F>(
    transport: &dyn Transport,
    path: &str,
    query: Map<String, Value>,
    token: Option<&str>,
    to_option: F,
) -> Result<SearchResults>
where
    F: Fn(&Value) -> Option<SearchOption>,
{
    let page = token.and_then(|t| t.trim().parse::<u64>().ok()).unwrap_or(1);
    let request = ApiRequest::get(path).with_query(query);
    let fetched: Page = fetch_page(transport, &request, page, PER_PAGE).await?;

    Ok(SearchResults {
        results: fetched.data.iter().filter_map(to_option).collect(),
        pagination_token: fetched.has_after(page).then(|| (page + 1).to_string()),
    })
}

fn text(record: &Value, key: &str) -> Option<String> {
    match record.get(key)? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn account_name(record: &Value) -> String {
    let username = text(record, "username").unwrap_or_default();
    let platform = text(record, "platform").unwrap_or_default();
    format!("{username} ({})", platform_display_name(&platform))
}

/// Searches analytics accounts by username.
///
/// # Errors
///
/// Returns the transport error of the lookup.
pub async fn account_search(
    transport: &dyn Transport,
    filter: Option<&str>,
    token: Option<&str>,
) -> Result<SearchResults> {
    search_page(transport, "/accounts", object(json!({"search": filter})), token, |account| {
        let followers = account
            .get("followerCount")
            .filter(|v| v.as_f64().is_some_and(|n| n != 0.0));
        Some(SearchOption {
            name: account_name(account),
            value: text(account, "id")?,
            description: Some(format!("{} followers", followers.cloned().unwrap_or(json!(0)))),
        })
    })
    .await
}

/// Searches projects by name.
///
/// # Errors
///
/// Returns the transport error of the lookup.
pub async fn project_search(
    transport: &dyn Transport,
    filter: Option<&str>,
    token: Option<&str>,
) -> Result<SearchResults> {
    search_page(transport, "/projects", object(json!({"name": filter})), token, |project| {
        Some(SearchOption {
            name: text(project, "name").unwrap_or_default(),
            value: text(project, "id")?,
            description: None,
        })
    })
    .await
}

/// Searches accounts, optionally restricted to one platform.
///
/// # Errors
///
/// Returns the transport error of the lookup.
pub async fn tracked_account_search(
    transport: &dyn Transport,
    filter: Option<&str>,
    platform: Option<&str>,
    token: Option<&str>,
) -> Result<SearchResults> {
    let query = object(json!({
        "platforms": platform.map(|p| vec![p]),
        "search": filter,
    }));
    search_page(transport, "/accounts", query, token, |account| {
        Some(SearchOption {
            name: account_name(account),
            value: text(account, "id")?,
            description: None,
        })
    })
    .await
}

/// Searches videos of one platform, optionally within one organization account.
///
/// Without a platform nothing is fetched. The filter matches the platform
/// video ID, the title or the account username, ignoring case.
///
/// # Errors
///
/// Returns the transport error of the lookup.
pub async fn video_search(
    transport: &dyn Transport,
    filter: Option<&str>,
    platform: Option<&str>,
    org_account_id: Option<&str>,
    token: Option<&str>,
) -> Result<SearchResults> {
    let Some(platform) = platform.map(str::trim).filter(|p| !p.is_empty()) else {
        return Ok(SearchResults::default());
    };
    let needle = filter.map(|f| f.trim().to_lowercase()).filter(|f| !f.is_empty());

    let query = object(json!({
        "platforms": [platform.to_lowercase()],
        "accounts": org_account_id.map(str::trim).filter(|id| !id.is_empty()).map(|id| vec![id]),
    }));

    search_page(transport, "/videos", query, token, |video| {
        let id = text(video, "platformVideoId")
            .map(|id| id.trim().to_string())
            .filter(|id| !id.is_empty())?;
        let title = video.get("title").and_then(Value::as_str).map(str::trim).unwrap_or_default();
        let account = video
            .get("accountUsername")
            .and_then(Value::as_str)
            .map(str::trim)
            .unwrap_or_default();

        if let Some(needle) = &needle {
            let matches = [id.as_str(), title, account]
                .iter()
                .any(|field| field.to_lowercase().contains(needle.as_str()));
            if !matches {
                return None;
            }
        }

        let primary = if title.is_empty() { id.clone() } else { format!("{title} ({id})") };
        let name = if account.is_empty() { primary } else { format!("{primary} · {account}") };
        Some(SearchOption {
            name,
            value: id,
            description: None,
        })
    })
    .await
}
