use serde_json::{Value, json};
use viralapp_fetch::ApiRequest;
use viralapp_types::{Result, ViralAppError, clean_empty, parse_hashtags};

use super::{fetch_collection, object, unwrap_field};
use crate::{OperationContext, OperationOutput, Parameters, simplify};

fn account_id(ctx: &OperationContext<'_>) -> Result<String> {
    ctx.params.required_id("accountId", "Account ID is required.")
}

fn account_entries(ctx: &OperationContext<'_>) -> Result<Vec<Parameters>> {
    let entries = ctx.params.entries("accounts.account");
    if entries.is_empty() {
        return Err(ViralAppError::validation("At least one account must be provided."));
    }
    Ok(entries)
}

/// Hashtag list of an entry; anything but a string reads as empty.
fn hashtags(params: &Parameters, key: &str) -> Vec<String> {
    params.str(key).map(parse_hashtags).unwrap_or_default()
}

pub(crate) async fn get_all(ctx: &OperationContext<'_>) -> Result<OperationOutput> {
    let filters = ctx.params.collection("filters");
    let username = filters.get("username");
    let query = object(json!({
        "username": username,
        "search": username,
        "platforms": filters.get("platforms"),
        "projects": filters.ids("projects"),
        "sortCol": filters.get("sortCol"),
        "sortDir": filters.get("sortDir"),
    }));

    let request = ApiRequest::get("/accounts/tracked").with_query(query);
    fetch_collection(ctx, &request, |r| simplify::pick(r, simplify::TRACKED_ACCOUNT)).await
}

pub(crate) async fn add(ctx: &OperationContext<'_>) -> Result<OperationOutput> {
    let accounts: Vec<Value> = account_entries(ctx)?
        .iter()
        .map(|entry| {
            Value::Object(clean_empty(&object(json!({
                "platform": entry.get("platform"),
                "username": entry.get("username"),
                "max_videos": entry.get("max_videos"),
            }))))
        })
        .collect();

    let body = object(json!({"accounts": accounts}));
    let response = ctx
        .transport
        .send(&ApiRequest::post("/accounts/tracked").with_body(body))
        .await?;
    Ok(OperationOutput::from_response(response))
}

pub(crate) async fn get_count(ctx: &OperationContext<'_>) -> Result<OperationOutput> {
    let response = ctx.transport.send(&ApiRequest::get("/accounts/tracked/count")).await?;
    let count = unwrap_field(response, "count");
    Ok(OperationOutput::Record(json!({"count": count})))
}

pub(crate) async fn refresh(ctx: &OperationContext<'_>) -> Result<OperationOutput> {
    let items: Vec<Value> = account_entries(ctx)?
        .iter()
        .map(|entry| json!({"platform": entry.get("platform"), "id": entry.id("accountId")}))
        .collect();

    let body = object(json!({"items": items}));
    let response = ctx
        .transport
        .send(&ApiRequest::post("/accounts/tracked/refresh").with_body(body))
        .await?;
    Ok(OperationOutput::from_response(response))
}

pub(crate) async fn update_max_videos(ctx: &OperationContext<'_>) -> Result<OperationOutput> {
    let id = account_id(ctx)?;
    let max_videos = ctx
        .params
        .i64("maxVideos")
        .ok_or_else(|| ViralAppError::validation("Max videos is required."))?;

    let body = object(json!({"newMaxVideos": max_videos}));
    let response = ctx
        .transport
        .send(&ApiRequest::put(format!("/accounts/tracked/{id}/max-videos")).with_body(body))
        .await?;
    Ok(OperationOutput::from_response(response))
}

pub(crate) async fn update_hashtags(ctx: &OperationContext<'_>) -> Result<OperationOutput> {
    let id = account_id(ctx)?;
    let body = object(json!({"hashtagsFilter": hashtags(ctx.params, "hashtags")}));

    let request = ApiRequest::put(format!("/accounts/tracked/{id}/hashtags"))
        .with_body(body)
        .verbatim();
    let response = ctx.transport.send(&request).await?;
    Ok(OperationOutput::from_response(response))
}

pub(crate) async fn update_project_hashtags(ctx: &OperationContext<'_>) -> Result<OperationOutput> {
    let id = account_id(ctx)?;
    let entries = ctx.params.entries("projectHashtags.projectHashtag");
    if entries.is_empty() {
        return Err(ViralAppError::validation("Provide at least one project hashtag entry."));
    }

    let project_hashtags = entries
        .iter()
        .enumerate()
        .map(|(index, entry)| -> Result<Value> {
            let project_id = entry.id("projectId").ok_or_else(|| {
                ViralAppError::validation(format!("Project is required for entry #{}.", index + 1))
            })?;
            Ok(json!({"projectId": project_id, "hashtagsFilter": hashtags(entry, "hashtags")}))
        })
        .collect::<Result<Vec<Value>>>()?;

    let request = ApiRequest::put(format!("/accounts/tracked/{id}/project-hashtags"))
        .with_body(object(json!({"projectHashtags": project_hashtags})))
        .verbatim();
    let response = ctx.transport.send(&request).await?;
    Ok(OperationOutput::from_response(response))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handlers::test_support::{context, params};
    use viralapp_fetch::HttpMethod;
    use viralapp_fetch::testing::ScriptedTransport;
    use viralapp_types::ErrorKind;

    #[tokio::test]
    async fn test_get_all_sends_username_twice() {
        let transport = ScriptedTransport::new().respond(json!({"data": []}));
        let p = params(json!({"filters": {"username": "cat", "projects": ["p1", {"value": "p2"}]}}));

        get_all(&context(&transport, &p)).await.unwrap();

        let pairs = transport.requests()[0].query_pairs();
        assert!(pairs.contains(&("username".to_string(), "cat".to_string())));
        assert!(pairs.contains(&("search".to_string(), "cat".to_string())));
        assert!(pairs.contains(&("projects".to_string(), "p2".to_string())));
    }

    #[tokio::test]
    async fn test_add_cleans_entries() {
        let transport = ScriptedTransport::new().respond(json!({"added": 1}));
        let p = params(json!({"accounts": {"account": [
            {"platform": "tiktok", "username": " cat ", "max_videos": 0},
            {"platform": "youtube", "username": "dog", "max_videos": null},
        ]}}));

        add(&context(&transport, &p)).await.unwrap();
        assert_eq!(
            transport.requests()[0].json_body(),
            Some(json!({"accounts": [
                {"platform": "tiktok", "username": "cat", "max_videos": 0},
                {"platform": "youtube", "username": "dog"},
            ]}))
        );
    }

    #[tokio::test]
    async fn test_add_requires_accounts() {
        let transport = ScriptedTransport::new();
        let p = params(json!({}));
        let err = add(&context(&transport, &p)).await.unwrap_err();
        assert_eq!(err.to_string(), "At least one account must be provided.");
    }

    #[tokio::test]
    async fn test_get_count_shapes() {
        let transport = ScriptedTransport::new()
            .respond(json!(7))
            .respond(json!({"count": 8, "limit": 100}))
            .respond(json!("n/a"));
        let p = params(json!({}));
        let ctx = context(&transport, &p);

        assert_eq!(get_count(&ctx).await.unwrap(), OperationOutput::Record(json!({"count": 7})));
        assert_eq!(get_count(&ctx).await.unwrap(), OperationOutput::Record(json!({"count": 8})));
        assert_eq!(get_count(&ctx).await.unwrap(), OperationOutput::Record(json!({"count": "n/a"})));
    }

    #[tokio::test]
    async fn test_refresh_items() {
        let transport = ScriptedTransport::new().respond(json!({"queued": 1}));
        let p = params(json!({"accounts": {"account": [{"platform": "tiktok", "accountId": {"value": "a1"}}]}}));

        refresh(&context(&transport, &p)).await.unwrap();
        assert_eq!(
            transport.requests()[0].json_body(),
            Some(json!({"items": [{"platform": "tiktok", "id": "a1"}]}))
        );
    }

    #[tokio::test]
    async fn test_update_max_videos() {
        let transport = ScriptedTransport::new().respond(json!({"ok": true}));
        let p = params(json!({"accountId": "a1", "maxVideos": 250}));

        update_max_videos(&context(&transport, &p)).await.unwrap();
        let sent = &transport.requests()[0];
        assert_eq!(sent.method, HttpMethod::Put);
        assert_eq!(sent.path, "/accounts/tracked/a1/max-videos");
        assert_eq!(sent.json_body(), Some(json!({"newMaxVideos": 250})));
    }

    #[tokio::test]
    async fn test_blank_hashtags_send_empty_list() {
        let transport = ScriptedTransport::new().respond(json!({"ok": true}));
        let p = params(json!({"accountId": "a1", "hashtags": " , ,"}));

        update_hashtags(&context(&transport, &p)).await.unwrap();
        let sent = &transport.requests()[0];
        assert_eq!(sent.path, "/accounts/tracked/a1/hashtags");
        assert_eq!(sent.json_body(), Some(json!({"hashtagsFilter": []})));
    }

    #[tokio::test]
    async fn test_project_hashtags() {
        let transport = ScriptedTransport::new().respond(json!({"ok": true}));
        let p = params(json!({
            "accountId": "a1",
            "projectHashtags": {"projectHashtag": [
                {"projectId": {"mode": "list", "value": "p1"}, "hashtags": "#a, #b"},
                {"projectId": "p2"},
            ]},
        }));

        update_project_hashtags(&context(&transport, &p)).await.unwrap();
        assert_eq!(
            transport.requests()[0].json_body(),
            Some(json!({"projectHashtags": [
                {"projectId": "p1", "hashtagsFilter": ["#a", "#b"]},
                {"projectId": "p2", "hashtagsFilter": []},
            ]}))
        );
    }

    #[tokio::test]
    async fn test_project_hashtags_missing_project() {
        let transport = ScriptedTransport::new();
        let p = params(json!({
            "accountId": "a1",
            "projectHashtags": {"projectHashtag": [{"projectId": "p1"}, {"hashtags": "x"}]},
        }));

        let err = update_project_hashtags(&context(&transport, &p)).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
        assert_eq!(err.to_string(), "Project is required for entry #2.");
        assert!(transport.requests().is_empty());
    }
}
