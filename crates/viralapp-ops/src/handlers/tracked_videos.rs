use serde_json::{Value, json};
use viralapp_fetch::ApiRequest;
use viralapp_types::{Result, ViralAppError, clean_empty};

use super::{fetch_collection, object};
use crate::{OperationContext, OperationOutput, Parameters, simplify};

fn video_entries(ctx: &OperationContext<'_>) -> Result<Vec<Parameters>> {
    let entries = ctx.params.entries("videos.video");
    if entries.is_empty() {
        return Err(ViralAppError::validation("At least one video must be provided."));
    }
    Ok(entries)
}

pub(crate) async fn get_all(ctx: &OperationContext<'_>) -> Result<OperationOutput> {
    let filters = ctx.params.collection("filters");
    let query = object(json!({
        "search": filters.get("search"),
        "platforms": filters.get("platforms"),
        "sortCol": filters.get("sortCol"),
        "sortDir": filters.get("sortDir"),
    }));

    let request = ApiRequest::get("/videos/tracked").with_query(query);
    fetch_collection(ctx, &request, |r| simplify::pick(r, simplify::TRACKED_VIDEO)).await
}

pub(crate) async fn add(ctx: &OperationContext<'_>) -> Result<OperationOutput> {
    let videos: Vec<Value> = video_entries(ctx)?
        .iter()
        .map(|entry| {
            Value::Object(clean_empty(&object(json!({
                "platform": entry.get("platform"),
                "videoId": entry.get("videoId"),
            }))))
        })
        .collect();

    let body = object(json!({"videos": videos}));
    let response = ctx.transport.send(&ApiRequest::post("/videos/tracked").with_body(body)).await?;
    Ok(OperationOutput::from_response(response))
}

pub(crate) async fn refresh(ctx: &OperationContext<'_>) -> Result<OperationOutput> {
    let items: Vec<Value> = video_entries(ctx)?
        .iter()
        .map(|entry| json!({"platform": entry.get("platform"), "id": entry.get("videoId")}))
        .collect();

    let body = object(json!({"items": items}));
    let response = ctx
        .transport
        .send(&ApiRequest::post("/videos/tracked/refresh").with_body(body))
        .await?;
    Ok(OperationOutput::from_response(response))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handlers::test_support::{context, params};
    use viralapp_fetch::testing::ScriptedTransport;

    #[tokio::test]
    async fn test_add_videos() {
        let transport = ScriptedTransport::new().respond(json!({"added": 2}));
        let p = params(json!({"videos": {"video": [
            {"platform": "tiktok", "videoId": "7301"},
            {"platform": "youtube", "videoId": " "},
        ]}}));

        let output = add(&context(&transport, &p)).await.unwrap();
        assert_eq!(output, OperationOutput::Record(json!({"added": 2})));
        assert_eq!(
            transport.requests()[0].json_body(),
            Some(json!({"videos": [
                {"platform": "tiktok", "videoId": "7301"},
                {"platform": "youtube"},
            ]}))
        );
    }

    #[tokio::test]
    async fn test_refresh_requires_videos() {
        let transport = ScriptedTransport::new();
        let p = params(json!({"videos": {"video": []}}));
        let err = refresh(&context(&transport, &p)).await.unwrap_err();
        assert_eq!(err.to_string(), "At least one video must be provided.");
    }

    #[tokio::test]
    async fn test_refresh_items() {
        let transport = ScriptedTransport::new().respond(json!({"queued": 1}));
        let p = params(json!({"videos": {"video": [{"platform": "instagram", "videoId": "C1"}]}}));

        refresh(&context(&transport, &p)).await.unwrap();
        let sent = &transport.requests()[0];
        assert_eq!(sent.path, "/videos/tracked/refresh");
        assert_eq!(sent.json_body(), Some(json!({"items": [{"platform": "instagram", "id": "C1"}]})));
    }
}
