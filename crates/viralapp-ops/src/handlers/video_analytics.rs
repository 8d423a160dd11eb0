use serde_json::{Value, json};
use tracing::debug;
use viralapp_fetch::ApiRequest;
use viralapp_types::{Result, VideoRef, ViralAppError, clean_empty};

use super::{
    apply_date_range, export_range, fetch_records, object, simplify_requested, unwrap_field,
};
use crate::binary::{EXPORT_MIME, FileKind, VIDEO_MIME, follow_download};
use crate::{OperationContext, OperationOutput, simplify};

fn selected_video(ctx: &OperationContext<'_>) -> Result<VideoRef> {
    VideoRef::resolve(ctx.params.get("platformVideoId"), ctx.params.str("platform"))
}

async fn get_json(ctx: &OperationContext<'_>, path: String) -> Result<OperationOutput> {
    let response = ctx.transport.send(&ApiRequest::get(path)).await?;
    Ok(OperationOutput::from_response(response))
}

pub(crate) async fn get_all(ctx: &OperationContext<'_>) -> Result<OperationOutput> {
    let filters = ctx.params.collection("filters");
    let mut query = object(json!({
        "search": filters.get("search"),
        "platforms": filters.get("platforms"),
        "projects": filters.ids("projects"),
        "accounts": filters.ids("accounts"),
        "sortCol": filters.get("sortCol"),
        "sortDir": filters.get("sortDir"),
        "contentTypes": filters.get("contentTypes"),
        "expand": ctx.params.get("expand"),
    }));
    apply_date_range(&mut query, &filters, "dateRangeFrom", "dateRangeTo")?;

    let records = fetch_records(ctx, &ApiRequest::get("/videos").with_query(query)).await?;
    if simplify_requested(ctx) {
        return Ok(OperationOutput::Records(
            records.iter().map(|r| simplify::pick(r, simplify::VIDEO)).collect(),
        ));
    }
    Ok(OperationOutput::Records(records))
}

pub(crate) async fn get(ctx: &OperationContext<'_>) -> Result<OperationOutput> {
    let video = selected_video(ctx)?;
    get_json(ctx, video.path()).await
}

pub(crate) async fn download(ctx: &OperationContext<'_>) -> Result<OperationOutput> {
    let video = selected_video(ctx)?;
    let response = ctx
        .transport
        .send(&ApiRequest::get(format!("{}/download", video.path())))
        .await?;
    let file_name = format!("{}-{}.mp4", video.platform, video.video_id);
    follow_download(ctx.transport, response, &file_name, VIDEO_MIME, FileKind::Download).await
}

pub(crate) async fn get_history(ctx: &OperationContext<'_>) -> Result<OperationOutput> {
    let video = selected_video(ctx)?;
    get_json(ctx, format!("{}/history", video.path())).await
}

pub(crate) async fn get_activity(ctx: &OperationContext<'_>) -> Result<OperationOutput> {
    let filters = ctx.params.collection("activityFilters");
    let query = object(json!({
        "days": filters.get("days"),
        "platforms": filters.get("platforms"),
        "accounts": filters.ids("accounts"),
        "projects": filters.ids("projects"),
    }));

    let response = ctx
        .transport
        .send(&ApiRequest::get("/videos/activity").with_query(query))
        .await?;
    Ok(OperationOutput::from_response(response))
}

pub(crate) async fn export(ctx: &OperationContext<'_>) -> Result<OperationOutput> {
    let body = ctx.params.collection("exportBody");
    let range = export_range(ctx, &body)?;
    let payload = object(json!({
        "accountUsername": body.get("accountUsername"),
        "platforms": body.ids("platforms"),
        "accounts": body.ids("accounts"),
        "projects": body.ids("projects"),
        "contentTypes": body.get("contentTypes"),
        "dateRange": range,
        "sortCol": body.get("sortCol"),
        "sortDir": body.get("sortDir"),
    }));

    let response = ctx
        .transport
        .send(&ApiRequest::post("/videos/export").with_body(payload))
        .await?;
    follow_download(
        ctx.transport,
        response,
        "videos-export.csv",
        EXPORT_MIME,
        FileKind::Export,
    )
    .await
}

pub(crate) async fn get_excluded(ctx: &OperationContext<'_>) -> Result<OperationOutput> {
    let filters = ctx.params.collection("filters");
    let query = object(json!({
        "search": filters.get("search"),
        "platforms": filters.get("platforms"),
        "accounts": filters.ids("accounts"),
        "sortCol": filters.get("sortCol"),
        "sortDir": filters.get("sortDir"),
    }));

    let records = fetch_records(ctx, &ApiRequest::get("/videos/excluded").with_query(query)).await?;
    if simplify_requested(ctx) {
        return Ok(OperationOutput::Records(records.iter().map(simplify::excluded_video).collect()));
    }
    Ok(OperationOutput::Records(records))
}

pub(crate) async fn exclude(ctx: &OperationContext<'_>) -> Result<OperationOutput> {
    if ctx.params.id("platformVideoId").is_none() {
        return Err(ViralAppError::validation("Platform Video ID is required."));
    }
    let video = selected_video(ctx)?;
    let org_account_id = ctx.params.id("orgAccountId");

    let details = ctx.transport.send(&ApiRequest::get(video.path())).await?;
    let platform_account_id = details
        .get("platformAccountId")
        .and_then(Value::as_str)
        .filter(|id| !id.trim().is_empty())
        .ok_or_else(|| {
            ViralAppError::validation(
                "Platform Account ID could not be inferred from the selected video.",
            )
        })?;
    debug!(%video, platform_account_id, "excluding video");

    let entry = clean_empty(&object(json!({
        "orgAccountId": org_account_id,
        "platform": video.platform,
        "platformAccountId": platform_account_id,
        "platformVideoId": video.video_id,
    })));
    let body = object(json!({"entries": [entry]}));

    let response = ctx.transport.send(&ApiRequest::post("/videos/excluded").with_body(body)).await?;
    Ok(OperationOutput::from_response(response))
}

pub(crate) async fn restore_excluded(ctx: &OperationContext<'_>) -> Result<OperationOutput> {
    let id = ctx
        .params
        .required_id("excludedVideoId", "Excluded video ID is required.")?;

    let request = ApiRequest::delete("/videos/excluded").with_query_param("ids", json!([id]));
    let response = ctx.transport.send(&request).await?;
    let deleted = unwrap_field(response, "deleted");
    Ok(OperationOutput::Record(json!({"deleted": deleted})))
}
