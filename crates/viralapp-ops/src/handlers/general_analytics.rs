use serde_json::{Map, Value, json};
use viralapp_fetch::ApiRequest;
use viralapp_types::{DateRange, Result};

use super::{apply_date_range, object, simplify_requested, unwrap_field};
use crate::binary::{EXPORT_MIME, FileKind, follow_download};
use crate::{OperationContext, OperationOutput, Parameters, simplify};

fn general_filters(filters: &Parameters) -> Map<String, Value> {
    object(json!({
        "platforms": filters.get("platforms"),
        "projects": filters.ids("projects"),
        "accounts": filters.ids("accounts"),
        "contentTypes": filters.get("contentTypes"),
        "limit": filters.get("limit"),
        "metric": filters.get("metric"),
        "onlyPublished": filters.get("onlyPublished"),
    }))
}

/// Filters plus the top-level `dateRangeFrom`/`dateRangeTo` pair.
fn analytics_query(ctx: &OperationContext<'_>) -> Result<Map<String, Value>> {
    let mut query = general_filters(&ctx.params.collection("filters"));
    apply_date_range(&mut query, ctx.params, "dateRangeFrom", "dateRangeTo")?;
    Ok(query)
}

async fn get_analytics(ctx: &OperationContext<'_>, path: &str) -> Result<Value> {
    let query = analytics_query(ctx)?;
    ctx.transport.send(&ApiRequest::get(path).with_query(query)).await
}

/// Extracts the record list of a ranking response, bare or under `data`.
fn ranking_items(response: Value) -> Value {
    unwrap_field(response, "data")
}

async fn ranking(
    ctx: &OperationContext<'_>,
    path: &str,
    fields: &[&str],
) -> Result<OperationOutput> {
    let items = ranking_items(get_analytics(ctx, path).await?);
    match items {
        Value::Array(records) if simplify_requested(ctx) => Ok(OperationOutput::Records(
            records.iter().map(|r| simplify::pick(r, fields)).collect(),
        )),
        other => Ok(OperationOutput::from_response(other)),
    }
}

pub(crate) async fn get_kpis(ctx: &OperationContext<'_>) -> Result<OperationOutput> {
    let response = get_analytics(ctx, "/analytics/kpis").await?;
    if simplify_requested(ctx) {
        return Ok(OperationOutput::Record(simplify::pick(&response, simplify::KPIS)));
    }
    Ok(OperationOutput::from_response(response))
}

pub(crate) async fn get_top_videos(ctx: &OperationContext<'_>) -> Result<OperationOutput> {
    ranking(ctx, "/analytics/top-videos", simplify::TOP_VIDEO).await
}

pub(crate) async fn get_top_accounts(ctx: &OperationContext<'_>) -> Result<OperationOutput> {
    ranking(ctx, "/analytics/top-accounts", simplify::TOP_ACCOUNT).await
}

pub(crate) async fn get_interaction_metrics(ctx: &OperationContext<'_>) -> Result<OperationOutput> {
    let response = get_analytics(ctx, "/analytics/interaction-metrics").await?;
    if !simplify_requested(ctx) {
        return Ok(OperationOutput::from_response(response));
    }
    let daily = match response.get("dailyMetrics") {
        Some(Value::Array(days)) => days
            .iter()
            .map(|d| simplify::pick(d, simplify::DAILY_METRIC))
            .collect(),
        _ => Vec::new(),
    };
    Ok(OperationOutput::Records(daily))
}

pub(crate) async fn export_daily_gains(ctx: &OperationContext<'_>) -> Result<OperationOutput> {
    let range =
        DateRange::from_inputs(ctx.params.str("dateRangeFrom"), ctx.params.str("dateRangeTo"))?
            .unwrap_or_else(|| DateRange::default_export(ctx.today));

    let mut body = general_filters(&ctx.params.collection("filters"));
    body.insert("dateRange".to_string(), json!(range));

    let response = ctx
        .transport
        .send(&ApiRequest::post("/analytics/video-daily-gains/export").with_body(body))
        .await?;
    follow_download(
        ctx.transport,
        response,
        "video-daily-gains.csv",
        EXPORT_MIME,
        FileKind::Export,
    )
    .await
}
