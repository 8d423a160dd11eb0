//! Per-resource operation handlers.
//!
//! Each handler reads its own parameters from the [`OperationContext`], builds
//! one or more requests and shapes the response into an [`OperationOutput`].

pub(crate) mod account_analytics;
pub(crate) mod general_analytics;
pub(crate) mod integrations;
pub(crate) mod projects;
pub(crate) mod tracked_accounts;
pub(crate) mod tracked_videos;
pub(crate) mod video_analytics;

use serde_json::{Map, Value};
use viralapp_fetch::{ApiRequest, fetch_all, fetch_limited};
use viralapp_types::{DateRange, Result};

use crate::{OperationContext, OperationOutput, Parameters};

/// Record count for single-page fetches when the caller gives no limit.
pub(crate) const DEFAULT_LIMIT: i64 = 50;

/// Simplifies one record.
pub(crate) type Simplifier = fn(&Value) -> Value;

/// Unwraps a `json!` object literal into its map.
pub(crate) fn object(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        _ => Map::new(),
    }
}

/// Takes `key` out of an object response, or returns the response as is.
pub(crate) fn unwrap_field(response: Value, key: &str) -> Value {
    match response {
        Value::Object(mut map) => match map.remove(key) {
            Some(inner) => inner,
            None => Value::Object(map),
        },
        other => other,
    }
}

pub(crate) fn simplify_requested(ctx: &OperationContext<'_>) -> bool {
    ctx.params.flag("options.simplifyOutput")
}

/// Fetches a list endpoint: every page when `returnAll` is set, otherwise one
/// page bounded by `limit`.
pub(crate) async fn fetch_records(
    ctx: &OperationContext<'_>,
    request: &ApiRequest,
) -> Result<Vec<Value>> {
    if ctx.params.flag("returnAll") {
        fetch_all(ctx.transport, request).await
    } else {
        let limit = ctx.params.i64("limit").unwrap_or(DEFAULT_LIMIT);
        fetch_limited(ctx.transport, request, limit).await
    }
}

/// [`fetch_records`] followed by the optional simplification.
pub(crate) async fn fetch_collection(
    ctx: &OperationContext<'_>,
    request: &ApiRequest,
    simplify: Simplifier,
) -> Result<OperationOutput> {
    let records = fetch_records(ctx, request).await?;
    let records = if simplify_requested(ctx) {
        records.iter().map(simplify).collect()
    } else {
        records
    };
    Ok(OperationOutput::Records(records))
}

/// Adds `dateRange[from]`/`dateRange[to]` from the two named parameters.
pub(crate) fn apply_date_range(
    query: &mut Map<String, Value>,
    params: &Parameters,
    from_key: &str,
    to_key: &str,
) -> Result<()> {
    if let Some(range) = DateRange::from_inputs(params.str(from_key), params.str(to_key))? {
        for (key, value) in range.query_pairs() {
            query.insert(key.to_string(), Value::String(value));
        }
    }
    Ok(())
}

/// Resolves the range of an export body, defaulting to the trailing window.
///
/// Accepts `{range: [{from, to}]}` as well as a bare `{from, to}`.
pub(crate) fn export_range(ctx: &OperationContext<'_>, body: &Parameters) -> Result<DateRange> {
    let range = match body.get("dateRange.range") {
        Some(Value::Array(ranges)) => ranges.first().cloned().map(Parameters::from_value),
        _ => None,
    }
    .unwrap_or_else(|| body.collection("dateRange"));

    Ok(DateRange::from_inputs(range.str("from"), range.str("to"))?
        .unwrap_or_else(|| DateRange::default_export(ctx.today)))
}

#[cfg(test)]
pub(crate) mod test_support {
    use chrono::NaiveDate;
    use serde_json::Value;
    use viralapp_fetch::testing::ScriptedTransport;

    use crate::{OperationContext, Parameters};

    pub(crate) fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, 20).unwrap()
    }

    pub(crate) fn context<'a>(
        transport: &'a ScriptedTransport,
        params: &'a Parameters,
    ) -> OperationContext<'a> {
        OperationContext::new(transport, params).with_today(today())
    }

    pub(crate) fn params(value: Value) -> Parameters {
        Parameters::from_value(value)
    }
}
