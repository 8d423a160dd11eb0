use serde_json::json;
use viralapp_fetch::ApiRequest;
use viralapp_types::Result;

use super::{apply_date_range, export_range, fetch_collection, object};
use crate::binary::{EXPORT_MIME, FileKind, follow_download};
use crate::{OperationContext, OperationOutput, simplify};

pub(crate) async fn get_all(ctx: &OperationContext<'_>) -> Result<OperationOutput> {
    let filters = ctx.params.collection("filters");
    let mut query = object(json!({
        "search": filters.get("search"),
        "platforms": filters.get("platforms"),
        "accounts": filters.ids("accounts"),
        "projects": filters.ids("projects"),
        "contentTypes": filters.get("contentTypes"),
        "sortCol": filters.get("sortCol"),
        "sortDir": filters.get("sortDir"),
    }));
    apply_date_range(&mut query, &filters, "dateRangeFrom", "dateRangeTo")?;

    let request = ApiRequest::get("/accounts").with_query(query);
    fetch_collection(ctx, &request, |r| simplify::pick(r, simplify::ACCOUNT_ANALYTICS)).await
}

pub(crate) async fn export(ctx: &OperationContext<'_>) -> Result<OperationOutput> {
    let body = ctx.params.collection("exportBody");
    let range = export_range(ctx, &body)?;
    let payload = object(json!({
        "search": body.get("search"),
        "platforms": body.ids("platforms"),
        "accounts": body.ids("accounts"),
        "projects": body.ids("projects"),
        "contentTypes": body.get("contentTypes"),
        "dateRange": range,
    }));

    let response = ctx
        .transport
        .send(&ApiRequest::post("/accounts/export").with_body(payload))
        .await?;
    follow_download(
        ctx.transport,
        response,
        "accounts-export.csv",
        EXPORT_MIME,
        FileKind::Export,
    )
    .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handlers::test_support::{context, params};
    use serde_json::Value;
    use viralapp_fetch::HttpMethod;
    use viralapp_fetch::testing::ScriptedTransport;

    #[tokio::test]
    async fn test_get_all_builds_filters() {
        let transport = ScriptedTransport::new().respond(json!({
            "data": [{"id": "a1", "username": "cat", "platform": "tiktok", "bio": "meow"}],
            "pageCount": 1,
        }));
        let p = params(json!({
            "limit": 10,
            "filters": {
                "search": "cat",
                "platforms": ["tiktok"],
                "accounts": [{"mode": "list", "value": "a1"}, " "],
                "dateRangeFrom": "2025-01-01T00:00:00Z",
                "dateRangeTo": "2025-01-31",
                "sortDir": "desc",
            },
            "options": {"simplifyOutput": true},
        }));

        let output = get_all(&context(&transport, &p)).await.unwrap();
        assert_eq!(
            output,
            OperationOutput::Records(vec![json!({"id": "a1", "username": "cat", "platform": "tiktok"})])
        );

        let sent = &transport.requests()[0];
        assert_eq!(sent.path, "/accounts");
        assert_eq!(sent.query["accounts"], json!(["a1"]));
        assert_eq!(sent.query["dateRange[from]"], "2025-01-01");
        assert_eq!(sent.query["dateRange[to]"], "2025-01-31");
        assert_eq!(sent.query["perPage"], 10);
        assert_eq!(sent.query["projects"], Value::Null);
    }

    #[tokio::test]
    async fn test_export_defaults_to_trailing_window() {
        let transport = ScriptedTransport::new()
            .respond(json!({"downloadUrl": "https://files.example/a.csv", "rowCount": 2}))
            .respond_download(&b"id\n1\n2\n"[..]);
        let p = params(json!({"exportBody": {"platforms": "tiktok"}}));

        let output = export(&context(&transport, &p)).await.unwrap();

        let sent = &transport.requests()[0];
        assert_eq!(sent.method, HttpMethod::Post);
        assert_eq!(sent.path, "/accounts/export");
        assert_eq!(
            sent.json_body(),
            Some(json!({
                "platforms": ["tiktok"],
                "dateRange": {"from": "2025-03-06", "to": "2025-03-20"},
            }))
        );

        let OperationOutput::Files(files) = output else {
            panic!("expected an attachment");
        };
        assert_eq!(files[0].binary.file_name, "accounts-export.csv");
        assert_eq!(files[0].json["rowCount"], 2);
    }
}
