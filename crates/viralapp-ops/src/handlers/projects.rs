use serde_json::{Value, json};
use viralapp_fetch::ApiRequest;
use viralapp_types::{Result, ViralAppError};

use super::{fetch_collection, object};
use crate::{OperationContext, OperationOutput, simplify};

fn project_id(ctx: &OperationContext<'_>) -> Result<String> {
    ctx.params.required_id("projectId", "Project ID is required.")
}

fn account_id(ctx: &OperationContext<'_>) -> Result<String> {
    ctx.params.required_id("accountId", "Account ID is required.")
}

fn deleted() -> OperationOutput {
    OperationOutput::Record(json!({"deleted": true}))
}

pub(crate) async fn get_all(ctx: &OperationContext<'_>) -> Result<OperationOutput> {
    let filters = ctx.params.collection("filters");
    let request =
        ApiRequest::get("/projects").with_query(object(json!({"search": filters.get("name")})));
    fetch_collection(ctx, &request, simplify::project).await
}

pub(crate) async fn create(ctx: &OperationContext<'_>) -> Result<OperationOutput> {
    let name = ctx
        .params
        .str("name")
        .filter(|n| !n.trim().is_empty())
        .ok_or_else(|| ViralAppError::validation("Project name is required."))?;

    let mut body = ctx.params.collection("additionalFields").as_map().clone();
    body.insert("name".to_string(), Value::String(name.to_string()));

    let response = ctx.transport.send(&ApiRequest::post("/projects").with_body(body)).await?;
    Ok(OperationOutput::from_response(response))
}

pub(crate) async fn update(ctx: &OperationContext<'_>) -> Result<OperationOutput> {
    let id = project_id(ctx)?;
    let body = ctx.params.collection("updateFields").as_map().clone();
    let response = ctx
        .transport
        .send(&ApiRequest::put(format!("/projects/{id}")).with_body(body))
        .await?;
    Ok(OperationOutput::from_response(response))
}

pub(crate) async fn delete(ctx: &OperationContext<'_>) -> Result<OperationOutput> {
    let id = project_id(ctx)?;
    ctx.transport.send(&ApiRequest::delete(format!("/projects/{id}"))).await?;
    Ok(deleted())
}

pub(crate) async fn add_account(ctx: &OperationContext<'_>) -> Result<OperationOutput> {
    let (project, account) = (project_id(ctx)?, account_id(ctx)?);
    let response = ctx
        .transport
        .send(&ApiRequest::post(format!("/projects/{project}/accounts/{account}")))
        .await?;
    Ok(OperationOutput::from_response(response))
}

pub(crate) async fn remove_account(ctx: &OperationContext<'_>) -> Result<OperationOutput> {
    let (project, account) = (project_id(ctx)?, account_id(ctx)?);
    ctx.transport
        .send(&ApiRequest::delete(format!("/projects/{project}/accounts/{account}")))
        .await?;
    Ok(deleted())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handlers::test_support::{context, params};
    use viralapp_fetch::HttpMethod;
    use viralapp_fetch::testing::ScriptedTransport;
    use viralapp_types::ErrorKind;

    #[tokio::test]
    async fn test_create_merges_additional_fields() {
        let transport = ScriptedTransport::new().respond(json!({"id": "p9", "name": "Launch"}));
        let p = params(json!({
            "name": "Launch",
            "additionalFields": {"description": "Q3 push", "logo": ""},
        }));

        let output = create(&context(&transport, &p)).await.unwrap();
        assert_eq!(output, OperationOutput::Record(json!({"id": "p9", "name": "Launch"})));
        assert_eq!(
            transport.requests()[0].json_body(),
            Some(json!({"name": "Launch", "description": "Q3 push"}))
        );
    }

    #[tokio::test]
    async fn test_delete_reports_deleted() {
        let transport = ScriptedTransport::new().respond(Value::Null);
        let p = params(json!({"projectId": {"mode": "id", "value": "p1"}}));

        let output = delete(&context(&transport, &p)).await.unwrap();
        assert_eq!(output, OperationOutput::Record(json!({"deleted": true})));

        let sent = &transport.requests()[0];
        assert_eq!(sent.method, HttpMethod::Delete);
        assert_eq!(sent.path, "/projects/p1");
        assert_eq!(sent.json_body(), None);
    }

    #[tokio::test]
    async fn test_account_paths() {
        let transport = ScriptedTransport::new().respond(json!({"ok": true})).respond(Value::Null);
        let p = params(json!({"projectId": "p1", "accountId": {"mode": "list", "value": "a7"}}));
        let ctx = context(&transport, &p);

        add_account(&ctx).await.unwrap();
        assert_eq!(remove_account(&ctx).await.unwrap(), deleted());

        let requests = transport.requests();
        assert_eq!(requests[0].path, "/projects/p1/accounts/a7");
        assert_eq!(requests[0].json_body(), Some(json!({})));
        assert_eq!(requests[1].method, HttpMethod::Delete);
    }

    #[tokio::test]
    async fn test_missing_project_id() {
        let transport = ScriptedTransport::new();
        let p = params(json!({"updateFields": {"name": "x"}}));
        let err = update(&context(&transport, &p)).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
        assert!(transport.requests().is_empty());
    }

    #[tokio::test]
    async fn test_get_all_simplifies() {
        let transport = ScriptedTransport::new()
            .respond(json!({"data": [{"id": "p1", "name": "A", "trackedAccounts": [{}, {}], "color": "red"}]}));
        let p = params(json!({"filters": {"name": "A"}, "options": {"simplifyOutput": true}}));

        let output = get_all(&context(&transport, &p)).await.unwrap();
        assert_eq!(
            output,
            OperationOutput::Records(vec![json!({"id": "p1", "name": "A", "trackedAccountsCount": 2})])
        );
        assert_eq!(transport.requests()[0].query["search"], "A");
    }
}
