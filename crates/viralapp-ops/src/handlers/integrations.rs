use serde_json::json;
use viralapp_fetch::ApiRequest;
use viralapp_types::Result;

use super::{fetch_collection, object};
use crate::{OperationContext, OperationOutput, simplify};

pub(crate) async fn get_apps(ctx: &OperationContext<'_>) -> Result<OperationOutput> {
    let filters = ctx.params.collection("filters");
    let query = object(json!({
        "provider": filters.get("provider"),
        "search": filters.get("search"),
        "sortCol": filters.get("sortCol"),
        "sortDir": filters.get("sortDir"),
    }));

    let request = ApiRequest::get("/apps").with_query(query);
    fetch_collection(ctx, &request, |r| simplify::pick(r, simplify::APP)).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handlers::test_support::{context, params};
    use viralapp_fetch::testing::ScriptedTransport;

    #[tokio::test]
    async fn test_get_apps_returns_all_pages() {
        let transport = ScriptedTransport::new()
            .respond(json!({"data": [{"id": 1}], "pageCount": 2}))
            .respond(json!({"data": [{"id": 2}], "pageCount": 2}));
        let p = params(json!({"returnAll": true, "filters": {"provider": "shopify"}}));

        let output = get_apps(&context(&transport, &p)).await.unwrap();
        assert_eq!(output, OperationOutput::Records(vec![json!({"id": 1}), json!({"id": 2})]));

        let requests = transport.requests();
        assert_eq!(requests.len(), 2);
        assert_eq!(requests[1].query["page"], 2);
        assert_eq!(requests[1].query["provider"], "shopify");
    }
}
