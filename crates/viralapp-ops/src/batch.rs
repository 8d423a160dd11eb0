//! Runs a sequence of invocations the way a workflow host does.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use viralapp_fetch::Transport;
use viralapp_types::Result;

use crate::{ExecutionRecord, OperationContext, Parameters, dispatch_with};

/// What to do when an item fails.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FailureMode {
    /// Stop at the first failure and return its error.
    #[default]
    Abort,
    /// Turn the failure into an error record and carry on.
    Continue,
}

/// One input item: which operation to run and with what.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Invocation {
    /// Resource name, e.g. `projects`.
    pub resource: String,
    /// Operation name, e.g. `getAll`.
    pub operation: String,
    /// Resolved parameters.
    #[serde(default)]
    pub params: Parameters,
}

impl Invocation {
    /// Creates an invocation.
    #[must_use]
    pub fn new(
        resource: impl Into<String>,
        operation: impl Into<String>,
        params: Parameters,
    ) -> Self {
        Self {
            resource: resource.into(),
            operation: operation.into(),
            params,
        }
    }
}

/// Executes invocations sequentially, pairing every record with its item.
pub struct BatchRunner<'a> {
    transport: &'a dyn Transport,
    mode: FailureMode,
    today: NaiveDate,
}

impl<'a> BatchRunner<'a> {
    /// Creates a runner that aborts on failure.
    #[must_use]
    pub fn new(transport: &'a dyn Transport) -> Self {
        Self {
            transport,
            mode: FailureMode::default(),
            today: chrono::Local::now().date_naive(),
        }
    }

    /// Sets the failure mode.
    #[must_use]
    pub const fn with_mode(mut self, mode: FailureMode) -> Self {
        self.mode = mode;
        self
    }

    /// Overrides the reference date used for default export windows.
    #[must_use]
    pub const fn with_today(mut self, today: NaiveDate) -> Self {
        self.today = today;
        self
    }

    /// Runs every invocation in order.
    ///
    /// # Errors
    ///
    /// In [`FailureMode::Abort`], returns the first item's error; records of
    /// earlier items are discarded.
    pub async fn run(&self, items: &[Invocation]) -> Result<Vec<ExecutionRecord>> {
        let mut records = Vec::new();

        for (index, item) in items.iter().enumerate() {
            let ctx = OperationContext::new(self.transport, &item.params).with_today(self.today);
            match dispatch_with(&ctx, &item.resource, &item.operation).await {
                Ok(output) => {
                    let produced = output.into_records(index);
                    info!(
                        item = index,
                        resource = %item.resource,
                        operation = %item.operation,
                        records = produced.len(),
                        "item completed"
                    );
                    records.extend(produced);
                }
                Err(error) if self.mode == FailureMode::Continue => {
                    warn!(
                        item = index,
                        resource = %item.resource,
                        operation = %item.operation,
                        %error,
                        "item failed, continuing"
                    );
                    records.push(ExecutionRecord::failure(
                        &error.to_string(),
                        &item.resource,
                        &item.operation,
                        index,
                    ));
                }
                Err(error) => {
                    warn!(
                        item = index,
                        resource = %item.resource,
                        operation = %item.operation,
                        %error,
                        "item failed"
                    );
                    return Err(error);
                }
            }
        }

        Ok(records)
    }
}

impl std::fmt::Debug for BatchRunner<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BatchRunner")
            .field("mode", &self.mode)
            .field("today", &self.today)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{Value, json};
    use viralapp_fetch::testing::ScriptedTransport;
    use viralapp_types::{ErrorKind, ViralAppError};

    fn invocation(resource: &str, operation: &str, params: Value) -> Invocation {
        Invocation::new(resource, operation, Parameters::from_value(params))
    }

    fn items() -> Vec<Invocation> {
        vec![
            invocation("trackedAccounts", "getCount", json!({})),
            invocation("projects", "update", json!({"projectId": "p1", "updateFields": {"name": "x"}})),
            invocation("projects", "delete", json!({"projectId": "p2"})),
        ]
    }

    fn failing_transport() -> ScriptedTransport {
        ScriptedTransport::new()
            .respond(json!({"count": 4}))
            .fail(ViralAppError::NotFound { body: None })
            .respond(Value::Null)
    }

    #[tokio::test]
    async fn test_continue_on_fail_records_error() {
        let transport = failing_transport();
        let records = BatchRunner::new(&transport)
            .with_mode(FailureMode::Continue)
            .run(&items())
            .await
            .unwrap();

        assert_eq!(records.len(), 3);
        assert_eq!(Value::Object(records[0].json.clone()), json!({"count": 4}));
        assert_eq!(
            Value::Object(records[1].json.clone()),
            json!({"error": "Resource not found", "resource": "projects", "operation": "update"})
        );
        assert_eq!(records[1].paired_item, 1);
        assert_eq!(Value::Object(records[2].json.clone()), json!({"deleted": true}));
        assert_eq!(records[2].paired_item, 2);
    }

    #[tokio::test]
    async fn test_abort_stops_batch() {
        let transport = failing_transport();
        let err = BatchRunner::new(&transport).run(&items()).await.unwrap_err();

        assert_eq!(err.kind(), ErrorKind::NotFound);
        assert_eq!(transport.requests().len(), 2);
    }

    #[tokio::test]
    async fn test_unsupported_operation_becomes_record() {
        let transport = ScriptedTransport::new();
        let records = BatchRunner::new(&transport)
            .with_mode(FailureMode::Continue)
            .run(&[invocation("projects", "archive", json!({}))])
            .await
            .unwrap();

        assert_eq!(
            records[0].json["error"],
            "Unsupported operation \"archive\" for resource \"projects\"."
        );
        assert!(transport.requests().is_empty());
    }

    #[tokio::test]
    async fn test_empty_list_yields_success_record() {
        let transport = ScriptedTransport::new().respond(json!({"data": [], "pageCount": 0}));
        let records = BatchRunner::new(&transport)
            .run(&[invocation("integrations", "getApps", json!({"returnAll": true}))])
            .await
            .unwrap();

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].json["success"], true);
        assert_eq!(records[0].paired_item, 0);
    }

    #[test]
    fn test_invocation_deserializes_without_params() {
        let item: Invocation = serde_json::from_value(json!({"resource": "projects", "operation": "getAll"})).unwrap();
        assert_eq!(item.params, Parameters::new());
    }
}
