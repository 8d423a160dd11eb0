//! Run command: executes invocations through the batch runner.

use anyhow::{Context, Result, bail};
use std::path::Path;
use tracing::info;
use viralapp_lib::prelude::*;

use crate::display;

/// Reads a JSON list of invocations.
pub(crate) fn load_items(path: &Path) -> Result<Vec<Invocation>> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read items file {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("Invalid items file {}", path.display()))
}

/// Builds the single invocation described by the command-line flags.
pub(crate) fn single_item(
    resource: Option<&str>,
    operation: Option<&str>,
    params: Option<&str>,
) -> Result<Invocation> {
    let (Some(resource), Some(operation)) = (resource, operation) else {
        bail!("--resource and --operation are required without --items");
    };
    let params = match params {
        Some(raw) => parse_params(raw)?,
        None => Parameters::new(),
    };
    Ok(Invocation::new(resource, operation, params))
}

/// Parses inline JSON, or the JSON file named after a leading `@`.
pub(crate) fn parse_params(raw: &str) -> Result<Parameters> {
    let text = match raw.strip_prefix('@') {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read parameters file {path}"))?,
        None => raw.to_string(),
    };
    let value: serde_json::Value = serde_json::from_str(&text).context("Parameters must be JSON")?;
    if !value.is_object() {
        bail!("Parameters must be a JSON object");
    }
    Ok(Parameters::from_value(value))
}

/// Runs the invocations, prints their records and saves any attachments.
pub(crate) async fn run(
    client: &ApiClient,
    items: &[Invocation],
    continue_on_fail: bool,
    output_dir: Option<&Path>,
) -> Result<()> {
    let mode = if continue_on_fail {
        FailureMode::Continue
    } else {
        FailureMode::Abort
    };

    info!(items = items.len(), ?mode, "running batch");
    let records = BatchRunner::new(client).with_mode(mode).run(items).await?;

    match output_dir {
        Some(dir) => {
            for path in display::write_attachments(&records, dir)? {
                info!(path = %path.display(), "saved attachment");
            }
        }
        None => display::warn_unsaved(&records),
    }

    display::print_records(&records)
}
