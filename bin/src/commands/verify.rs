//! Verify command.

use anyhow::{Context, Result};
use viralapp_lib::prelude::*;

/// Checks the API key against the API.
pub(crate) async fn verify(client: &ApiClient) -> Result<()> {
    client
        .verify_credentials()
        .await
        .context("API key was not accepted")?;
    println!("API key accepted ({})", client.config().base_url);
    Ok(())
}
