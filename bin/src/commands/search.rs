//! Search command: paged option lookups.

use anyhow::Result;
use clap::ValueEnum;
use viralapp_lib::prelude::*;
use viralapp_lib::search;

/// What a search looks up.
#[derive(Clone, Copy, ValueEnum)]
pub(crate) enum SearchKind {
    Accounts,
    Projects,
    TrackedAccounts,
    Videos,
}

/// Execute the search command.
pub(crate) async fn search(
    client: &ApiClient,
    kind: SearchKind,
    filter: Option<&str>,
    platform: Option<&str>,
    account: Option<&str>,
    page_token: Option<&str>,
) -> Result<()> {
    let results = match kind {
        SearchKind::Accounts => search::account_search(client, filter, page_token).await?,
        SearchKind::Projects => search::project_search(client, filter, page_token).await?,
        SearchKind::TrackedAccounts => {
            search::tracked_account_search(client, filter, platform, page_token).await?
        }
        SearchKind::Videos => {
            search::video_search(client, filter, platform, account, page_token).await?
        }
    };

    println!("{}", serde_json::to_string_pretty(&results)?);
    Ok(())
}
