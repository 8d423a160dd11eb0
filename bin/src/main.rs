//! viralapp CLI - Drives the ViralApp analytics API the way a workflow host does.

use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod display;

use commands::search::SearchKind;

#[derive(Parser)]
#[command(name = "viralapp")]
#[command(about = "Run ViralApp analytics API operations", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Quiet mode (only errors are logged)
    #[arg(short, long, global = true)]
    quiet: bool,

    /// API key
    #[arg(long, env = "VIRALAPP_API_KEY", hide_env_values = true, global = true)]
    api_key: Option<String>,

    /// API root override
    #[arg(long, env = "VIRALAPP_BASE_URL", global = true)]
    base_url: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run one operation, or a batch of them from a file
    Run {
        /// Resource name (e.g., trackedAccounts, videoAnalytics)
        #[arg(short, long, required_unless_present = "items")]
        resource: Option<String>,

        /// Operation name (e.g., getAll, export)
        #[arg(short, long, required_unless_present = "items")]
        operation: Option<String>,

        /// Parameters as inline JSON, or @path to a JSON file
        #[arg(short, long)]
        params: Option<String>,

        /// JSON file holding a list of {resource, operation, params} items
        #[arg(long, conflicts_with_all = ["resource", "operation", "params"])]
        items: Option<PathBuf>,

        /// Emit error records for failed items instead of stopping
        #[arg(long)]
        continue_on_fail: bool,

        /// Directory for exported files and downloaded videos
        #[arg(short = 'd', long)]
        output_dir: Option<PathBuf>,
    },

    /// Look up selectable accounts, projects or videos
    Search {
        /// What to search
        #[arg(value_enum)]
        kind: SearchKind,

        /// Search text
        #[arg(short, long)]
        filter: Option<String>,

        /// Platform (tiktok, instagram, youtube)
        #[arg(long)]
        platform: Option<String>,

        /// Organization account ID (videos only)
        #[arg(long)]
        account: Option<String>,

        /// Pagination token from a previous search
        #[arg(long)]
        page_token: Option<String>,
    },

    /// Check that the API key is accepted
    Verify,
}

fn init_tracing(verbose: u8, quiet: bool) {
    let default_level = match (quiet, verbose) {
        (true, _) => "error",
        (false, 0) => "warn",
        (false, 1) => "info",
        (false, 2) => "debug",
        (false, _) => "trace",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false).compact())
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.quiet);

    // Show help if no command provided
    let Some(command) = cli.command else {
        Cli::command().print_help()?;
        return Ok(());
    };

    let client = commands::build_client(cli.api_key.as_deref(), cli.base_url.as_deref())?;

    match command {
        Commands::Run {
            resource,
            operation,
            params,
            items,
            continue_on_fail,
            output_dir,
        } => {
            let items = match items {
                Some(path) => commands::run::load_items(&path)?,
                None => vec![commands::run::single_item(
                    resource.as_deref(),
                    operation.as_deref(),
                    params.as_deref(),
                )?],
            };
            commands::run::run(&client, &items, continue_on_fail, output_dir.as_deref()).await
        }
        Commands::Search {
            kind,
            filter,
            platform,
            account,
            page_token,
        } => {
            commands::search::search(
                &client,
                kind,
                filter.as_deref(),
                platform.as_deref(),
                account.as_deref(),
                page_token.as_deref(),
            )
            .await
        }
        Commands::Verify => commands::verify::verify(&client).await,
    }
}
