//! Pagesync CLI - command-line interface for the page sync engine.

mod commands;
mod config;
mod shutdown;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

#[derive(Parser)]
#[command(name = "pagesync")]
#[command(version)]
#[command(about = "Incremental social page synchronization with sentiment enrichment")]
#[command(
    long_about = "Pagesync ingests a page's posts, comments, reactions and metrics from the \
remote Graph API, deduplicates them against the local database by natural key, \
labels comment text with a sentiment category and stores the result for querying."
)]
#[command(after_long_help = r#"EXAMPLES
    Register an account and its page:
        $ pagesync account add --token EAAB... --page 113907971234567

    Run a full sync for one account:
        $ pagesync sync 7c6f7b1e-1111-2222-3333-444455556666

    Sync several accounts concurrently, including individual reactions:
        $ pagesync sync <id-a> <id-b> --concurrency 2 --with-reactions

    Query stored data:
        $ pagesync posts <account-id>
        $ pagesync metric <account-id> page_fans --today

CONFIGURATION
    Pagesync reads configuration from:
      1. ~/.config/pagesync/config.toml (or $XDG_CONFIG_HOME/pagesync/config.toml)
      2. ./pagesync.toml
      3. Environment variables (PAGESYNC_* prefix, e.g. PAGESYNC_DATABASE__URL)

ENVIRONMENT VARIABLES
    PAGESYNC_DATABASE__URL        Database connection string
    PAGESYNC_GRAPH__BASE_URL      Graph API host override
    PAGESYNC_SENTIMENT__HF_TOKEN  Hugging Face inference API token
"#)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate {
        #[command(subcommand)]
        action: commands::migrate::MigrateAction,
    },
    /// Manage accounts and their page mappings
    Account {
        #[command(subcommand)]
        action: commands::account::AccountAction,
    },
    /// Sync one or more accounts
    Sync(commands::sync::SyncArgs),
    /// List an account's stored posts, newest first
    Posts {
        /// Account id
        account_id: Uuid,
    },
    /// Show one stored page metric, newest first
    Metric {
        /// Account id
        account_id: Uuid,
        /// Metric name (e.g. page_fans)
        name: String,
        /// Only values from the current UTC day
        #[arg(long)]
        today: bool,
    },
    /// Fetch and classify live comments without storing them
    Comments {
        /// Account id
        account_id: Uuid,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let config = config::Config::load()?;
    let database_url = config.database_url();

    match cli.command {
        Commands::Migrate { action } => commands::migrate::handle(action, &database_url).await?,
        Commands::Account { action } => commands::account::handle(action, &database_url).await?,
        Commands::Sync(args) => commands::sync::handle(args, &config, &database_url).await?,
        Commands::Posts { account_id } => {
            commands::query::posts(account_id, &config, &database_url).await?;
        }
        Commands::Metric {
            account_id,
            name,
            today,
        } => {
            commands::query::metric(account_id, &name, today, &config, &database_url).await?;
        }
        Commands::Comments { account_id } => {
            commands::query::comments(account_id, &config, &database_url).await?;
        }
    }

    Ok(())
}
