//! Account management commands.

use clap::Subcommand;
use console::style;

use pagesync::repository;

/// Account subcommands.
#[derive(Subcommand)]
pub enum AccountAction {
    /// Register an account with its access token and remote page id
    Add {
        /// API access token for the account
        #[arg(long)]
        token: String,
        /// Remote page identifier to track
        #[arg(long)]
        page: String,
    },
    /// List registered accounts and their pages
    List,
}

/// Handle account commands.
pub async fn handle(
    action: AccountAction,
    database_url: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let db = pagesync::connect_and_migrate(database_url).await?;

    match action {
        AccountAction::Add { token, page } => {
            let account = repository::accounts::insert_account(&db, &token).await?;
            let page = repository::accounts::insert_page(&db, account.id, &page).await?;
            println!(
                "{} account {} tracking page {}",
                style("registered").green().bold(),
                account.id,
                page.remote_page_id
            );
        }
        AccountAction::List => {
            let accounts = repository::accounts::list_accounts(&db).await?;
            if accounts.is_empty() {
                println!("no accounts registered");
                return Ok(());
            }
            for (account, page) in accounts {
                let page_label = page
                    .map(|p| p.remote_page_id)
                    .unwrap_or_else(|| "-".to_string());
                println!("{}  page: {}", account.id, page_label);
            }
        }
    }

    Ok(())
}
