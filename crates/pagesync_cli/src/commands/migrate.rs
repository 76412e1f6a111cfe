//! Database migration commands.

use clap::Subcommand;
use sea_orm_migration::MigratorTrait;

use pagesync::migration::Migrator;

/// Migration subcommands.
#[derive(Subcommand)]
pub enum MigrateAction {
    /// Apply all pending migrations
    Up,
    /// Show migration status
    Status,
    /// Drop all tables and reapply migrations
    Fresh,
}

/// Handle migration commands.
pub async fn handle(
    action: MigrateAction,
    database_url: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let db = pagesync::connect(database_url).await?;

    match action {
        MigrateAction::Up => Migrator::up(&db, None).await?,
        MigrateAction::Status => Migrator::status(&db).await?,
        MigrateAction::Fresh => Migrator::fresh(&db).await?,
    }

    Ok(())
}
