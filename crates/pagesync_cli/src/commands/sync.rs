//! Sync command: run the staged pipeline for one or more accounts.

use clap::Args;
use console::style;
use uuid::Uuid;

use pagesync::{CancelFlag, StageStats, SyncOptions, SyncReport};

use crate::config::Config;
use crate::shutdown;

/// Arguments for the sync command.
#[derive(Debug, Args)]
pub struct SyncArgs {
    /// Account id(s) to sync
    #[arg(required = true)]
    pub account_ids: Vec<Uuid>,

    /// Maximum accounts synced concurrently
    #[arg(long)]
    pub concurrency: Option<usize>,

    /// Per-post fetch workers within one account
    #[arg(long)]
    pub post_concurrency: Option<usize>,

    /// Also sync individual reactions
    #[arg(long)]
    pub with_reactions: bool,
}

/// Handle the sync command.
pub async fn handle(
    args: SyncArgs,
    config: &Config,
    database_url: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let options = SyncOptions {
        post_concurrency: args
            .post_concurrency
            .unwrap_or(config.sync.post_concurrency),
        include_reactions: args.with_reactions || config.sync.include_reactions,
        ..SyncOptions::default()
    };

    let cancel = CancelFlag::new();
    let engine = super::build_engine(config, database_url, options)
        .await?
        .with_cancel_flag(cancel.clone());
    shutdown::install_shutdown_handler(cancel);

    if let [account_id] = args.account_ids[..] {
        let report = engine.sync(account_id).await?;
        print_report(account_id, &report);
        return Ok(());
    }

    let concurrency = args.concurrency.unwrap_or(config.sync.account_concurrency);
    let results = engine.sync_accounts(&args.account_ids, concurrency).await;

    let mut failed = 0usize;
    for result in &results {
        match &result.error {
            None => print_report(result.account_id, &result.report),
            Some(error) => {
                failed += 1;
                eprintln!(
                    "{} {}: {}",
                    style("failed").red().bold(),
                    result.account_id,
                    error
                );
            }
        }
    }

    if failed > 0 {
        return Err(format!("{failed} account(s) failed to sync").into());
    }
    Ok(())
}

fn print_report(account_id: Uuid, report: &SyncReport) {
    println!("{} {}", style("synced").green().bold(), account_id);
    print_stage("posts", &report.posts);
    print_stage("comments", &report.comments);
    print_stage("reactions", &report.reactions);
    print_stage("reaction summaries", &report.reaction_summaries);
    print_stage("page metrics", &report.page_metrics);

    let contained = report.error_count();
    if contained > 0 {
        println!(
            "  {}",
            style(format!("{contained} item(s) skipped:")).yellow()
        );
        let all_errors = report
            .posts
            .errors
            .iter()
            .chain(&report.comments.errors)
            .chain(&report.reactions.errors)
            .chain(&report.reaction_summaries.errors)
            .chain(&report.page_metrics.errors);
        for error in all_errors.take(10) {
            println!("    - {error}");
        }
        if contained > 10 {
            println!("    ... and {} more", contained - 10);
        }
    }
}

fn print_stage(name: &str, stats: &StageStats) {
    println!(
        "  {:<20} {:>5} fetched {:>5} inserted",
        name, stats.fetched, stats.inserted
    );
}
