//! Query commands over stored and live data.

use console::style;
use uuid::Uuid;

use pagesync::SyncOptions;

use crate::config::Config;

const PREVIEW_LEN: usize = 72;

/// Print an account's stored posts, newest first.
pub async fn posts(
    account_id: Uuid,
    config: &Config,
    database_url: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let engine = super::build_engine(config, database_url, SyncOptions::default()).await?;
    let posts = engine.list_posts(account_id).await?;

    if posts.is_empty() {
        println!("no posts stored for {account_id}");
        return Ok(());
    }

    for post in &posts {
        println!(
            "{}  {}  {}",
            post.created_time.format("%Y-%m-%d %H:%M"),
            style(&post.remote_post_id).dim(),
            truncate(post.message.as_deref().unwrap_or(""))
        );
    }
    println!("{} post(s)", posts.len());
    Ok(())
}

/// Print one stored page metric, newest first.
pub async fn metric(
    account_id: Uuid,
    name: &str,
    today: bool,
    config: &Config,
    database_url: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let engine = super::build_engine(config, database_url, SyncOptions::default()).await?;
    let rows = engine.get_metric(account_id, name, today).await?;

    if rows.is_empty() {
        println!("no values stored for {name}");
        return Ok(());
    }

    for row in &rows {
        println!(
            "{}  {:>12}  {}",
            row.end_time.format("%Y-%m-%d %H:%M"),
            row.value,
            style(&row.period).dim()
        );
    }
    Ok(())
}

/// Fetch and classify an account's live comments without storing them.
pub async fn comments(
    account_id: Uuid,
    config: &Config,
    database_url: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let engine = super::build_engine(config, database_url, SyncOptions::default()).await?;
    let classified = engine.preview_comments(account_id).await?;

    for comment in &classified {
        println!("{:>8}  {}", comment.sentiment, truncate(&comment.text));
    }
    println!("{} comment(s)", classified.len());
    Ok(())
}

fn truncate(text: &str) -> String {
    let flattened = text.replace('\n', " ");
    if flattened.chars().count() <= PREVIEW_LEN {
        return flattened;
    }
    let mut preview: String = flattened.chars().take(PREVIEW_LEN).collect();
    preview.push_str("...");
    preview
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncate_flattens_newlines_and_bounds_length() {
        assert_eq!(truncate("short\ntext"), "short text");

        let long = "x".repeat(200);
        let preview = truncate(&long);
        assert_eq!(preview.chars().count(), PREVIEW_LEN + 3);
        assert!(preview.ends_with("..."));
    }
}
