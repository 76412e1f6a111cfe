//! Shared sync types and constants.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use uuid::Uuid;

use crate::entity::sentiment_label::SentimentLabel;

/// Default number of accounts synced concurrently.
pub const DEFAULT_ACCOUNT_CONCURRENCY: usize = 4;

/// Default number of per-post fetch workers within one account.
pub const DEFAULT_POST_CONCURRENCY: usize = 8;

/// Page metrics collected by default.
pub const DEFAULT_PAGE_METRICS: [&str; 3] = ["page_impressions", "page_fans", "page_views_total"];

/// Fields requested when fetching posts.
pub const POST_FIELDS: &str = "id,message,created_time";

/// Fields requested when fetching comments.
pub const COMMENT_FIELDS: &str = "id,message,created_time,from";

/// Fields requested when fetching individual reactions.
pub const REACTION_FIELDS: &str = "id,name,type,profile_type";

/// Initial backoff delay in milliseconds for transient fetch retries.
pub const INITIAL_BACKOFF_MS: u64 = 500;

/// Maximum backoff delay in milliseconds.
pub const MAX_BACKOFF_MS: u64 = 30_000;

/// Maximum retries for a single transient fetch failure.
pub const MAX_FETCH_RETRIES: u32 = 3;

/// Options for one account's sync run.
#[derive(Debug, Clone)]
pub struct SyncOptions {
    /// Bounded concurrency of the per-post fetch loops.
    pub post_concurrency: usize,
    /// Whether to also sync individual reactions (stage 4).
    pub include_reactions: bool,
    /// Page metric names collected in the page-metrics stage.
    pub page_metrics: Vec<String>,
}

impl Default for SyncOptions {
    fn default() -> Self {
        Self {
            post_concurrency: DEFAULT_POST_CONCURRENCY,
            include_reactions: false,
            page_metrics: DEFAULT_PAGE_METRICS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

/// Cooperative cancellation flag shared between the engine and its caller.
///
/// Cancelling stops further remote calls; stages already committed stay
/// committed and partial inserts are not undone.
#[derive(Clone, Debug, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Release);
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

/// Statistics for one pipeline stage.
#[derive(Debug, Default, Clone)]
pub struct StageStats {
    /// Records fetched from the remote API.
    pub fetched: usize,
    /// Rows inserted locally.
    pub inserted: u64,
    /// Contained per-item failures (one post, one metric name).
    pub errors: Vec<String>,
}

/// Pipeline stages, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncStage {
    Posts,
    Comments,
    Reactions,
    ReactionSummaries,
    PageMetrics,
}

impl std::fmt::Display for SyncStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SyncStage::Posts => write!(f, "posts"),
            SyncStage::Comments => write!(f, "comments"),
            SyncStage::Reactions => write!(f, "reactions"),
            SyncStage::ReactionSummaries => write!(f, "reaction summaries"),
            SyncStage::PageMetrics => write!(f, "page metrics"),
        }
    }
}

/// Result of one account's sync run, per stage.
#[derive(Debug, Default, Clone)]
pub struct SyncReport {
    pub posts: StageStats,
    pub comments: StageStats,
    pub reactions: StageStats,
    pub reaction_summaries: StageStats,
    pub page_metrics: StageStats,
}

impl SyncReport {
    /// Total rows inserted across all stages.
    #[must_use]
    pub fn total_inserted(&self) -> u64 {
        self.posts.inserted
            + self.comments.inserted
            + self.reactions.inserted
            + self.reaction_summaries.inserted
            + self.page_metrics.inserted
    }

    /// Total contained per-item failures across all stages.
    #[must_use]
    pub fn error_count(&self) -> usize {
        self.posts.errors.len()
            + self.comments.errors.len()
            + self.reactions.errors.len()
            + self.reaction_summaries.errors.len()
            + self.page_metrics.errors.len()
    }
}

/// Result of syncing a single account inside a multi-account run.
#[derive(Debug)]
pub struct AccountSyncResult {
    pub account_id: Uuid,
    /// Per-stage statistics; partially filled when the run failed mid-way.
    pub report: SyncReport,
    /// Error if the run failed.
    pub error: Option<String>,
}

/// A classified comment returned by the non-persisting preview query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassifiedComment {
    pub text: String,
    pub sentiment: SentimentLabel,
}
