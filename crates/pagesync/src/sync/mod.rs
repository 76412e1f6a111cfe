//! The synchronization pipeline.
//!
//! One run per account walks the staged sequence posts → comments →
//! (individual reactions) → reaction summaries → page metrics, fetching from
//! the remote API, reconciling against stored natural keys, enriching
//! comment text with a sentiment label and bulk-inserting the result.
//!
//! # Failure containment
//!
//! Failures local to one remote entity (one post's comments, one metric
//! name) are logged into the per-stage statistics and never abort sibling
//! iterations. Only a missing account and storage-layer failures are fatal;
//! a failed bulk insert aborts its stage while later stages still run.

pub mod engine;
mod error;
mod types;

pub use engine::{start_of_utc_day, SyncEngine};
pub use error::SyncError;
pub use types::{
    AccountSyncResult, CancelFlag, ClassifiedComment, StageStats, SyncOptions, SyncReport,
    SyncStage, COMMENT_FIELDS, DEFAULT_ACCOUNT_CONCURRENCY, DEFAULT_PAGE_METRICS,
    DEFAULT_POST_CONCURRENCY, INITIAL_BACKOFF_MS, MAX_BACKOFF_MS, MAX_FETCH_RETRIES, POST_FIELDS,
    REACTION_FIELDS,
};
