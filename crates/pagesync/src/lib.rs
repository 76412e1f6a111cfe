//! Pagesync - incremental synchronization of social page activity.
//!
//! This library ingests posts, comments, reactions and page-level metrics
//! from a paginated Graph-style API, reconciles them against previously
//! stored records by natural key, enriches comment text with a sentiment
//! label, and persists the result for later querying.
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use pagesync::{connect_and_migrate, GraphClient, SyncEngine, SyncOptions};
//! use pagesync::http::reqwest_transport::ReqwestTransport;
//! use pagesync::sentiment::{HfInferenceModel, SentimentClassifier};
//!
//! let db = Arc::new(connect_and_migrate("sqlite://pagesync.db?mode=rwc").await?);
//! let transport = Arc::new(ReqwestTransport::with_timeout(timeout)?);
//! let graph = GraphClient::new(Arc::clone(&transport) as _);
//! let classifier = Arc::new(SentimentClassifier::new(primary, secondary));
//! let engine = SyncEngine::new(db, graph, classifier, SyncOptions::default());
//!
//! let report = engine.sync(account_id).await?;
//! println!("inserted {} rows", report.total_inserted());
//! ```

pub mod db;
pub mod entity;
pub mod graph;
pub mod http;
pub mod metrics;
pub mod migration;
pub mod reconcile;
pub mod repository;
pub mod retry;
pub mod sentiment;
pub mod sync;

pub use db::{connect, connect_and_migrate};
pub use entity::prelude::*;
pub use graph::{GraphClient, GraphError};
pub use repository::RepositoryError;
pub use sentiment::{
    Classification, HfInferenceModel, SentimentClassifier, SentimentError, SentimentModel,
    SentimentThresholds,
};
pub use sync::{
    AccountSyncResult, CancelFlag, StageStats, SyncEngine, SyncError, SyncOptions, SyncReport,
    SyncStage,
};
