//! Error taxonomy for sync runs.
//!
//! The fatal/non-fatal distinction is carried in the types: per-item remote
//! failures never become a `SyncError`, they are contained in
//! [`super::StageStats`]. Only account resolution and storage-layer failures
//! surface here.

use thiserror::Error;
use uuid::Uuid;

use crate::graph::GraphError;
use crate::repository::RepositoryError;

use super::types::SyncStage;

/// Fatal errors of a sync run or of the query surface.
#[derive(Debug, Error)]
pub enum SyncError {
    /// The account or its page mapping does not exist. Aborts the run
    /// before any stage executes.
    #[error("account not found: {account_id}")]
    AccountNotFound { account_id: Uuid },

    /// A storage-layer write or key-set read failed. The enclosing stage
    /// aborted; later stages still ran.
    #[error("persistence failure in {stage} stage: {source}")]
    Persistence {
        stage: SyncStage,
        #[source]
        source: RepositoryError,
    },

    /// A database error outside the staged pipeline (account resolution,
    /// query surface).
    #[error(transparent)]
    Database(#[from] RepositoryError),

    /// A remote API failure on the query surface (the staged pipeline
    /// contains these per item instead).
    #[error("remote API failure: {0}")]
    Remote(#[from] GraphError),
}

impl SyncError {
    /// Helper for tagging a repository error with its stage.
    pub(crate) fn persistence(stage: SyncStage, source: RepositoryError) -> Self {
        Self::Persistence { stage, source }
    }
}
