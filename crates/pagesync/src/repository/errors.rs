use sea_orm::DbErr;
use thiserror::Error;

/// Errors from the persistence layer.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Underlying database error.
    #[error("database error: {0}")]
    Database(#[from] DbErr),
}

/// Result type for repository operations.
pub type Result<T> = std::result::Result<T, RepositoryError>;
