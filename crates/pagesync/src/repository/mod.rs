//! Persistence operations over the pagesync schema.
//!
//! Thin, per-entity query and bulk-insert helpers. Reconciliation consumes
//! the `existing_*` key-set queries; the sync engine consumes the
//! `insert_many` bulk writes. Empty inputs never touch the database.

pub mod accounts;
pub mod comments;
mod errors;
pub mod insights;
pub mod posts;
pub mod reactions;

pub use accounts::AccountContext;
pub use errors::{RepositoryError, Result};
pub use posts::PostRef;
