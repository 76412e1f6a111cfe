//! Reaction persistence: individual reactions and per-type summaries.

use std::collections::HashSet;

use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QuerySelect};
use uuid::Uuid;

use crate::entity::reaction::{self, Column, Entity as Reaction};
use crate::entity::reaction_summary::{self, Entity as ReactionSummary};

use super::errors::Result;

/// All (user_remote_id, reaction_type) pairs already stored for a post.
///
/// This is the dedup key for individual reactions; a user changing reaction
/// type produces a new pair, so the new reaction is appended rather than
/// replacing the old row.
pub async fn existing_type_keys(
    db: &DatabaseConnection,
    post_id: Uuid,
) -> Result<HashSet<(String, String)>> {
    let pairs: Vec<(String, String)> = Reaction::find()
        .filter(Column::PostId.eq(post_id))
        .select_only()
        .column(Column::UserRemoteId)
        .column(Column::ReactionType)
        .into_tuple()
        .all(db)
        .await?;
    Ok(pairs.into_iter().collect())
}

/// Insert multiple individual reactions in a single statement.
pub async fn insert_many(
    db: &DatabaseConnection,
    models: Vec<reaction::ActiveModel>,
) -> Result<u64> {
    if models.is_empty() {
        return Ok(0);
    }
    let count = models.len() as u64;
    Reaction::insert_many(models).exec(db).await?;
    Ok(count)
}

/// Insert multiple reaction summary snapshot rows in a single statement.
pub async fn insert_many_summaries(
    db: &DatabaseConnection,
    models: Vec<reaction_summary::ActiveModel>,
) -> Result<u64> {
    if models.is_empty() {
        return Ok(0);
    }
    let count = models.len() as u64;
    ReactionSummary::insert_many(models).exec(db).await?;
    Ok(count)
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult, Set};

    use super::*;

    #[tokio::test]
    async fn insert_many_returns_zero_for_empty_input() {
        let db = MockDatabase::new(DatabaseBackend::Sqlite).into_connection();
        assert_eq!(insert_many(&db, Vec::new()).await.unwrap(), 0);
        assert_eq!(insert_many_summaries(&db, Vec::new()).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn insert_many_summaries_returns_model_count() {
        let db = MockDatabase::new(DatabaseBackend::Sqlite)
            .append_exec_results([MockExecResult {
                rows_affected: 2,
                last_insert_id: 0,
            }])
            .into_connection();

        let post_id = Uuid::new_v4();
        let now = Utc::now().fixed_offset();
        let models = ["like", "love"]
            .iter()
            .map(|kind| reaction_summary::ActiveModel {
                id: Set(Uuid::new_v4()),
                post_id: Set(post_id),
                reaction_type: Set(kind.to_string()),
                reaction_count: Set(1),
                collected_at: Set(now),
            })
            .collect();

        let count = insert_many_summaries(&db, models)
            .await
            .expect("insert should succeed");
        assert_eq!(count, 2);
    }
}
