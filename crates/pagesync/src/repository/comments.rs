//! Comment persistence: per-post natural-key sets and bulk inserts.

use std::collections::HashSet;

use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, QuerySelect,
};
use uuid::Uuid;

use crate::entity::comment::{ActiveModel, Column, Entity as Comment, Model};

use super::errors::Result;

/// All remote comment ids already stored for a post.
pub async fn existing_remote_ids(
    db: &DatabaseConnection,
    post_id: Uuid,
) -> Result<HashSet<String>> {
    let ids: Vec<String> = Comment::find()
        .filter(Column::PostId.eq(post_id))
        .select_only()
        .column(Column::RemoteCommentId)
        .into_tuple()
        .all(db)
        .await?;
    Ok(ids.into_iter().collect())
}

/// Insert multiple comments in a single statement.
///
/// Returns the number of models inserted; an empty input is a no-op.
pub async fn insert_many(db: &DatabaseConnection, models: Vec<ActiveModel>) -> Result<u64> {
    if models.is_empty() {
        return Ok(0);
    }
    let count = models.len() as u64;
    Comment::insert_many(models).exec(db).await?;
    Ok(count)
}

/// List a post's comments, newest first.
pub async fn list_by_post(db: &DatabaseConnection, post_id: Uuid) -> Result<Vec<Model>> {
    Ok(Comment::find()
        .filter(Column::PostId.eq(post_id))
        .order_by_desc(Column::CreatedTime)
        .all(db)
        .await?)
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult, Set};

    use crate::entity::sentiment_label::SentimentLabel;

    use super::*;

    fn active_model(post_id: Uuid, remote_comment_id: &str) -> ActiveModel {
        let now = Utc::now().fixed_offset();
        ActiveModel {
            id: Set(Uuid::new_v4()),
            post_id: Set(post_id),
            remote_comment_id: Set(remote_comment_id.to_string()),
            author_remote_id: Set(None),
            author_name: Set(None),
            message: Set(Some("nice".to_string())),
            created_time: Set(now),
            sentiment: Set(SentimentLabel::Positive),
            synced_at: Set(now),
        }
    }

    #[tokio::test]
    async fn insert_many_returns_zero_for_empty_input() {
        let db = MockDatabase::new(DatabaseBackend::Sqlite).into_connection();
        let count = insert_many(&db, Vec::new()).await.expect("should succeed");
        assert_eq!(count, 0);
    }

    #[tokio::test]
    async fn insert_many_returns_model_count_for_non_empty_input() {
        let db = MockDatabase::new(DatabaseBackend::Sqlite)
            .append_exec_results([MockExecResult {
                rows_affected: 1,
                last_insert_id: 0,
            }])
            .into_connection();

        let count = insert_many(&db, vec![active_model(Uuid::new_v4(), "c1")])
            .await
            .expect("insert_many should succeed");
        assert_eq!(count, 1);
    }
}
