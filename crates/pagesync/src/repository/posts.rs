//! Post persistence: natural-key sets, bulk inserts and ordered listings.

use std::collections::HashSet;

use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, QuerySelect,
};
use uuid::Uuid;

use crate::entity::post::{ActiveModel, Column, Entity as Post, Model};

use super::errors::Result;

/// Local id plus remote natural key of one stored post; the per-post fetch
/// loops (comments, reactions) iterate over these.
#[derive(Debug, Clone)]
pub struct PostRef {
    pub id: Uuid,
    pub remote_post_id: String,
}

/// All remote post ids already stored for a page.
pub async fn existing_remote_ids(
    db: &DatabaseConnection,
    page_id: Uuid,
) -> Result<HashSet<String>> {
    let ids: Vec<String> = Post::find()
        .filter(Column::PageId.eq(page_id))
        .select_only()
        .column(Column::RemotePostId)
        .into_tuple()
        .all(db)
        .await?;
    Ok(ids.into_iter().collect())
}

/// All stored posts of a page as (local id, remote id) references.
pub async fn post_refs(db: &DatabaseConnection, page_id: Uuid) -> Result<Vec<PostRef>> {
    let rows: Vec<(Uuid, String)> = Post::find()
        .filter(Column::PageId.eq(page_id))
        .select_only()
        .column(Column::Id)
        .column(Column::RemotePostId)
        .into_tuple()
        .all(db)
        .await?;
    Ok(rows
        .into_iter()
        .map(|(id, remote_post_id)| PostRef { id, remote_post_id })
        .collect())
}

/// Insert multiple posts in a single statement.
///
/// Returns the number of models inserted; an empty input is a no-op.
pub async fn insert_many(db: &DatabaseConnection, models: Vec<ActiveModel>) -> Result<u64> {
    if models.is_empty() {
        return Ok(0);
    }
    let count = models.len() as u64;
    Post::insert_many(models).exec(db).await?;
    Ok(count)
}

/// List a page's posts, newest first.
pub async fn list_by_page(db: &DatabaseConnection, page_id: Uuid) -> Result<Vec<Model>> {
    Ok(Post::find()
        .filter(Column::PageId.eq(page_id))
        .order_by_desc(Column::CreatedTime)
        .all(db)
        .await?)
}
