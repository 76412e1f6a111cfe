//! ReactionSummary entity - per-type reaction counts snapshotted per sync run.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// ReactionSummary model.
///
/// Append-only snapshot rows: each sync run appends a fresh set of per-type
/// counts per post, there is no natural-key deduplication.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "reaction_summaries")]
pub struct Model {
    /// Internal UUID primary key.
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    /// Owning post.
    pub post_id: Uuid,

    /// Reaction type (like, love, haha, ...).
    pub reaction_type: String,

    /// Lifetime count for this reaction type at collection time.
    pub reaction_count: i64,

    /// Snapshot timestamp shared by all rows of one collection.
    pub collected_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// A summary row belongs to a post.
    #[sea_orm(
        belongs_to = "super::post::Entity",
        from = "Column::PostId",
        to = "super::post::Column::Id"
    )]
    Post,
}

impl Related<super::post::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Post.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
