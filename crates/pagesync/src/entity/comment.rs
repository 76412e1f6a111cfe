//! Comment entity - one remote comment with its sentiment label.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::entity::sentiment_label::SentimentLabel;

/// Comment model.
///
/// The sentiment label is computed once at ingestion time and never
/// recomputed.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "comments")]
pub struct Model {
    /// Internal UUID primary key.
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    /// Owning post.
    pub post_id: Uuid,

    /// Remote comment identifier (natural key, unique within a post).
    pub remote_comment_id: String,

    /// Remote identifier of the comment author, when the API exposes it.
    pub author_remote_id: Option<String>,

    /// Display name of the comment author.
    pub author_name: Option<String>,

    /// Comment text.
    #[sea_orm(column_type = "Text", nullable)]
    pub message: Option<String>,

    /// When the comment was created on the platform.
    pub created_time: DateTimeWithTimeZone,

    /// Sentiment category assigned at ingestion.
    pub sentiment: SentimentLabel,

    /// When this record was ingested.
    pub synced_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// A comment belongs to a post.
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
