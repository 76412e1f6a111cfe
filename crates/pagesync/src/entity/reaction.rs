//! Reaction entity - one user's reaction on a post.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Reaction model.
///
/// Deduplicated by (user_remote_id, reaction_type) within a post, and
/// append-only: a user who changes reaction type is recorded as an
/// additional row, not an update.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "reactions")]
pub struct Model {
    /// Internal UUID primary key.
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    /// Owning post.
    pub post_id: Uuid,

    /// Remote identifier of the reacting user.
    pub user_remote_id: String,

    /// Display name of the reacting user.
    pub user_name: Option<String>,

    /// Reaction type as reported by the API (like, love, haha, ...).
    pub reaction_type: String,

    /// Profile type of the reacting entity, when the API exposes it.
    pub profile_type: Option<String>,

    /// When the reaction was first observed locally.
    pub created_time: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// A reaction belongs to a post.
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
