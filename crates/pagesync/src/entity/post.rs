//! Post entity - one remote post stored under a local page.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Post model.
///
/// Immutable once stored: reconciliation only ever inserts posts whose
/// `remote_post_id` is not yet known for the page; there is no update path.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "posts")]
pub struct Model {
    /// Internal UUID primary key.
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    /// Owning page.
    pub page_id: Uuid,

    /// Remote post identifier (natural key, unique within a page).
    pub remote_post_id: String,

    /// Post text, absent for e.g. pure photo posts.
    #[sea_orm(column_type = "Text", nullable)]
    pub message: Option<String>,

    /// When the post was created on the platform.
    pub created_time: DateTimeWithTimeZone,

    /// When this record was ingested.
    pub synced_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// A post belongs to a page.
    #[sea_orm(
        belongs_to = "super::page::Entity",
        from = "Column::PageId",
        to = "super::page::Column::Id"
    )]
    Page,
}

impl Related<super::page::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Page.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
