//! Page entity - maps a local page id to its remote page identifier.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Page model - one remote page tracked under a local account.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "pages")]
pub struct Model {
    /// Internal UUID primary key.
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    /// Owning account.
    pub account_id: Uuid,

    /// Remote page identifier used in API paths (unique per account).
    pub remote_page_id: String,

    /// When this page mapping was registered locally.
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// A page belongs to an account.
    #[sea_orm(
        belongs_to = "super::account::Entity",
        from = "Column::AccountId",
        to = "super::account::Column::Id"
    )]
    Account,
    /// A page owns its synced posts.
    #[sea_orm(has_many = "super::post::Entity")]
    Post,
}

impl Related<super::account::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Account.def()
    }
}

impl Related<super::post::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Post.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
