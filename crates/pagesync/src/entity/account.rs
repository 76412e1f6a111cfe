//! Account entity - one syncable tenant holding an API access credential.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Account model - the access credential under which remote calls are made.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "accounts")]
pub struct Model {
    /// Internal UUID primary key.
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    /// API access credential, passed as a query parameter on remote calls.
    #[sea_orm(column_type = "Text")]
    pub access_token: String,

    /// When this account was registered locally.
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// An account owns its synced pages.
    #[sea_orm(has_many = "super::page::Entity")]
    Page,
}

impl Related<super::page::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Page.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
