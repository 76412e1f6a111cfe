//! Insight entity - page-level metric time series.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Insight model.
///
/// Append-only time-series rows scoped by metric name, period and end time;
/// queried by name and optional "today" filter, ordered by end time
/// descending.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "insights")]
pub struct Model {
    /// Internal UUID primary key.
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    /// Owning page.
    pub page_id: Uuid,

    /// Metric name as reported by the API (page_fans, page_impressions, ...).
    pub metric_name: String,

    /// Aggregation period of the value (day, lifetime, ...).
    pub period: String,

    /// Metric value.
    pub value: i64,

    /// End of the aggregation window.
    pub end_time: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// An insight row belongs to a page.
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
