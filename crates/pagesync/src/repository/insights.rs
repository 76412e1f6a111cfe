//! Insight persistence: appends and metric queries.

use chrono::{DateTime, Utc};
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
};
use uuid::Uuid;

use crate::entity::insight::{ActiveModel, Column, Entity as Insight, Model};

use super::errors::Result;

/// Insert multiple insight rows in a single statement.
pub async fn insert_many(db: &DatabaseConnection, models: Vec<ActiveModel>) -> Result<u64> {
    if models.is_empty() {
        return Ok(0);
    }
    let count = models.len() as u64;
    Insight::insert_many(models).exec(db).await?;
    Ok(count)
}

/// Fetch one metric's time series for a page, ordered by end time
/// descending, optionally restricted to rows at or after `since`.
pub async fn find_by_metric(
    db: &DatabaseConnection,
    page_id: Uuid,
    metric_name: &str,
    since: Option<DateTime<Utc>>,
) -> Result<Vec<Model>> {
    let mut query = Insight::find()
        .filter(Column::PageId.eq(page_id))
        .filter(Column::MetricName.eq(metric_name));

    if let Some(since) = since {
        query = query.filter(Column::EndTime.gte(since.fixed_offset()));
    }

    Ok(query.order_by_desc(Column::EndTime).all(db).await?)
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
    }

    #[tokio::test]
    async fn insert_many_returns_model_count() {
        let db = MockDatabase::new(DatabaseBackend::Sqlite)
            .append_exec_results([MockExecResult {
                rows_affected: 1,
                last_insert_id: 0,
            }])
            .into_connection();

        let model = ActiveModel {
            id: Set(Uuid::new_v4()),
            page_id: Set(Uuid::new_v4()),
            metric_name: Set("page_fans".to_string()),
            period: Set("day".to_string()),
            value: Set(120),
            end_time: Set(Utc::now().fixed_offset()),
        };
        assert_eq!(insert_many(&db, vec![model]).await.unwrap(), 1);
    }
}
