//! Flattening of nested insight responses into storable rows.
//!
//! The API reports metrics as `{name, period, values: [{value, end_time}]}`.
//! Page metrics carry one numeric value per day; the per-post reaction
//! insight carries a single `{reaction_type: count}` object.

use chrono::{DateTime, FixedOffset, Utc};

use crate::graph::parse_graph_time;
use crate::graph::types::MetricSeries;

/// Metric name of the per-post lifetime reaction counts insight.
pub const REACTIONS_BY_TYPE_METRIC: &str = "post_reactions_by_type_total";

/// One flattened page-metric observation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InsightRow {
    pub name: String,
    pub period: String,
    pub value: i64,
    pub end_time: DateTime<FixedOffset>,
}

/// One flattened per-type reaction count.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReactionCount {
    pub reaction_type: String,
    pub count: i64,
    pub collected_at: DateTime<FixedOffset>,
}

/// Flatten page-metric series into one row per value/end-time pair.
///
/// Pairs missing either the value or a parseable end time are skipped, as
/// are series without a name or period.
#[must_use]
pub fn flatten_metric_series(series: &[MetricSeries]) -> Vec<InsightRow> {
    let mut rows = Vec::new();

    for metric in series {
        let (Some(name), Some(period)) = (metric.name.as_deref(), metric.period.as_deref()) else {
            continue;
        };

        for entry in &metric.values {
            let Some(value) = entry.value.as_ref().and_then(|v| v.as_i64()) else {
                continue;
            };
            let Some(end_time) = entry.end_time.as_deref().and_then(parse_graph_time) else {
                continue;
            };

            rows.push(InsightRow {
                name: name.to_string(),
                period: period.to_string(),
                value,
                end_time,
            });
        }
    }

    rows
}

/// Flatten the per-post reaction insight into one row per reaction type.
///
/// Only series named [`REACTIONS_BY_TYPE_METRIC`] contribute. The first
/// value entry's object map is expanded; all rows of one series share a
/// single `collected_at` taken from the value's end time, falling back to
/// `now` when absent.
#[must_use]
pub fn flatten_reaction_totals(series: &[MetricSeries], now: DateTime<Utc>) -> Vec<ReactionCount> {
    let mut rows = Vec::new();

    for metric in series {
        if metric.name.as_deref() != Some(REACTIONS_BY_TYPE_METRIC) {
            continue;
        }
        let Some(entry) = metric.values.first() else {
            continue;
        };

        let collected_at = entry
            .end_time
            .as_deref()
            .and_then(parse_graph_time)
            .unwrap_or_else(|| now.fixed_offset());

        let Some(counts) = entry.value.as_ref().and_then(|v| v.as_object()) else {
            continue;
        };

        for (reaction_type, count) in counts {
            let Some(count) = count.as_i64() else {
                continue;
            };
            rows.push(ReactionCount {
                reaction_type: reaction_type.clone(),
                count,
                collected_at,
            });
        }
    }

    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::types::MetricValue;
    use serde_json::json;

    fn series(name: &str, period: &str, values: Vec<MetricValue>) -> MetricSeries {
        MetricSeries {
            name: Some(name.to_string()),
            period: Some(period.to_string()),
            values,
        }
    }

    fn value(raw: serde_json::Value, end_time: Option<&str>) -> MetricValue {
        MetricValue {
            value: Some(raw),
            end_time: end_time.map(String::from),
        }
    }

    #[test]
    fn skips_entries_with_null_value() {
        let input = vec![series(
            "page_fans",
            "day",
            vec![
                value(json!(100), Some("2024-01-01T08:00:00+0000")),
                MetricValue {
                    value: None,
                    end_time: Some("2024-01-02T08:00:00+0000".to_string()),
                },
            ],
        )];

        let rows = flatten_metric_series(&input);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].name, "page_fans");
        assert_eq!(rows[0].value, 100);
    }

    #[test]
    fn skips_entries_with_missing_or_invalid_end_time() {
        let input = vec![series(
            "page_impressions",
            "day",
            vec![
                value(json!(5), None),
                value(json!(6), Some("garbage")),
                value(json!(7), Some("2024-01-03T08:00:00+0000")),
            ],
        )];

        let rows = flatten_metric_series(&input);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].value, 7);
    }

    #[test]
    fn skips_non_numeric_values() {
        let input = vec![series(
            "page_fans",
            "day",
            vec![value(json!({"like": 2}), Some("2024-01-01T08:00:00+0000"))],
        )];
        assert!(flatten_metric_series(&input).is_empty());
    }

    #[test]
    fn skips_series_without_name_or_period() {
        let input = vec![MetricSeries {
            name: None,
            period: Some("day".to_string()),
            values: vec![value(json!(1), Some("2024-01-01T08:00:00+0000"))],
        }];
        assert!(flatten_metric_series(&input).is_empty());
    }

    #[test]
    fn reaction_totals_expand_to_one_row_per_type() {
        let now = Utc::now();
        let input = vec![series(
            REACTIONS_BY_TYPE_METRIC,
            "lifetime",
            vec![value(
                json!({"like": 3, "love": 1}),
                Some("2024-01-05T08:00:00+0000"),
            )],
        )];

        let mut rows = flatten_reaction_totals(&input, now);
        rows.sort_by(|a, b| a.reaction_type.cmp(&b.reaction_type));
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].reaction_type, "like");
        assert_eq!(rows[0].count, 3);
        assert_eq!(rows[1].reaction_type, "love");
        assert_eq!(rows[1].count, 1);
        assert_eq!(rows[0].collected_at, rows[1].collected_at);
        assert_eq!(
            rows[0].collected_at.to_rfc3339(),
            "2024-01-05T08:00:00+00:00"
        );
    }

    #[test]
    fn reaction_totals_fall_back_to_now_when_end_time_absent() {
        let now = Utc::now();
        let input = vec![series(
            REACTIONS_BY_TYPE_METRIC,
            "lifetime",
            vec![value(json!({"like": 2}), None)],
        )];

        let rows = flatten_reaction_totals(&input, now);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].collected_at, now.fixed_offset());
    }

    #[test]
    fn reaction_totals_ignore_other_series_and_empty_values() {
        let now = Utc::now();
        let input = vec![
            series("post_impressions", "lifetime", vec![value(json!(9), None)]),
            series(REACTIONS_BY_TYPE_METRIC, "lifetime", Vec::new()),
        ];
        assert!(flatten_reaction_totals(&input, now).is_empty());
    }
}
