//! Sentiment label enum stored on classified comments.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Sentiment category assigned to a comment at ingestion time.
///
/// `Error` is the sentinel recorded when classification itself failed; it is
/// a stored value, not a transient condition, so that one unclassifiable
/// comment never blocks ingestion of the rest.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
pub enum SentimentLabel {
    #[sea_orm(string_value = "positive")]
    Positive,
    #[sea_orm(string_value = "negative")]
    Negative,
    #[sea_orm(string_value = "neutral")]
    #[default]
    Neutral,
    #[sea_orm(string_value = "error")]
    Error,
}

impl std::fmt::Display for SentimentLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SentimentLabel::Positive => write!(f, "positive"),
            SentimentLabel::Negative => write!(f, "negative"),
            SentimentLabel::Neutral => write!(f, "neutral"),
            SentimentLabel::Error => write!(f, "error"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_neutral() {
        assert_eq!(SentimentLabel::default(), SentimentLabel::Neutral);
    }

    #[test]
    fn display_outputs_expected_strings() {
        assert_eq!(SentimentLabel::Positive.to_string(), "positive");
        assert_eq!(SentimentLabel::Negative.to_string(), "negative");
        assert_eq!(SentimentLabel::Neutral.to_string(), "neutral");
        assert_eq!(SentimentLabel::Error.to_string(), "error");
    }
}
