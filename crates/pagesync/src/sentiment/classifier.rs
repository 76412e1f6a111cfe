//! Two-stage sentiment classification with a confidence-gated fallback.

use std::sync::Arc;

use crate::entity::sentiment_label::SentimentLabel;

use super::model::{SentimentError, SentimentModel};

/// Thresholds steering the two-stage fallback.
#[derive(Debug, Clone, Copy)]
pub struct SentimentThresholds {
    /// Primary confidence below which the secondary model is consulted
    /// (strict `<`).
    pub low_confidence: f64,
    /// Score divergence above which the models are considered to disagree
    /// and the label is forced to neutral (strict `>`).
    pub divergence: f64,
}

impl Default for SentimentThresholds {
    fn default() -> Self {
        Self {
            low_confidence: 0.7,
            divergence: 0.2,
        }
    }
}

/// A classification outcome: one of positive/negative/neutral plus the
/// primary model's confidence.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Classification {
    pub label: SentimentLabel,
    pub confidence: f64,
}

/// Classifier combining a primary scorer with a secondary cross-check.
///
/// When the primary is confident its label wins outright and the secondary
/// is never invoked. When it is not, the secondary scores the same text and
/// a large score divergence forces `neutral`: disagreement is recorded, not
/// resolved by picking either model.
pub struct SentimentClassifier {
    primary: Arc<dyn SentimentModel>,
    secondary: Arc<dyn SentimentModel>,
    thresholds: SentimentThresholds,
}

impl SentimentClassifier {
    pub fn new(primary: Arc<dyn SentimentModel>, secondary: Arc<dyn SentimentModel>) -> Self {
        Self {
            primary,
            secondary,
            thresholds: SentimentThresholds::default(),
        }
    }

    #[must_use]
    pub fn with_thresholds(mut self, thresholds: SentimentThresholds) -> Self {
        self.thresholds = thresholds;
        self
    }

    /// Classify `text`.
    ///
    /// Empty or whitespace-only text short-circuits to `(neutral, 0.0)`
    /// without invoking either model. A model failure propagates; callers in
    /// the sync path catch it per item and record the `error` sentinel.
    pub async fn classify(&self, text: &str) -> Result<Classification, SentimentError> {
        if text.trim().is_empty() {
            return Ok(Classification {
                label: SentimentLabel::Neutral,
                confidence: 0.0,
            });
        }

        let primary = self.primary.score(text).await?;
        let mut label = normalize_label(&primary.label);

        if primary.score < self.thresholds.low_confidence {
            let secondary = self.secondary.score(text).await?;
            if (secondary.score - primary.score).abs() > self.thresholds.divergence {
                label = SentimentLabel::Neutral;
            }
        }

        Ok(Classification {
            label,
            confidence: primary.score,
        })
    }
}

/// Map a raw model label onto the stored sentiment categories.
///
/// Handles both word labels (`POS`, `negative`, ...) and star-rating labels
/// (`1 star` .. `5 stars`): one or two stars read as negative, three as
/// neutral, four or five as positive. Anything unrecognized is neutral.
#[must_use]
pub fn normalize_label(raw: &str) -> SentimentLabel {
    let label = raw.trim().to_ascii_lowercase();

    if label.starts_with("pos") {
        return SentimentLabel::Positive;
    }
    if label.starts_with("neg") {
        return SentimentLabel::Negative;
    }
    if let Some(stars) = label.chars().next().and_then(|c| c.to_digit(10)) {
        return match stars {
            0..=2 => SentimentLabel::Negative,
            3 => SentimentLabel::Neutral,
            _ => SentimentLabel::Positive,
        };
    }

    SentimentLabel::Neutral
}
