//! Sentiment enrichment for comment text.
//!
//! Classification runs a primary scoring model and, when the primary's
//! confidence is low, cross-checks with a secondary model; strong
//! disagreement between the two is treated as a signal in itself and forces
//! a neutral label rather than trusting either model.

mod classifier;
mod model;

pub use classifier::{normalize_label, Classification, SentimentClassifier, SentimentThresholds};
pub use model::{HfInferenceModel, ModelScore, SentimentError, SentimentModel, HF_BASE_URL};
