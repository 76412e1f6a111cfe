//! Scoring model boundary and the hosted-inference implementation.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use thiserror::Error;

use crate::http::{HttpError, HttpMethod, HttpRequest, HttpTransport};

/// Default Hugging Face inference API host.
pub const HF_BASE_URL: &str = "https://api-inference.huggingface.co";

/// Errors from a scoring model call.
#[derive(Debug, Error)]
pub enum SentimentError {
    /// The model endpoint rejected the request or returned a failure status.
    #[error("model error: {message}")]
    Model { message: String },

    /// Network or connection failure reaching the model.
    #[error("transport error: {message}")]
    Transport { message: String },

    /// The model response could not be decoded.
    #[error("decode error: {message}")]
    Decode { message: String },
}

impl From<HttpError> for SentimentError {
    fn from(err: HttpError) -> Self {
        SentimentError::Transport {
            message: err.to_string(),
        }
    }
}

/// A raw model prediction: the winning label and its score in [0, 1].
#[derive(Debug, Clone, PartialEq)]
pub struct ModelScore {
    pub label: String,
    pub score: f64,
}

/// Boundary for text sentiment scoring models.
#[async_trait]
pub trait SentimentModel: Send + Sync {
    async fn score(&self, text: &str) -> Result<ModelScore, SentimentError>;
}

#[derive(Debug, Deserialize)]
struct LabelScore {
    label: String,
    score: f64,
}

/// Sentiment scorer backed by the hosted Hugging Face inference API.
///
/// Sends `{"inputs": text}` to `/models/{model_id}` and picks the
/// top-scoring label from the prediction list.
pub struct HfInferenceModel {
    transport: Arc<dyn HttpTransport>,
    base_url: String,
    model_id: String,
    api_token: Option<String>,
}

impl HfInferenceModel {
    pub fn new(transport: Arc<dyn HttpTransport>, model_id: impl Into<String>) -> Self {
        Self {
            transport,
            base_url: HF_BASE_URL.to_string(),
            model_id: model_id.into(),
            api_token: None,
        }
    }

    /// Override the inference host (e.g. for a stub server).
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Authenticate requests with a bearer token.
    #[must_use]
    pub fn with_api_token(mut self, token: impl Into<String>) -> Self {
        self.api_token = Some(token.into());
        self
    }

    /// The model endpoint URL.
    #[must_use]
    pub fn endpoint_url(&self) -> String {
        format!("{}/models/{}", self.base_url, self.model_id)
    }
}

#[async_trait]
impl SentimentModel for HfInferenceModel {
    async fn score(&self, text: &str) -> Result<ModelScore, SentimentError> {
        let body = serde_json::json!({ "inputs": text });
        let mut headers = vec![(
            "Content-Type".to_string(),
            "application/json".to_string(),
        )];
        if let Some(token) = &self.api_token {
            headers.push(("Authorization".to_string(), format!("Bearer {token}")));
        }

        let request = HttpRequest {
            method: HttpMethod::Post,
            url: self.endpoint_url(),
            headers,
            body: serde_json::to_vec(&body).map_err(|e| SentimentError::Decode {
                message: e.to_string(),
            })?,
        };

        let response = self.transport.send(request).await?;
        if !response.is_success() {
            return Err(SentimentError::Model {
                message: format!(
                    "{} returned HTTP {}: {}",
                    self.model_id,
                    response.status,
                    String::from_utf8_lossy(&response.body)
                ),
            });
        }

        // Text-classification models answer with a nested prediction list:
        // [[{"label": "...", "score": 0.9}, ...]]. Some deployments flatten
        // the outer list.
        let predictions: Vec<LabelScore> =
            match serde_json::from_slice::<Vec<Vec<LabelScore>>>(&response.body) {
                Ok(mut nested) if !nested.is_empty() => nested.swap_remove(0),
                _ => serde_json::from_slice::<Vec<LabelScore>>(&response.body).map_err(|e| {
                    SentimentError::Decode {
                        message: format!("{}: {}", self.model_id, e),
                    }
                })?,
            };

        let top = predictions
            .into_iter()
            .max_by(|a, b| a.score.total_cmp(&b.score))
            .ok_or_else(|| SentimentError::Decode {
                message: format!("{}: empty prediction list", self.model_id),
            })?;

        Ok(ModelScore {
            label: top.label,
            score: top.score,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::{HttpResponse, MockTransport};

    fn model(transport: &MockTransport) -> HfInferenceModel {
        HfInferenceModel::new(Arc::new(transport.clone()), "org/test-model")
            .with_base_url("https://hf.test")
            .with_api_token("hf_token")
    }

    #[tokio::test]
    async fn picks_top_scoring_label_from_nested_predictions() {
        let transport = MockTransport::new();
        let model = model(&transport);
        transport.push_json(
            HttpMethod::Post,
            model.endpoint_url(),
            r#"[[{"label": "4 stars", "score": 0.2}, {"label": "5 stars", "score": 0.7}, {"label": "1 star", "score": 0.1}]]"#,
        );

        let score = model.score("great product").await.expect("scores");
        assert_eq!(score.label, "5 stars");
        assert!((score.score - 0.7).abs() < f64::EPSILON);

        let requests = transport.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].method, HttpMethod::Post);
        assert_eq!(
            crate::http::header_get(&requests[0].headers, "authorization"),
            Some("Bearer hf_token")
        );
        assert_eq!(requests[0].body, br#"{"inputs":"great product"}"#.to_vec());
    }

    #[tokio::test]
    async fn accepts_flat_prediction_lists() {
        let transport = MockTransport::new();
        let model = model(&transport);
        transport.push_json(
            HttpMethod::Post,
            model.endpoint_url(),
            r#"[{"label": "NEG", "score": 0.8}, {"label": "POS", "score": 0.2}]"#,
        );

        let score = model.score("awful").await.expect("scores");
        assert_eq!(score.label, "NEG");
    }

    #[tokio::test]
    async fn non_2xx_status_is_a_model_error() {
        let transport = MockTransport::new();
        let model = model(&transport);
        transport.push_response(
            HttpMethod::Post,
            model.endpoint_url(),
            HttpResponse {
                status: 503,
                headers: Vec::new(),
                body: br#"{"error": "model loading"}"#.to_vec(),
            },
        );

        let err = model.score("text").await.expect_err("503 should fail");
        assert!(matches!(err, SentimentError::Model { .. }));
    }

    #[tokio::test]
    async fn empty_prediction_list_is_a_decode_error() {
        let transport = MockTransport::new();
        let model = model(&transport);
        transport.push_json(HttpMethod::Post, model.endpoint_url(), "[[]]");

        let err = model.score("text").await.expect_err("empty should fail");
        assert!(matches!(err, SentimentError::Decode { .. }));
    }
}
