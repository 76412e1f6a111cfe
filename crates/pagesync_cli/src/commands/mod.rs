//! CLI command handlers.

pub mod account;
pub mod migrate;
pub mod query;
pub mod sync;

use std::sync::Arc;
use std::time::Duration;

use pagesync::http::reqwest_transport::ReqwestTransport;
use pagesync::http::HttpTransport;
use pagesync::sentiment::{HfInferenceModel, SentimentClassifier, SentimentThresholds};
use pagesync::{connect_and_migrate, GraphClient, SyncEngine, SyncOptions};

use crate::config::Config;

/// Wire up a sync engine from configuration: database pool, Graph client
/// and the two-stage sentiment classifier, all sharing one HTTP transport.
pub(crate) async fn build_engine(
    config: &Config,
    database_url: &str,
    options: SyncOptions,
) -> Result<SyncEngine, Box<dyn std::error::Error>> {
    let db = Arc::new(connect_and_migrate(database_url).await?);

    let transport: Arc<dyn HttpTransport> = Arc::new(ReqwestTransport::with_timeout(
        Duration::from_secs(config.graph.timeout_secs),
    )?);

    let mut graph = GraphClient::new(Arc::clone(&transport));
    if let Some(base_url) = &config.graph.base_url {
        graph = graph.with_base_url(base_url);
    }
    if let Some(version) = &config.graph.version {
        graph = graph.with_version(version);
    }

    let mut primary =
        HfInferenceModel::new(Arc::clone(&transport), config.sentiment.primary_model.clone());
    let mut secondary = HfInferenceModel::new(
        Arc::clone(&transport),
        config.sentiment.secondary_model.clone(),
    );
    if let Some(token) = &config.sentiment.hf_token {
        primary = primary.with_api_token(token);
        secondary = secondary.with_api_token(token);
    }

    let classifier = Arc::new(
        SentimentClassifier::new(Arc::new(primary), Arc::new(secondary)).with_thresholds(
            SentimentThresholds {
                low_confidence: config.sentiment.low_confidence,
                divergence: config.sentiment.divergence,
            },
        ),
    );

    Ok(SyncEngine::new(db, graph, classifier, options))
}
