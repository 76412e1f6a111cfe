//! Configuration file support for pagesync.
//!
//! Configuration is loaded with the following precedence (highest to
//! lowest):
//! 1. CLI flags
//! 2. Environment variables (prefixed with `PAGESYNC_`, nested keys joined
//!    with `__`, e.g. `PAGESYNC_DATABASE__URL`)
//! 3. Config file (~/.config/pagesync/config.toml or ./pagesync.toml)
//! 4. Built-in defaults
//!
//! Example config file:
//! ```toml
//! [database]
//! url = "postgres://localhost/pagesync"
//!
//! [graph]
//! version = "v19.0"
//! timeout_secs = 30
//!
//! [sentiment]
//! primary_model = "finiteautomata/beto-sentiment-analysis"
//! secondary_model = "nlptown/bert-base-multilingual-uncased-sentiment"
//! hf_token = "hf_..."          # or PAGESYNC_SENTIMENT__HF_TOKEN
//! low_confidence = 0.7
//! divergence = 0.2
//!
//! [sync]
//! account_concurrency = 4
//! post_concurrency = 8
//! include_reactions = false
//! ```

use std::path::PathBuf;

use config::{Config as ConfigBuilder, Environment, File, FileFormat};
use directories::ProjectDirs;
use serde::Deserialize;

use pagesync::sync::{DEFAULT_ACCOUNT_CONCURRENCY, DEFAULT_POST_CONCURRENCY};

/// Top-level configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Database configuration.
    pub database: DatabaseConfig,
    /// Remote Graph API configuration.
    pub graph: GraphConfig,
    /// Sentiment classifier configuration.
    pub sentiment: SentimentConfig,
    /// Default sync options.
    pub sync: SyncConfig,
}

/// Database configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// Database connection URL. Supports sqlite:// and postgres:// schemes.
    /// Defaults to an SQLite file in the local data directory.
    pub url: Option<String>,
}

/// Remote Graph API configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct GraphConfig {
    /// API host override (default: the public Graph endpoint).
    pub base_url: Option<String>,
    /// API version segment override.
    pub version: Option<String>,
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            version: None,
            timeout_secs: 30,
        }
    }
}

/// Sentiment classifier configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct SentimentConfig {
    /// Primary scoring model id.
    pub primary_model: String,
    /// Secondary cross-check model id.
    pub secondary_model: String,
    /// Hugging Face inference API token.
    /// Can also be set via PAGESYNC_SENTIMENT__HF_TOKEN.
    pub hf_token: Option<String>,
    /// Primary confidence below which the secondary model is consulted.
    pub low_confidence: f64,
    /// Score divergence above which the label is forced to neutral.
    pub divergence: f64,
}

impl Default for SentimentConfig {
    fn default() -> Self {
        Self {
            primary_model: "finiteautomata/beto-sentiment-analysis".to_string(),
            secondary_model: "nlptown/bert-base-multilingual-uncased-sentiment".to_string(),
            hf_token: None,
            low_confidence: 0.7,
            divergence: 0.2,
        }
    }
}

/// Default sync options.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct SyncConfig {
    /// Maximum accounts synced concurrently.
    pub account_concurrency: usize,
    /// Per-post fetch workers within one account.
    pub post_concurrency: usize,
    /// Whether to sync individual reactions by default.
    pub include_reactions: bool,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            account_concurrency: DEFAULT_ACCOUNT_CONCURRENCY,
            post_concurrency: DEFAULT_POST_CONCURRENCY,
            include_reactions: false,
        }
    }
}

impl Config {
    /// Load configuration from file and environment.
    pub fn load() -> Result<Self, config::ConfigError> {
        let mut builder = ConfigBuilder::builder();

        if let Some(dirs) = ProjectDirs::from("", "", "pagesync") {
            let path = dirs.config_dir().join("config.toml");
            builder = builder.add_source(File::from(path).format(FileFormat::Toml).required(false));
        }
        builder = builder.add_source(File::new("pagesync.toml", FileFormat::Toml).required(false));
        builder = builder.add_source(Environment::with_prefix("PAGESYNC").separator("__"));

        builder.build()?.try_deserialize()
    }

    /// The effective database URL, defaulting to an SQLite file under the
    /// local data directory.
    pub fn database_url(&self) -> String {
        if let Some(url) = &self.database.url {
            return url.clone();
        }

        let data_dir = ProjectDirs::from("", "", "pagesync")
            .map(|dirs| dirs.data_local_dir().to_path_buf())
            .unwrap_or_else(|| PathBuf::from("."));
        let _ = std::fs::create_dir_all(&data_dir);
        format!(
            "sqlite://{}?mode=rwc",
            data_dir.join("pagesync.db").display()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let config = Config::default();
        assert!(config.database.url.is_none());
        assert_eq!(config.graph.timeout_secs, 30);
        assert_eq!(
            config.sentiment.primary_model,
            "finiteautomata/beto-sentiment-analysis"
        );
        assert_eq!(config.sentiment.low_confidence, 0.7);
        assert_eq!(config.sentiment.divergence, 0.2);
        assert_eq!(config.sync.account_concurrency, DEFAULT_ACCOUNT_CONCURRENCY);
        assert_eq!(config.sync.post_concurrency, DEFAULT_POST_CONCURRENCY);
        assert!(!config.sync.include_reactions);
    }

    #[test]
    fn explicit_database_url_wins() {
        let config = Config {
            database: DatabaseConfig {
                url: Some("postgres://db.example/pagesync".to_string()),
            },
            ..Config::default()
        };
        assert_eq!(config.database_url(), "postgres://db.example/pagesync");
    }
}
