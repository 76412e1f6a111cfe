//! Shared retry utilities for remote operations.
//!
//! The Graph client itself never retries; the sync engine wraps selected
//! per-item fetches with this bounded backoff so a blip on one post's
//! comment fetch does not immediately surface as a stage error.

use std::future::Future;
use std::time::Duration;

use backon::{ExponentialBuilder, Retryable};

use crate::sync::{INITIAL_BACKOFF_MS, MAX_BACKOFF_MS, MAX_FETCH_RETRIES};

/// Configuration for retry operations.
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Minimum delay between retries.
    pub min_delay: Duration,
    /// Maximum delay between retries.
    pub max_delay: Duration,
    /// Maximum number of retry attempts.
    pub max_retries: usize,
    /// Whether to add jitter to delays.
    pub with_jitter: bool,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            min_delay: Duration::from_millis(INITIAL_BACKOFF_MS),
            max_delay: Duration::from_millis(MAX_BACKOFF_MS),
            max_retries: MAX_FETCH_RETRIES as usize,
            with_jitter: true,
        }
    }
}

impl RetryConfig {
    /// Build an exponential backoff strategy from this configuration.
    #[must_use]
    pub fn into_backoff(self) -> ExponentialBuilder {
        let mut builder = ExponentialBuilder::default()
            .with_min_delay(self.min_delay)
            .with_max_delay(self.max_delay)
            .with_max_times(self.max_retries);

        if self.with_jitter {
            builder = builder.with_jitter();
        }

        builder
    }
}

/// The standard backoff strategy for remote fetches.
#[must_use]
pub fn default_backoff() -> ExponentialBuilder {
    RetryConfig::default().into_backoff()
}

/// Execute an operation, retrying errors accepted by `should_retry` with
/// exponential backoff and jitter. Each retry is logged at debug level with
/// the given context string.
pub async fn with_retry<T, E, F, Fut, P>(
    operation: F,
    should_retry: P,
    context: &str,
) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    P: FnMut(&E) -> bool,
    E: std::fmt::Display,
{
    operation
        .retry(default_backoff())
        .when(should_retry)
        .notify(|err, dur| {
            tracing::debug!(
                context,
                delay_ms = dur.as_millis() as u64,
                error = %err,
                "retrying transient failure"
            );
        })
        .await
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    #[derive(Debug)]
    struct TestError {
        message: &'static str,
        transient: bool,
    }

    impl std::fmt::Display for TestError {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            write!(f, "{}", self.message)
        }
    }

    #[test]
    fn retry_config_default_matches_constants() {
        let config = RetryConfig::default();
        assert_eq!(config.min_delay, Duration::from_millis(INITIAL_BACKOFF_MS));
        assert_eq!(config.max_delay, Duration::from_millis(MAX_BACKOFF_MS));
        assert_eq!(config.max_retries, MAX_FETCH_RETRIES as usize);
        assert!(config.with_jitter);
    }

    #[tokio::test(start_paused = true)]
    async fn with_retry_retries_transient_errors_until_success() {
        let calls = Arc::new(AtomicU32::new(0));
        let calls_capture = Arc::clone(&calls);

        let operation = move || {
            let calls_capture = Arc::clone(&calls_capture);
            async move {
                let n = calls_capture.fetch_add(1, Ordering::SeqCst);
                if n < 2 {
                    Err(TestError {
                        message: "timeout",
                        transient: true,
                    })
                } else {
                    Ok(7u32)
                }
            }
        };

        let advancer = tokio::spawn(async {
            for _ in 0..30 {
                tokio::time::advance(Duration::from_secs(60)).await;
                tokio::task::yield_now().await;
            }
        });

        let result = with_retry(operation, |e: &TestError| e.transient, "test").await;
        advancer.await.expect("advancer task");

        assert_eq!(result.unwrap(), 7);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn with_retry_does_not_retry_permanent_errors() {
        let calls = Arc::new(AtomicU32::new(0));
        let calls_capture = Arc::clone(&calls);

        let operation = move || {
            let calls_capture = Arc::clone(&calls_capture);
            async move {
                calls_capture.fetch_add(1, Ordering::SeqCst);
                Err::<(), _>(TestError {
                    message: "bad token",
                    transient: false,
                })
            }
        };

        let err = with_retry(operation, |e: &TestError| e.transient, "test")
            .await
            .expect_err("expected error");
        assert_eq!(err.to_string(), "bad token");
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
