//! Retry/timeout policy and the provider decorator built on it.
//!
//! [`with_retry`] is a generic higher-order helper: it knows nothing about
//! providers and can wrap any fallible async operation.
//! [`RetryingGenerateProvider`] composes it around a [`GenerateProvider`].

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tracing::{error, warn};

use super::traits::GenerateProvider;
use crate::telemetry;
use crate::types::{GenerateOptions, GenerateResponse, millis};
use crate::{MarketscopeError, Result};

/// Configuration for retry behaviour on transient errors.
///
/// Every attempt races a timer of `attempt_timeout`; failed attempts are
/// followed by a fixed `retry_interval` pause, or by the provider's
/// `retry-after` hint capped at `max_retry_after`.
///
/// ```rust
/// # use marketscope::RetryConfig;
/// # use std::time::Duration;
/// let config = RetryConfig::new()
///     .max_retries(3)
///     .retry_interval(Duration::from_millis(250))
///     .attempt_timeout(Duration::from_secs(10));
/// assert_eq!(config.total_attempts(), 4);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryConfig {
    /// Additional attempts after the first failure. Default: 2.
    pub max_retries: u32,
    /// Pause between attempts. Default: 1s.
    pub retry_interval: Duration,
    /// Ceiling for a single attempt. Default: 8s.
    pub attempt_timeout: Duration,
    /// Longest pause a provider `retry-after` hint may impose. Default: 2s.
    pub max_retry_after: Duration,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 2,
            retry_interval: Duration::from_millis(1000),
            attempt_timeout: Duration::from_secs(8),
            max_retry_after: Duration::from_secs(2),
        }
    }
}

impl RetryConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Single attempt, default timeout.
    pub fn disabled() -> Self {
        Self {
            max_retries: 0,
            ..Self::default()
        }
    }

    pub fn max_retries(mut self, n: u32) -> Self {
        self.max_retries = n;
        self
    }

    pub fn retry_interval(mut self, interval: Duration) -> Self {
        self.retry_interval = interval;
        self
    }

    pub fn attempt_timeout(mut self, timeout: Duration) -> Self {
        self.attempt_timeout = timeout;
        self
    }

    pub fn max_retry_after(mut self, cap: Duration) -> Self {
        self.max_retry_after = cap;
        self
    }

    /// Attempts including the initial one.
    pub fn total_attempts(&self) -> u32 {
        self.max_retries.saturating_add(1)
    }

    /// Pause before the next attempt. A provider `retry_after` hint takes
    /// precedence over `retry_interval` but never exceeds `max_retry_after`.
    pub fn effective_delay(&self, retry_after: Option<Duration>) -> Duration {
        retry_after
            .map(|hint| hint.min(self.max_retry_after))
            .unwrap_or(self.retry_interval)
    }

    /// Upper bound on the wall-clock time of one call under this policy,
    /// `retry_after` hints included.
    pub fn worst_case(&self) -> Duration {
        let longest_pause = self.retry_interval.max(self.max_retry_after);
        self.attempt_timeout
            .saturating_mul(self.total_attempts())
            .saturating_add(longest_pause.saturating_mul(self.max_retries))
    }
}

/// Execute an async operation under the retry/timeout policy.
///
/// Each attempt is raced against `config.attempt_timeout`; an attempt that
/// loses the race fails with [`MarketscopeError::Timeout`] and its future
/// is dropped (any request it already sent is not recalled). Failures
/// whose kind is not retryable (quota, auth) are returned at once. When
/// every attempt fails, the last error is returned unchanged.
pub async fn with_retry<F, Fut, T>(config: &RetryConfig, operation: &str, f: F) -> Result<T>
where
    F: Fn() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let attempts = config.total_attempts();
    let mut attempt = 0;
    loop {
        attempt += 1;
        let err = match tokio::time::timeout(config.attempt_timeout, f()).await {
            Ok(Ok(value)) => return Ok(value),
            Ok(Err(e)) => e,
            Err(_) => MarketscopeError::Timeout {
                after: config.attempt_timeout,
            },
        };

        if !err.is_transient() {
            error!(
                operation,
                attempt,
                kind = ?err.kind(),
                error = %err,
                "non-retryable failure, not retrying"
            );
            return Err(err);
        }
        if attempt >= attempts {
            warn!(operation, attempts, error = %err, "all attempts failed");
            return Err(err);
        }

        metrics::counter!(telemetry::RETRIES_TOTAL, "operation" => operation.to_owned())
            .increment(1);
        let delay = config.effective_delay(err.retry_after());
        warn!(
            operation,
            attempt,
            max_attempts = attempts,
            delay_ms = millis(delay),
            error = %err,
            "retrying after transient error"
        );
        tokio::time::sleep(delay).await;
    }
}

/// Decorator that wraps a [`GenerateProvider`] with [`with_retry`].
pub struct RetryingGenerateProvider {
    inner: Arc<dyn GenerateProvider>,
    config: RetryConfig,
}

impl RetryingGenerateProvider {
    pub fn new(inner: Arc<dyn GenerateProvider>, config: RetryConfig) -> Self {
        Self { inner, config }
    }

    pub fn config(&self) -> &RetryConfig {
        &self.config
    }
}

#[async_trait]
impl GenerateProvider for RetryingGenerateProvider {
    fn name(&self) -> &str {
        self.inner.name()
    }

    async fn generate(&self, prompt: &str, options: &GenerateOptions) -> Result<GenerateResponse> {
        with_retry(&self.config, "generate", || {
            self.inner.generate(prompt, options)
        })
        .await
    }
}
