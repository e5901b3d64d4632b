//! Provider trait for text generation backends.
//!
//! A provider performs exactly one outbound call per invocation. Retry and
//! timeout policy live in [`RetryingGenerateProvider`](super::RetryingGenerateProvider),
//! composed around a provider rather than inside it, so any backend (or a
//! test double) gets the same policy.

use async_trait::async_trait;

use crate::Result;
use crate::types::{GenerateOptions, GenerateResponse};

/// Provider for single-prompt text generation.
///
/// Failures must carry a structured classification (see
/// [`MarketscopeError::kind`](crate::MarketscopeError::kind)); quota and
/// auth failures are never retried.
#[async_trait]
pub trait GenerateProvider: Send + Sync {
    /// Provider name for logging/metrics.
    fn name(&self) -> &str;

    /// Generate text for a single user prompt.
    async fn generate(&self, prompt: &str, options: &GenerateOptions) -> Result<GenerateResponse>;
}
