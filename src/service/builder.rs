//! Builder for configuring [`AnalysisService`] instances.

use std::sync::Arc;

use super::AnalysisService;
use crate::providers::{GenerateProvider, RetryConfig, RetryingGenerateProvider};
use crate::types::GenerateOptions;
use crate::{MarketscopeError, Result};

/// Builder for [`AnalysisService`].
///
/// ```rust,no_run
/// # use std::sync::Arc;
/// # use marketscope::{AnalysisService, OpenAiClient, RetryConfig};
/// # fn main() -> marketscope::Result<()> {
/// let service = AnalysisService::builder()
///     .provider(Arc::new(OpenAiClient::new("sk-your-key")?))
///     .model("gpt-3.5-turbo")
///     .retry(RetryConfig::new().max_retries(1))
///     .build()?;
/// # Ok(())
/// # }
/// ```
pub struct AnalysisServiceBuilder {
    provider: Option<Arc<dyn GenerateProvider>>,
    options: GenerateOptions,
    retry: RetryConfig,
}

impl Default for AnalysisServiceBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl AnalysisServiceBuilder {
    pub fn new() -> Self {
        Self {
            provider: None,
            options: GenerateOptions::default(),
            retry: RetryConfig::default(),
        }
    }

    /// Generation backend. Wrapped in the retry policy at build time.
    pub fn provider(mut self, provider: Arc<dyn GenerateProvider>) -> Self {
        self.provider = Some(provider);
        self
    }

    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.options.model = model.into();
        self
    }

    pub fn temperature(mut self, temperature: f32) -> Self {
        self.options.temperature = temperature;
        self
    }

    pub fn max_tokens(mut self, max_tokens: u32) -> Self {
        self.options.max_tokens = max_tokens;
        self
    }

    /// Replace all generation options at once.
    pub fn options(mut self, options: GenerateOptions) -> Self {
        self.options = options;
        self
    }

    pub fn retry(mut self, config: RetryConfig) -> Self {
        self.retry = config;
        self
    }

    /// Build the service.
    ///
    /// Fails with [`MarketscopeError::Configuration`] when no provider was
    /// set or the generation options are out of range.
    pub fn build(self) -> Result<AnalysisService> {
        let inner = self.provider.ok_or_else(|| {
            MarketscopeError::Configuration("no generation provider configured".to_string())
        })?;
        if self.options.model.is_empty() {
            return Err(MarketscopeError::Configuration(
                "model identifier must not be empty".to_string(),
            ));
        }
        if !(0.0..=2.0).contains(&self.options.temperature) {
            return Err(MarketscopeError::Configuration(format!(
                "temperature {} is outside 0.0..=2.0",
                self.options.temperature
            )));
        }
        if self.options.max_tokens == 0 {
            return Err(MarketscopeError::Configuration(
                "max_tokens must be positive".to_string(),
            ));
        }

        Ok(AnalysisService {
            provider: Arc::new(RetryingGenerateProvider::new(inner, self.retry)),
            options: self.options,
        })
    }
}
