//! Types for the outbound text generation call.

use serde::{Deserialize, Serialize};

use super::Usage;

/// Model used when none is configured.
pub const DEFAULT_MODEL: &str = "gpt-3.5-turbo";

/// Sampling temperature used when none is configured.
pub const DEFAULT_TEMPERATURE: f32 = 0.5;

/// Output token ceiling used when none is configured.
pub const DEFAULT_MAX_TOKENS: u32 = 700;

/// Options for a single generation call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerateOptions {
    /// Model identifier sent to the provider.
    pub model: String,

    /// Sampling temperature (0.0 to 2.0).
    pub temperature: f32,

    /// Maximum number of tokens to generate.
    pub max_tokens: u32,
}

impl Default for GenerateOptions {
    fn default() -> Self {
        Self::new(DEFAULT_MODEL)
    }
}

impl GenerateOptions {
    /// Create options for the given model with default sampling settings.
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            temperature: DEFAULT_TEMPERATURE,
            max_tokens: DEFAULT_MAX_TOKENS,
        }
    }

    /// Set temperature.
    pub fn temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    /// Set max tokens.
    pub fn max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }
}

/// Result of a successful generation call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerateResponse {
    /// Generated text, untrimmed.
    pub text: String,
    /// Token usage, when the provider reports it.
    pub usage: Option<Usage>,
    /// Model that actually served the request, when reported.
    pub model: Option<String>,
}

impl GenerateResponse {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            usage: None,
            model: None,
        }
    }

    pub fn with_usage(mut self, usage: Usage) -> Self {
        self.usage = Some(usage);
        self
    }
}
