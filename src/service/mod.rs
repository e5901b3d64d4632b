//! Request orchestration: prompt → retrying provider → envelope.
//!
//! [`AnalysisService`] holds no per-request state; concurrent requests
//! share it through an `Arc` and only read its configuration.

mod builder;

use std::sync::Arc;
use std::time::{Duration, Instant};

use tracing::{debug, error, info};

pub use builder::AnalysisServiceBuilder;

use crate::prompt;
use crate::providers::GenerateProvider;
use crate::telemetry;
use crate::types::{
    AnalysisRequest, BatchEnvelope, BatchItem, GenerateOptions, GenerateResponse, ResultEnvelope,
    millis,
};
use crate::{MarketscopeError, Result};

/// Turns validated requests into response envelopes.
pub struct AnalysisService {
    provider: Arc<dyn GenerateProvider>,
    options: GenerateOptions,
}

impl AnalysisService {
    /// Create a new builder for configuring the service.
    pub fn builder() -> AnalysisServiceBuilder {
        AnalysisServiceBuilder::new()
    }

    /// Model identifier sent with every generation call.
    pub fn model(&self) -> &str {
        &self.options.model
    }

    pub fn options(&self) -> &GenerateOptions {
        &self.options
    }

    /// Generate one analysis block and wrap the outcome in an envelope.
    pub async fn analyze(&self, request: &AnalysisRequest) -> ResultEnvelope {
        let prompt = prompt::resolve_prompt(request);
        debug!(
            analysis_type = %request.analysis_type,
            prompt_override = request.prompt.is_some(),
            prompt_chars = prompt.chars().count(),
            "prompt ready"
        );

        let started = Instant::now();
        let outcome = self.provider.generate(&prompt, &self.options).await;
        let elapsed = started.elapsed();
        self.record("analyze", &outcome, elapsed);

        match &outcome {
            Ok(_) => info!(
                analysis_type = %request.analysis_type,
                elapsed_ms = millis(elapsed),
                "analysis generated"
            ),
            Err(e) => error!(
                analysis_type = %request.analysis_type,
                elapsed_ms = millis(elapsed),
                error = %e,
                "analysis failed"
            ),
        }

        ResultEnvelope::build(request, outcome, self.model(), elapsed)
    }

    /// Answer several items with one combined prompt and split the text
    /// back into per-item sections.
    pub async fn analyze_batch(&self, items: &[BatchItem]) -> BatchEnvelope {
        if items.is_empty() {
            return BatchEnvelope::rejected(&MarketscopeError::Validation(
                "requests must not be empty".to_string(),
            ));
        }

        let prompt = prompt::build_combined_prompt(items);
        debug!(
            items = items.len(),
            prompt_chars = prompt.chars().count(),
            "combined prompt ready"
        );

        let started = Instant::now();
        let outcome = self.provider.generate(&prompt, &self.options).await;
        let elapsed = started.elapsed();
        self.record("analyze_batch", &outcome, elapsed);

        if let Err(e) = &outcome {
            error!(items = items.len(), error = %e, "batch analysis failed");
        }

        let outcome = outcome.map(|response| {
            let results = prompt::parse_combined_response(&response.text, items);
            (results, response)
        });
        BatchEnvelope::build(outcome, self.model(), elapsed)
    }

    fn record(&self, operation: &'static str, outcome: &Result<GenerateResponse>, elapsed: Duration) {
        let status = if outcome.is_ok() { "ok" } else { "error" };
        metrics::counter!(telemetry::REQUESTS_TOTAL,
            "operation" => operation,
            "status" => status,
        )
        .increment(1);
        metrics::histogram!(telemetry::REQUEST_DURATION_SECONDS, "operation" => operation)
            .record(elapsed.as_secs_f64());

        if let Ok(GenerateResponse {
            usage: Some(usage), ..
        }) = outcome
        {
            metrics::counter!(telemetry::TOKENS_TOTAL, "direction" => "prompt")
                .increment(u64::from(usage.prompt_tokens));
            metrics::counter!(telemetry::TOKENS_TOTAL, "direction" => "completion")
                .increment(u64::from(usage.completion_tokens));
        }
    }
}

impl std::fmt::Debug for AnalysisService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnalysisService")
            .field("provider", &self.provider.name())
            .field("options", &self.options)
            .finish()
    }
}
