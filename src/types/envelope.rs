//! Wire-level response envelopes.
//!
//! Every response is built in one step once the generation outcome is
//! known, then serialized once. Success and failure bodies share the
//! `success` discriminator field, which is why [`Envelope`] serializes
//! untagged.

use std::collections::BTreeMap;
use std::time::Duration;

use serde::Serialize;

use super::{AnalysisRequest, AnalysisType, GenerateResponse, Usage};
use crate::MarketscopeError;

/// Response body for an endpoint whose success payload is `T`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Envelope<T> {
    Success(T),
    Failure(FailureEnvelope),
}

/// Envelope returned by the single-analysis endpoint.
pub type ResultEnvelope = Envelope<AnalysisSuccess>;

/// Envelope returned by the batch endpoint.
pub type BatchEnvelope = Envelope<BatchSuccess>;

impl<T> Envelope<T> {
    /// HTTP status code for this envelope.
    pub fn status(&self) -> u16 {
        match self {
            Envelope::Success(_) => 200,
            Envelope::Failure(failure) => failure.status,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Envelope::Success(_))
    }

    /// Envelope for a request rejected before any generation call
    /// (malformed body or failed validation). Carries no metadata.
    pub fn rejected(error: &MarketscopeError) -> Self {
        Envelope::Failure(FailureEnvelope {
            status: error.http_status(),
            success: false,
            error: error.to_string(),
            meta: None,
        })
    }

    /// Envelope for a generation call that failed after the retry policy
    /// gave up.
    pub fn failed(error: &MarketscopeError, model_requested: &str, elapsed: Duration) -> Self {
        Envelope::Failure(FailureEnvelope {
            status: error.http_status(),
            success: false,
            error: error.to_string(),
            meta: Some(FailureMeta {
                elapsed_ms: millis(elapsed),
                model_requested: model_requested.to_string(),
            }),
        })
    }
}

impl ResultEnvelope {
    /// Build the envelope for a resolved single-analysis outcome.
    pub fn build(
        request: &AnalysisRequest,
        outcome: Result<GenerateResponse, MarketscopeError>,
        model_requested: &str,
        elapsed: Duration,
    ) -> Self {
        match outcome {
            Ok(response) => Envelope::Success(AnalysisSuccess {
                success: true,
                product: request.product.clone(),
                objective: request.objective.clone(),
                segment: request.segment.clone(),
                analysis_type: request.analysis_type,
                analysis: response.text.trim().to_string(),
                meta: SuccessMeta::new(model_requested, response.model, response.usage, elapsed),
            }),
            Err(error) => Self::failed(&error, model_requested, elapsed),
        }
    }
}

/// Success body for a single analysis.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisSuccess {
    pub success: bool,
    pub product: String,
    pub objective: String,
    pub segment: String,
    pub analysis_type: AnalysisType,
    pub analysis: String,
    pub meta: SuccessMeta,
}

/// Metadata attached to every successful generation.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SuccessMeta {
    pub model_requested: String,
    pub model_used: String,
    pub fallback_used: bool,
    pub fallback_reason: Option<String>,
    pub elapsed_ms: u64,
    pub usage: Option<Usage>,
    pub demo: bool,
}

impl SuccessMeta {
    fn new(
        model_requested: &str,
        model_used: Option<String>,
        usage: Option<Usage>,
        elapsed: Duration,
    ) -> Self {
        Self {
            model_requested: model_requested.to_string(),
            model_used: model_used.unwrap_or_else(|| model_requested.to_string()),
            fallback_used: false,
            fallback_reason: None,
            elapsed_ms: millis(elapsed),
            usage,
            demo: false,
        }
    }
}

/// Failure body. `status` is carried for the HTTP layer and not serialized.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FailureEnvelope {
    #[serde(skip)]
    pub status: u16,
    pub success: bool,
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta: Option<FailureMeta>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FailureMeta {
    pub elapsed_ms: u64,
    pub model_requested: String,
}

/// Success body for a batch of analyses answered by one combined prompt.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchSuccess {
    pub success: bool,
    pub results: Vec<BatchResult>,
    pub meta: SuccessMeta,
}

impl BatchEnvelope {
    pub fn build(
        outcome: Result<(Vec<BatchResult>, GenerateResponse), MarketscopeError>,
        model_requested: &str,
        elapsed: Duration,
    ) -> Self {
        match outcome {
            Ok((results, response)) => Envelope::Success(BatchSuccess {
                success: true,
                results,
                meta: SuccessMeta::new(model_requested, response.model, response.usage, elapsed),
            }),
            Err(error) => Self::failed(&error, model_requested, elapsed),
        }
    }
}

/// Per-item section texts recovered from a combined response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchResult {
    pub product: String,
    pub objective: String,
    pub segment: String,
    /// Analysis-type identifier → trimmed section text. Empty when the
    /// model omitted the section.
    pub analyses: BTreeMap<String, String>,
}

/// Whole milliseconds, saturating at `u64::MAX`.
pub(crate) fn millis(elapsed: Duration) -> u64 {
    u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn millis_saturates_instead_of_truncating() {
        assert_eq!(millis(Duration::from_millis(1500)), 1500);
        assert_eq!(millis(Duration::MAX), u64::MAX);
    }
}
