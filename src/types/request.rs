//! Validated request types.

use serde::Serialize;

use super::AnalysisType;

/// A single analysis request that passed validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisRequest {
    pub product: String,
    pub objective: String,
    pub segment: String,
    pub analysis_type: AnalysisType,
    /// Raw prompt override. When set, template construction is skipped.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prompt: Option<String>,
}

impl AnalysisRequest {
    pub fn new(
        product: impl Into<String>,
        objective: impl Into<String>,
        segment: impl Into<String>,
        analysis_type: AnalysisType,
    ) -> Self {
        Self {
            product: product.into(),
            objective: objective.into(),
            segment: segment.into(),
            analysis_type,
            prompt: None,
        }
    }

    /// Attach a raw prompt override.
    pub fn with_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.prompt = Some(prompt.into());
        self
    }
}

/// One product/objective/segment context with several analysis types,
/// answered together by a single combined prompt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchItem {
    pub product: String,
    pub objective: String,
    pub segment: String,
    pub analysis_types: Vec<AnalysisType>,
}

impl BatchItem {
    pub fn new(
        product: impl Into<String>,
        objective: impl Into<String>,
        segment: impl Into<String>,
        analysis_types: Vec<AnalysisType>,
    ) -> Self {
        Self {
            product: product.into(),
            objective: objective.into(),
            segment: segment.into(),
            analysis_types,
        }
    }
}
