//! The closed set of analysis types a caller may request.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::MarketscopeError;

/// Kind of analysis block to generate.
///
/// The wire identifiers are kebab-case (`marketing-okrs`, `strengths`, ...)
/// and form the allow-list enforced by [`validate`](crate::validation::validate).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AnalysisType {
    MarketingOkrs,
    Strengths,
    Weaknesses,
    Opportunities,
    Threats,
    Positioning,
    Persona,
    Investment,
    Channels,
}

impl AnalysisType {
    /// Every analysis type, in dashboard order.
    pub const ALL: [AnalysisType; 9] = [
        AnalysisType::MarketingOkrs,
        AnalysisType::Strengths,
        AnalysisType::Weaknesses,
        AnalysisType::Opportunities,
        AnalysisType::Threats,
        AnalysisType::Positioning,
        AnalysisType::Persona,
        AnalysisType::Investment,
        AnalysisType::Channels,
    ];

    /// Wire identifier.
    pub fn as_str(self) -> &'static str {
        match self {
            AnalysisType::MarketingOkrs => "marketing-okrs",
            AnalysisType::Strengths => "strengths",
            AnalysisType::Weaknesses => "weaknesses",
            AnalysisType::Opportunities => "opportunities",
            AnalysisType::Threats => "threats",
            AnalysisType::Positioning => "positioning",
            AnalysisType::Persona => "persona",
            AnalysisType::Investment => "investment",
            AnalysisType::Channels => "channels",
        }
    }

    /// Human-readable label shown by the dashboard.
    pub fn label(self) -> &'static str {
        match self {
            AnalysisType::MarketingOkrs => "Marketing OKRs",
            AnalysisType::Strengths => "Strengths",
            AnalysisType::Weaknesses => "Weaknesses",
            AnalysisType::Opportunities => "Opportunities",
            AnalysisType::Threats => "Threats",
            AnalysisType::Positioning => "Market Positioning",
            AnalysisType::Persona => "Buyer Persona",
            AnalysisType::Investment => "Investment Opportunities",
            AnalysisType::Channels => "Channels & Distribution",
        }
    }

    /// Look up an identifier in the allow-list. Matching is exact.
    pub fn parse(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.as_str() == id)
    }
}

impl fmt::Display for AnalysisType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AnalysisType {
    type Err = MarketscopeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| {
            MarketscopeError::Validation(format!("analysisType '{s}' is not a known analysis type"))
        })
    }
}
