//! Marketscope - templated market-analysis generation
//!
//! Turns a (product, objective, segment, analysis type) tuple into a
//! deterministic prompt, sends it to a text-generation provider under a
//! retry/timeout policy, and wraps the result in a response envelope.
//!
//! ```text
//! body ──validate──▶ AnalysisRequest ──prompt──▶ String
//!      ──RetryingGenerateProvider──▶ GenerateResponse ──▶ ResultEnvelope
//! ```
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use marketscope::{AnalysisRequest, AnalysisService, AnalysisType, OpenAiClient};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let service = AnalysisService::builder()
//!         .provider(Arc::new(OpenAiClient::new("sk-your-key")?))
//!         .build()?;
//!
//!     let request = AnalysisRequest::new(
//!         "Coffee",
//!         "Increase Sales",
//!         "Gen Z Creators",
//!         AnalysisType::Strengths,
//!     );
//!     let envelope = service.analyze(&request).await;
//!     println!("{}", serde_json::to_string_pretty(&envelope)?);
//!     Ok(())
//! }
//! ```

pub mod error;
pub mod prompt;
pub mod providers;
#[cfg(feature = "server")]
pub mod server;
pub mod service;
pub mod telemetry;
pub mod types;
pub mod validation;
mod version;

// Re-export main types at crate root
pub use error::{ErrorKind, MarketscopeError, Result};
pub use providers::{GenerateProvider, OpenAiClient, RetryConfig, RetryingGenerateProvider};
pub use service::{AnalysisService, AnalysisServiceBuilder};
pub use version::{BuildInfo, PKG_VERSION, version_string};

pub use types::{
    AnalysisRequest, AnalysisType, BatchEnvelope, BatchItem, BatchResult, Envelope,
    GenerateOptions, GenerateResponse, ResultEnvelope, Usage,
};
