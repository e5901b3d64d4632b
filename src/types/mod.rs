//! Public types for the Marketscope API.

mod analysis;
mod envelope;
mod generate;
mod request;
mod response;

pub use analysis::AnalysisType;
pub use envelope::{
    AnalysisSuccess, BatchEnvelope, BatchResult, BatchSuccess, Envelope, FailureEnvelope,
    FailureMeta, ResultEnvelope, SuccessMeta,
};
pub(crate) use envelope::millis;
pub use generate::{
    DEFAULT_MAX_TOKENS, DEFAULT_MODEL, DEFAULT_TEMPERATURE, GenerateOptions, GenerateResponse,
};
pub use request::{AnalysisRequest, BatchItem};
pub use response::Usage;
