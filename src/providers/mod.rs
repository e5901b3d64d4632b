//! Generation backends and the retry policy composed around them.

pub mod openai;
pub mod retry;
pub mod traits;

pub use openai::OpenAiClient;
pub use retry::{RetryConfig, RetryingGenerateProvider, with_retry};
pub use traits::GenerateProvider;
