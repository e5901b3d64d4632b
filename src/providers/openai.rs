//! OpenAI chat-completions client.
//!
//! Sends the prompt as a single user message. See:
//! <https://platform.openai.com/docs/api-reference/chat/create>

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::traits::GenerateProvider;
use crate::types::{GenerateOptions, GenerateResponse, Usage};
use crate::{MarketscopeError, Result};

/// Default base URL for the OpenAI API
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com";

/// Per-request HTTP timeout used when the caller does not pick one.
pub const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(20);

/// Client for the OpenAI chat-completions endpoint.
#[derive(Clone)]
pub struct OpenAiClient {
    api_key: String,
    http: Client,
    base_url: String,
    timeout: Duration,
}

impl OpenAiClient {
    /// Create a client for the public API.
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        Self::with_base_url(api_key, DEFAULT_BASE_URL)
    }

    /// Create a client with a custom base URL (proxies, wiremock).
    pub fn with_base_url(api_key: impl Into<String>, base_url: impl Into<String>) -> Result<Self> {
        Self::with_timeout(api_key, base_url, DEFAULT_HTTP_TIMEOUT)
    }

    /// Create a client with a custom base URL and HTTP timeout.
    pub fn with_timeout(
        api_key: impl Into<String>,
        base_url: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| {
                MarketscopeError::Configuration(format!("failed to build HTTP client: {e}"))
            })?;

        Ok(Self {
            api_key: api_key.into(),
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            timeout,
        })
    }

    /// Issue one chat-completion call. Never retries.
    pub async fn complete(&self, prompt: &str, options: &GenerateOptions) -> Result<GenerateResponse> {
        let url = format!("{}/v1/chat/completions", self.base_url);

        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&ChatCompletionRequest {
                model: &options.model,
                messages: [ChatMessage {
                    role: "user",
                    content: prompt,
                }],
                temperature: options.temperature,
                max_tokens: options.max_tokens,
            })
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        let status = response.status();
        if !status.is_success() {
            let retry_after = response
                .headers()
                .get("retry-after")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse::<u64>().ok())
                .map(Duration::from_secs);
            let body = response.text().await.unwrap_or_default();
            return Err(status_error(status.as_u16(), retry_after, &body));
        }

        let completion: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| self.transport_error(e))?;

        debug!(
            model = completion.model.as_deref().unwrap_or(&options.model),
            choices = completion.choices.len(),
            "chat completion received"
        );

        // An empty completion is a valid (if unhelpful) answer.
        let text = completion
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .unwrap_or_default();

        Ok(GenerateResponse {
            text,
            usage: completion.usage.map(|u| Usage {
                prompt_tokens: u.prompt_tokens,
                completion_tokens: u.completion_tokens,
                total_tokens: u.total_tokens,
            }),
            model: completion.model,
        })
    }

    fn transport_error(&self, err: reqwest::Error) -> MarketscopeError {
        if err.is_timeout() {
            MarketscopeError::Timeout {
                after: self.timeout,
            }
        } else {
            MarketscopeError::Http(err.to_string())
        }
    }
}

/// Map a non-success status and error body to a classified error.
///
/// Quota exhaustion arrives as a 429 with code `insufficient_quota`, so the
/// error code is inspected before the status.
fn status_error(status: u16, retry_after: Option<Duration>, body: &str) -> MarketscopeError {
    let detail = serde_json::from_str::<ErrorBody>(body)
        .ok()
        .map(|b| b.error)
        .unwrap_or_default();
    let message = detail
        .message
        .clone()
        .unwrap_or_else(|| format!("OpenAI API error: {status}"));

    let is_quota = [detail.code.as_deref(), detail.kind.as_deref()]
        .into_iter()
        .flatten()
        .any(|c| c == "insufficient_quota" || c.starts_with("billing"));

    if is_quota {
        return MarketscopeError::QuotaExceeded(message);
    }

    match status {
        401 | 403 => MarketscopeError::AuthenticationFailed(message),
        429 => MarketscopeError::RateLimited { retry_after },
        _ => MarketscopeError::Api { status, message },
    }
}

#[async_trait]
impl GenerateProvider for OpenAiClient {
    fn name(&self) -> &str {
        "openai"
    }

    async fn generate(&self, prompt: &str, options: &GenerateOptions) -> Result<GenerateResponse> {
        self.complete(prompt, options).await
    }
}

#[derive(Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 1],
    temperature: f32,
    max_tokens: u32,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    model: Option<String>,
    #[serde(default)]
    choices: Vec<Choice>,
    #[serde(default)]
    usage: Option<CompletionUsage>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Deserialize)]
struct CompletionUsage {
    prompt_tokens: u32,
    completion_tokens: u32,
    total_tokens: u32,
}

#[derive(Deserialize)]
struct ErrorBody {
    error: ErrorDetail,
}

#[derive(Deserialize, Default)]
struct ErrorDetail {
    #[serde(default)]
    message: Option<String>,
    #[serde(default, rename = "type")]
    kind: Option<String>,
    #[serde(default)]
    code: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorKind;

    #[test]
    fn quota_code_wins_over_429_status() {
        let body = r#"{"error":{"message":"You exceeded your current quota","type":"insufficient_quota","code":"insufficient_quota"}}"#;
        let err = status_error(429, None, body);
        assert_eq!(err.kind(), ErrorKind::Quota);
        assert!(err.to_string().contains("exceeded your current quota"));
    }

    #[test]
    fn plain_429_is_rate_limited() {
        let body = r#"{"error":{"message":"Rate limit reached","type":"requests","code":"rate_limit_exceeded"}}"#;
        let err = status_error(429, Some(Duration::from_secs(2)), body);
        assert_eq!(err.kind(), ErrorKind::RateLimited);
        assert_eq!(err.retry_after(), Some(Duration::from_secs(2)));
    }

    #[test]
    fn unauthorized_keeps_provider_message() {
        let body = r#"{"error":{"message":"Incorrect API key provided","type":"invalid_request_error","code":"invalid_api_key"}}"#;
        let err = status_error(401, None, body);
        assert_eq!(err.kind(), ErrorKind::Auth);
        assert!(err.to_string().contains("Incorrect API key provided"));
    }

    #[test]
    fn unparseable_body_falls_back_to_status_message() {
        let err = status_error(502, None, "<html>bad gateway</html>");
        match err {
            MarketscopeError::Api { status, message } => {
                assert_eq!(status, 502);
                assert_eq!(message, "OpenAI API error: 502");
            }
            other => panic!("expected Api error, got {other:?}"),
        }
    }
}
