//! Marketscope error types and failure classification.

use std::time::Duration;

/// Marketscope error types
#[derive(Debug, thiserror::Error)]
pub enum MarketscopeError {
    // Provider/network errors
    #[error("HTTP error: {0}")]
    Http(String),

    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("request timeout after {}ms", .after.as_millis())]
    Timeout { after: Duration },

    #[error("rate limited, retry after {retry_after:?}")]
    RateLimited { retry_after: Option<Duration> },

    #[error("insufficient_quota: {0}")]
    QuotaExceeded(String),

    #[error("unauthorized (401): {0}")]
    AuthenticationFailed(String),

    /// Unstructured failure text handed back by a provider. Classified
    /// with [`ErrorKind::classify_message`].
    #[error("{0}")]
    Provider(String),

    // Request boundary errors
    #[error("Invalid JSON body: {0}")]
    MalformedRequest(String),

    #[error(
        "Missing/invalid fields. Required: {{ product, objective, segment, analysisType }} ({0})"
    )]
    Validation(String),

    // Configuration errors
    #[error("configuration error: {0}")]
    Configuration(String),
}

/// Structured failure classification.
///
/// Attached to every [`MarketscopeError`] where it is raised; the retry
/// policy and the HTTP layer switch on this instead of on message text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Timeout,
    Auth,
    Quota,
    RateLimited,
    Network,
    Validation,
    Malformed,
    Configuration,
    Unknown,
}

impl ErrorKind {
    /// Best-effort classification of a free-form provider message.
    ///
    /// Only used for [`MarketscopeError::Provider`]; structured variants
    /// carry their kind directly.
    pub fn classify_message(message: &str) -> Self {
        let msg = message.to_ascii_lowercase();
        if msg.contains("insufficient_quota") || msg.contains("quota") || msg.contains("billing")
        {
            ErrorKind::Quota
        } else if msg.contains("unauthorized")
            || msg.contains("invalid api key")
            || msg.contains("401")
        {
            ErrorKind::Auth
        } else if msg.contains("timeout") || msg.contains("timed out") || msg.contains("abort") {
            ErrorKind::Timeout
        } else if msg.contains("rate limit") || msg.contains("429") {
            ErrorKind::RateLimited
        } else if msg.contains("connection") || msg.contains("network") {
            ErrorKind::Network
        } else {
            ErrorKind::Unknown
        }
    }

    /// Whether a failure of this kind is worth another attempt.
    pub fn is_retryable(self) -> bool {
        !matches!(
            self,
            ErrorKind::Auth
                | ErrorKind::Quota
                | ErrorKind::Validation
                | ErrorKind::Malformed
                | ErrorKind::Configuration
        )
    }
}

impl MarketscopeError {
    /// Classification of this failure.
    pub fn kind(&self) -> ErrorKind {
        match self {
            MarketscopeError::Http(_) => ErrorKind::Network,
            MarketscopeError::Api { status, .. } => match status {
                401 | 403 => ErrorKind::Auth,
                408 | 504 => ErrorKind::Timeout,
                429 => ErrorKind::RateLimited,
                500..=599 => ErrorKind::Network,
                _ => ErrorKind::Unknown,
            },
            MarketscopeError::Timeout { .. } => ErrorKind::Timeout,
            MarketscopeError::RateLimited { .. } => ErrorKind::RateLimited,
            MarketscopeError::QuotaExceeded(_) => ErrorKind::Quota,
            MarketscopeError::AuthenticationFailed(_) => ErrorKind::Auth,
            MarketscopeError::Provider(message) => ErrorKind::classify_message(message),
            MarketscopeError::MalformedRequest(_) => ErrorKind::Malformed,
            MarketscopeError::Validation(_) => ErrorKind::Validation,
            MarketscopeError::Configuration(_) => ErrorKind::Configuration,
        }
    }

    /// Whether the retry policy may attempt the operation again.
    pub fn is_transient(&self) -> bool {
        self.kind().is_retryable()
    }

    /// Provider-supplied backoff hint, if any.
    pub fn retry_after(&self) -> Option<Duration> {
        match self {
            MarketscopeError::RateLimited { retry_after } => *retry_after,
            _ => None,
        }
    }

    /// HTTP status reported to the caller for this failure.
    pub fn http_status(&self) -> u16 {
        match self.kind() {
            ErrorKind::Validation | ErrorKind::Malformed => 400,
            ErrorKind::Timeout => 504,
            _ => 500,
        }
    }
}

/// Result type alias for Marketscope operations
pub type Result<T> = std::result::Result<T, MarketscopeError>;
