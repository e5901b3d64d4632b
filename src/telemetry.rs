//! Telemetry metric name constants.
//!
//! Install any `metrics` recorder (prometheus, statsd, ...) to collect
//! these; without one every metric call is a no-op.
//!
//! All metrics are prefixed with `marketscope_`. Counters end in `_total`,
//! histograms carry their unit.

/// Analysis requests that reached the generation stage.
///
/// Labels: `operation` ("analyze" | "analyze_batch"), `status` ("ok" | "error").
pub const REQUESTS_TOTAL: &str = "marketscope_requests_total";

/// Generation duration in seconds, retries included.
///
/// Labels: `operation`.
pub const REQUEST_DURATION_SECONDS: &str = "marketscope_request_duration_seconds";

/// Retry attempts (not counting the initial attempt).
///
/// Labels: `operation`.
pub const RETRIES_TOTAL: &str = "marketscope_retries_total";

/// Tokens consumed, as reported by the provider.
///
/// Labels: `direction` ("prompt" | "completion").
pub const TOKENS_TOTAL: &str = "marketscope_tokens_total";

/// Requests rejected at the boundary (malformed body or failed validation).
///
/// Labels: `reason` ("malformed" | "validation").
pub const REJECTIONS_TOTAL: &str = "marketscope_rejections_total";
