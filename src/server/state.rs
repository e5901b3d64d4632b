//! Shared handler state.

use std::sync::Arc;
use std::time::Duration;

use crate::service::AnalysisService;

/// Default wall-clock ceiling for one HTTP request.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// State cloned into every handler. Holds nothing mutable.
#[derive(Clone, Debug)]
pub struct AppState {
    pub service: Arc<AnalysisService>,
    pub request_timeout: Duration,
}

impl AppState {
    pub fn new(service: Arc<AnalysisService>) -> Self {
        Self {
            service,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }
}
