//! Client configuration.

use std::time::Duration;

/// Settings fixed at client construction.
///
/// `timeout` bounds each whole call; `None` leaves it to the transport
/// default, which is no timeout for `UreqTransport`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub base_url: String,
    pub timeout: Option<Duration>,
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout: None,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}
