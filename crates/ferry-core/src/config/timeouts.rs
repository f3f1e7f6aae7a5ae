//! Request timing limits.

use crate::error::{LlmError, LlmResult};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Connect and total-request deadlines applied to every outbound call.
///
/// Both limits are fixed when the client is built and enforced by the
/// transport itself. The request timeout covers the whole exchange,
/// connection establishment included, so it must not be shorter than the
/// connect timeout. Large completions take a while; the default request
/// budget is two minutes.
///
/// # Examples
///
/// ```rust
/// use ferry_core::config::TimeoutConfig;
///
/// // 10s to connect, 120s end to end
/// let timeouts = TimeoutConfig::default();
///
/// // More patience for slow backends
/// let patient = TimeoutConfig::new().with_request_timeout_secs(300);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeoutConfig {
    /// Maximum time to establish a connection, in seconds. Default: 10.
    #[serde(default = "TimeoutConfig::default_connect_timeout")]
    pub connect_timeout_secs: u64,

    /// Maximum time for the complete request/response cycle, in seconds.
    /// Default: 120.
    #[serde(default = "TimeoutConfig::default_request_timeout")]
    pub request_timeout_secs: u64,
}

impl TimeoutConfig {
    const fn default_connect_timeout() -> u64 {
        10
    }

    const fn default_request_timeout() -> u64 {
        120
    }

    /// Create a timeout configuration with the default limits.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the connect timeout in seconds.
    pub fn with_connect_timeout_secs(mut self, secs: u64) -> Self {
        self.connect_timeout_secs = secs;
        self
    }

    /// Set the request timeout in seconds.
    pub fn with_request_timeout_secs(mut self, secs: u64) -> Self {
        self.request_timeout_secs = secs;
        self
    }

    /// Connect timeout as a [`Duration`].
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    /// Request timeout as a [`Duration`].
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Reject zero timeouts and a request budget shorter than the connect
    /// budget.
    pub fn validate(&self) -> LlmResult<()> {
        if self.connect_timeout_secs == 0 {
            return Err(LlmError::config("connect timeout must be greater than zero"));
        }
        if self.request_timeout_secs == 0 {
            return Err(LlmError::config("request timeout must be greater than zero"));
        }
        if self.request_timeout_secs < self.connect_timeout_secs {
            return Err(LlmError::config(
                "request timeout must not be shorter than the connect timeout",
            ));
        }
        Ok(())
    }
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            connect_timeout_secs: Self::default_connect_timeout(),
            request_timeout_secs: Self::default_request_timeout(),
        }
    }
}
