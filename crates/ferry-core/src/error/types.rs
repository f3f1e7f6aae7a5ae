//! Error taxonomy for outbound provider calls.

use thiserror::Error;

/// Result alias used throughout the crate.
pub type LlmResult<T> = Result<T, LlmError>;

/// Every way an outbound provider call can fail.
///
/// The first four variants describe transport problems, from most to least
/// specific: the target was unreachable, the TLS layer broke, something
/// else went wrong on the wire, or the caller cancelled. [`LlmError::Api`]
/// is different in kind; the provider answered, but with a non-success
/// status. [`LlmError::Config`] covers mistakes caught before any request
/// leaves the process.
#[derive(Debug, Error)]
pub enum LlmError {
    /// The target endpoint could not be reached at all.
    #[error("{message}")]
    Connectivity {
        /// Human-readable description naming the unreachable endpoint.
        message: String,
    },

    /// TLS setup with the target failed.
    #[error("{message}")]
    TransportSecurity {
        /// Human-readable description of the TLS failure.
        message: String,
    },

    /// Any other failure on the wire, timeouts included.
    #[error("{message}")]
    Transport {
        /// Human-readable description of the failure.
        message: String,
    },

    /// The caller cancelled the request.
    #[error("request cancelled")]
    Cancelled,

    /// The provider responded with a non-success status.
    #[error("{provider} API error (status {status}): {message}")]
    Api {
        /// Provider that produced the response.
        provider: String,
        /// HTTP status code of the response.
        status: u16,
        /// Extracted or truncated error description.
        message: String,
        /// Bounded excerpt of the raw response body, when one existed.
        body: Option<String>,
    },

    /// The client was configured with values that can never work.
    #[error("configuration error: {message}")]
    Config {
        /// What was wrong with the configuration.
        message: String,
    },
}

impl LlmError {
    /// Create a connectivity error.
    pub fn connectivity(message: impl Into<String>) -> Self {
        Self::Connectivity {
            message: message.into(),
        }
    }

    /// Create a transport-security error.
    pub fn transport_security(message: impl Into<String>) -> Self {
        Self::TransportSecurity {
            message: message.into(),
        }
    }

    /// Create a generic transport error.
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
        }
    }

    /// Create a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create an API error from a provider response.
    pub fn api(
        provider: impl Into<String>,
        status: u16,
        message: impl Into<String>,
        body: Option<String>,
    ) -> Self {
        Self::Api {
            provider: provider.into(),
            status,
            message: message.into(),
            body,
        }
    }

    /// The human-readable message carried by any variant.
    pub fn message(&self) -> &str {
        match self {
            Self::Connectivity { message }
            | Self::TransportSecurity { message }
            | Self::Transport { message }
            | Self::Api { message, .. }
            | Self::Config { message } => message,
            Self::Cancelled => "request cancelled",
        }
    }

    /// The HTTP status code, for errors that carry one.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// The bounded response-body excerpt, for errors that carry one.
    pub fn body_excerpt(&self) -> Option<&str> {
        match self {
            Self::Api { body, .. } => body.as_deref(),
            _ => None,
        }
    }

    /// Whether this failure was caused by cancellation.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }
}
