//! Error taxonomy and the classification that feeds it.
//!
//! Transport failures are split by what an operator would do about them:
//! [`LlmError::Connectivity`] points at network or proxy configuration,
//! [`LlmError::TransportSecurity`] points at TLS interception, and
//! [`LlmError::Transport`] is everything else on the wire. Provider
//! rejections become [`LlmError::Api`] with the status code and a bounded,
//! credential-scrubbed body excerpt attached.

mod classify;
mod redact;
mod types;

pub use classify::{classify_api_error, classify_transport_error, extract_error_message};
pub(crate) use classify::bounded_excerpt;
pub(crate) use redact::redact_secrets;
pub use types::{LlmError, LlmResult};
