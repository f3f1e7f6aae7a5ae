//! The contract every provider backend implements.

use crate::error::LlmResult;
use crate::llm::messages::{ChatMessage, ChatResponse};
use crate::net::executor::ApiResponse;

/// An authentication header ready to attach to a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthHeader {
    /// Header name, e.g. `Authorization` or `x-api-key`.
    pub name: &'static str,
    /// Header value, including any scheme prefix.
    pub value: String,
}

impl AuthHeader {
    /// Build a header from its parts.
    pub fn new(name: &'static str, value: impl Into<String>) -> Self {
        Self {
            name,
            value: value.into(),
        }
    }

    /// The common `Authorization: Bearer <token>` form.
    pub fn bearer(token: impl Into<String>) -> Self {
        Self::new("Authorization", format!("Bearer {}", token.into()))
    }
}

/// Everything the transport needs to know about one provider.
///
/// Adapters are pure translators: they name the endpoint, supply
/// credentials as headers, turn conversations into wire bodies, and turn
/// wire bodies back into [`ChatResponse`] values. They never touch the
/// network themselves, which is what lets a new vendor plug in without any
/// change to resolution or execution.
pub trait ProviderAdapter: Send + Sync {
    /// Short provider name used in logs and error messages, e.g.
    /// `"openai"`.
    fn name(&self) -> &'static str;

    /// The provider's public endpoint, used when no base URL override is
    /// configured.
    fn default_base_url(&self) -> &'static str;

    /// Request path relative to the base URL.
    fn request_path(&self) -> &'static str;

    /// The credential header for this provider, or `None` when no API key
    /// is configured.
    fn auth_header(&self) -> Option<AuthHeader>;

    /// Additional headers the provider's API requires on every request.
    fn extra_headers(&self) -> Vec<(&'static str, String)> {
        Vec::new()
    }

    /// Serialize a conversation into the provider's request body.
    ///
    /// The returned string is sent byte-for-byte as the POST body.
    fn build_request(&self, messages: &[ChatMessage]) -> LlmResult<String>;

    /// Parse a 2xx response body into the normalized response shape.
    fn parse_response(&self, response: &ApiResponse) -> LlmResult<ChatResponse>;

    /// Provider-specific error extraction for non-success bodies.
    ///
    /// Returning `None` hands the body to the generic envelope extraction.
    fn extract_error_message(&self, _body: &str) -> Option<String> {
        None
    }
}
