//! Provider backends and the contract they share.

pub mod adapter;
pub mod anthropic;
pub mod openai;

pub use adapter::{AuthHeader, ProviderAdapter};
pub use anthropic::AnthropicProvider;
pub use openai::OpenAiProvider;

use crate::error::{bounded_excerpt, LlmError};
use crate::net::executor::ApiResponse;
use serde_json::Value;

/// Error for a 2xx response whose body does not have the provider's
/// documented shape. Carries the actual status so the caller can tell it
/// apart from a rejected request.
pub(crate) fn malformed_response(
    provider: &str,
    response: &ApiResponse,
    detail: impl Into<String>,
) -> LlmError {
    LlmError::api(
        provider,
        response.status,
        format!("unexpected response body: {}", detail.into()),
        bounded_excerpt(&response.body),
    )
}

/// Read an unsigned counter field, treating anything missing or
/// non-numeric as zero.
pub(crate) fn read_u32(value: &Value, key: &str) -> u32 {
    value.get(key).and_then(Value::as_u64).unwrap_or(0) as u32
}
