//! Turning wire failures and provider responses into [`LlmError`] values.

use crate::error::redact::redact_secrets;
use crate::error::types::LlmError;
use serde_json::Value;

/// Longest response-body excerpt stored in an error, in characters.
const MAX_BODY_EXCERPT_CHARS: usize = 500;

/// Substrings that mark a failure as TLS-related. Checked before the
/// connect check because TLS failures frequently surface as connect
/// errors. Scanned over the source chain only; the top-level reqwest
/// message embeds the request URL, and a hostname like
/// `ssl.gateway.example` is not a TLS failure.
const TLS_MARKERS: [&str; 4] = ["certificate", "tls", "ssl", "handshake"];

/// Classify a failure that happened on the wire, before any HTTP status
/// was available.
///
/// `target` names the endpoint the request was headed for and is woven
/// into every message so the operator knows which backend misbehaved.
pub fn classify_transport_error(target: &str, err: &reqwest::Error) -> LlmError {
    let sources = source_chain_text(err);
    let cause = if sources.is_empty() {
        err.to_string()
    } else {
        format!("{err}: {sources}")
    };
    classify_transport_cause(target, &cause, &sources, err.is_connect(), err.is_timeout())
}

fn classify_transport_cause(
    target: &str,
    cause: &str,
    sources: &str,
    is_connect: bool,
    is_timeout: bool,
) -> LlmError {
    let haystack = sources.to_lowercase();
    if TLS_MARKERS.iter().any(|marker| haystack.contains(marker)) {
        return LlmError::transport_security(format!(
            "TLS setup with {target} failed: {cause}. A corporate proxy or \
             TLS-intercepting middlebox may be rewriting certificates."
        ));
    }
    if is_connect {
        return LlmError::connectivity(format!(
            "cannot reach {target}: {cause}. Check proxy and network configuration."
        ));
    }
    if is_timeout {
        return LlmError::transport(format!("request to {target} timed out: {cause}"));
    }
    LlmError::transport(format!("network error talking to {target}: {cause}"))
}

/// Flatten an error's sources into one line, skipping the top-level
/// message. The useful detail usually sits at the bottom of the chain.
fn source_chain_text(err: &reqwest::Error) -> String {
    let mut parts = Vec::new();
    let mut source = std::error::Error::source(err);
    while let Some(inner) = source {
        parts.push(inner.to_string());
        source = inner.source();
    }
    parts.join(": ")
}

/// Classify a non-success provider response.
///
/// The message is chosen in order: a provider-specific extraction when the
/// adapter supplied one, then the generic JSON envelope, then the raw body.
/// Whatever wins is scrubbed of credentials and bounded to
/// [`MAX_BODY_EXCERPT_CHARS`].
pub fn classify_api_error(
    provider: &str,
    status: u16,
    body: &str,
    vendor_message: Option<String>,
) -> LlmError {
    let scrubbed = redact_secrets(body);
    let message = vendor_message
        .map(|extracted| redact_secrets(&extracted))
        .or_else(|| extract_error_message(&scrubbed))
        .map(|extracted| truncate_excerpt(&extracted))
        .unwrap_or_else(|| {
            if scrubbed.trim().is_empty() {
                format!("no response body (HTTP {status})")
            } else {
                truncate_excerpt(scrubbed.trim())
            }
        });
    LlmError::api(provider, status, message, bounded_excerpt(&scrubbed))
}

/// Pull a human-readable message out of the common JSON error envelopes.
///
/// Understands `{"error": {"message": ...}}`, `{"message": ...}`, and a
/// top-level `"error"` holding a primitive. Returns `None` for anything
/// else, including envelopes whose fields are objects without a message.
pub fn extract_error_message(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body.trim()).ok()?;

    if let Some(message) = value
        .get("error")
        .and_then(|error| error.get("message"))
        .and_then(Value::as_str)
    {
        return Some(message.to_string());
    }

    if let Some(message) = value.get("message").and_then(Value::as_str) {
        return Some(message.to_string());
    }

    match value.get("error") {
        Some(Value::String(text)) => Some(text.clone()),
        Some(Value::Number(number)) => Some(number.to_string()),
        Some(Value::Bool(flag)) => Some(flag.to_string()),
        _ => None,
    }
}

/// Bounded copy of a response body for storage in an error, `None` when
/// the body is blank.
pub(crate) fn bounded_excerpt(body: &str) -> Option<String> {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(truncate_excerpt(trimmed))
    }
}

/// Keep the first [`MAX_BODY_EXCERPT_CHARS`] characters and say how much
/// was dropped. Counts characters, not bytes, so multibyte text never
/// splits.
fn truncate_excerpt(text: &str) -> String {
    let total = text.chars().count();
    if total <= MAX_BODY_EXCERPT_CHARS {
        return text.to_string();
    }
    let kept: String = text.chars().take(MAX_BODY_EXCERPT_CHARS).collect();
    format!("{}... [truncated {} chars]", kept, total - MAX_BODY_EXCERPT_CHARS)
}
