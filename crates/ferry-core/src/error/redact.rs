//! Secret scrubbing for response bodies that end up in error messages.

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

const REDACTED: &str = "[REDACTED]";

static BEARER_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)bearer\s+[A-Za-z0-9\-._~+/=]{8,}").expect("valid bearer token regex")
});

static SECRET_PAIR_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?i)("?(?:api[_-]?key|secret|password|token)"?\s*[:=]\s*)("[^"]{4,}"|\S{4,})"#)
        .expect("valid secret pair regex")
});

/// Scrub credentials from a response body before it is stored in an error.
///
/// JSON bodies get a structural pass that blanks any field whose key looks
/// credential-like; other bodies get pattern-based scrubbing for bearer
/// tokens and `key=value` style secrets.
pub(crate) fn redact_secrets(body: &str) -> String {
    let trimmed = body.trim();
    if let Ok(mut value) = serde_json::from_str::<Value>(trimmed) {
        redact_value(&mut value);
        value.to_string()
    } else {
        redact_plain(trimmed)
    }
}

fn redact_value(value: &mut Value) {
    match value {
        Value::Object(map) => {
            for (key, entry) in map.iter_mut() {
                if is_sensitive_key(key) {
                    *entry = Value::String(REDACTED.to_string());
                } else {
                    redact_value(entry);
                }
            }
        }
        Value::Array(items) => {
            for item in items.iter_mut() {
                redact_value(item);
            }
        }
        Value::String(text) => {
            let scrubbed = redact_plain(text);
            if scrubbed != *text {
                *text = scrubbed;
            }
        }
        _ => {}
    }
}

fn redact_plain(text: &str) -> String {
    let pass = BEARER_RE.replace_all(text, REDACTED);
    SECRET_PAIR_RE.replace_all(&pass, format!("${{1}}{REDACTED}")).into_owned()
}

/// Field names that hold credentials. Matches whole segments so counters
/// like `total_tokens` survive.
fn is_sensitive_key(key: &str) -> bool {
    let normalized = key.to_ascii_lowercase().replace('-', "_");
    normalized == "token"
        || normalized.ends_with("_token")
        || normalized.contains("api_key")
        || normalized.contains("apikey")
        || normalized.contains("secret")
        || normalized.contains("password")
        || normalized.contains("authorization")
        || normalized.contains("cookie")
        || normalized.contains("private_key")
}
