//! Provider connection settings and per-request model parameters.

use crate::config::TimeoutConfig;
use crate::error::{LlmError, LlmResult};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

// ============================================================================
// Provider configuration
// ============================================================================

/// Connection settings for one provider backend.
///
/// Everything here is optional: a default-constructed config talks to the
/// provider's public endpoint with no credentials, which is enough for
/// mock-server tests. Real deployments set at least the API key.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// API key used by the provider's auth scheme. `None` sends no
    /// credential header at all.
    pub api_key: Option<String>,

    /// Endpoint override. `None` uses the provider's default base URL.
    pub base_url: Option<String>,

    /// Provider API version, for vendors that pin one in a header.
    pub api_version: Option<String>,

    /// Extra headers attached to every request, e.g. for gateway routing.
    #[serde(default)]
    pub headers: HashMap<String, String>,

    /// Connect and request deadlines.
    #[serde(default)]
    pub timeouts: TimeoutConfig,
}

impl ProviderConfig {
    /// Create an empty configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the API key.
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Read the API key from an environment variable, if it is set and
    /// non-empty.
    pub fn with_api_key_from_env(mut self, var: &str) -> Self {
        self.api_key = std::env::var(var).ok().filter(|key| !key.trim().is_empty());
        self
    }

    /// Override the endpoint base URL.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Pin a provider API version.
    pub fn with_api_version(mut self, api_version: impl Into<String>) -> Self {
        self.api_version = Some(api_version.into());
        self
    }

    /// Attach a header to every request.
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    /// Replace the timeout limits.
    pub fn with_timeouts(mut self, timeouts: TimeoutConfig) -> Self {
        self.timeouts = timeouts;
        self
    }

    /// The API key with the middle hidden, safe for logs.
    pub fn masked_api_key(&self) -> String {
        match &self.api_key {
            Some(key) => mask_key(key),
            None => "<none>".to_string(),
        }
    }

    /// Check the configuration for values that can never work.
    pub fn validate(&self) -> LlmResult<()> {
        self.timeouts.validate()
    }
}

/// Keep the first and last few characters so a key can be recognized in
/// logs without being usable.
fn mask_key(key: &str) -> String {
    let chars: Vec<char> = key.chars().collect();
    if chars.len() <= 8 {
        "*".repeat(chars.len())
    } else {
        let head: String = chars[..4].iter().collect();
        let tail: String = chars[chars.len() - 4..].iter().collect();
        format!("{head}***{tail}")
    }
}

// ============================================================================
// Model parameters
// ============================================================================

/// Sampling and length parameters sent with each chat request.
///
/// Only `model` is required. Optional fields are omitted from the request
/// body when unset so the provider's own defaults apply.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ModelParameters {
    /// Model identifier, e.g. `gpt-4o` or `claude-sonnet-4-20250514`.
    pub model: String,

    /// Upper bound on generated tokens.
    pub max_tokens: Option<u32>,

    /// Sampling temperature.
    pub temperature: Option<f32>,

    /// Nucleus sampling mass.
    pub top_p: Option<f32>,

    /// Sequences that stop generation.
    pub stop: Option<Vec<String>>,
}

impl ModelParameters {
    /// Create parameters for a model with everything else left to the
    /// provider's defaults.
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            ..Self::default()
        }
    }

    /// Bound the number of generated tokens.
    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    /// Set the sampling temperature.
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    /// Set the nucleus sampling mass.
    pub fn with_top_p(mut self, top_p: f32) -> Self {
        self.top_p = Some(top_p);
        self
    }

    /// Set the stop sequences.
    pub fn with_stop(mut self, stop: Vec<String>) -> Self {
        self.stop = Some(stop);
        self
    }

    /// Reject parameters that cannot form a valid request.
    pub fn validate(&self) -> LlmResult<()> {
        if self.model.trim().is_empty() {
            return Err(LlmError::config("model must not be empty"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_chain_sets_all_fields() {
        let config = ProviderConfig::new()
            .with_api_key("sk-test-123456789")
            .with_base_url("https://gateway.internal/v1")
            .with_api_version("2023-06-01")
            .with_header("x-route", "llm");
        assert_eq!(config.api_key.as_deref(), Some("sk-test-123456789"));
        assert_eq!(config.base_url.as_deref(), Some("https://gateway.internal/v1"));
        assert_eq!(config.api_version.as_deref(), Some("2023-06-01"));
        assert_eq!(config.headers.get("x-route").map(String::as_str), Some("llm"));
    }

    #[test]
    fn masked_key_hides_the_middle() {
        let config = ProviderConfig::new().with_api_key("sk-abcdefghij1234");
        let masked = config.masked_api_key();
        assert_eq!(masked, "sk-a***1234");
        assert!(!masked.contains("bcdefghij"));
    }

    #[test]
    fn short_keys_are_fully_masked() {
        let config = ProviderConfig::new().with_api_key("tiny");
        assert_eq!(config.masked_api_key(), "****");
    }

    #[test]
    fn missing_key_masks_to_placeholder() {
        assert_eq!(ProviderConfig::new().masked_api_key(), "<none>");
    }

    #[test]
    fn validate_rejects_broken_timeouts() {
        let config = ProviderConfig::new()
            .with_timeouts(TimeoutConfig::new().with_request_timeout_secs(0));
        assert!(config.validate().is_err());
    }

    #[test]
    fn parameters_require_a_model() {
        assert!(ModelParameters::new("gpt-4o").validate().is_ok());
        assert!(ModelParameters::new("").validate().is_err());
        assert!(ModelParameters::new("   ").validate().is_err());
    }

    #[test]
    fn unset_parameters_stay_unset() {
        let params = ModelParameters::new("gpt-4o").with_temperature(0.2);
        assert_eq!(params.temperature, Some(0.2));
        assert_eq!(params.max_tokens, None);
        assert_eq!(params.top_p, None);
        assert_eq!(params.stop, None);
    }
}
