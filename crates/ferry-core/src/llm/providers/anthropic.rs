//! Anthropic messages backend.

use crate::config::{ModelParameters, ProviderConfig};
use crate::error::LlmResult;
use crate::llm::messages::{ChatMessage, ChatResponse, MessageRole, TokenUsage};
use crate::llm::providers::adapter::{AuthHeader, ProviderAdapter};
use crate::llm::providers::{malformed_response, read_u32};
use crate::net::executor::ApiResponse;
use serde_json::{json, Value};

const DEFAULT_API_VERSION: &str = "2023-06-01";

/// The messages API requires max_tokens; used when the caller sets none.
const DEFAULT_MAX_TOKENS: u32 = 4096;

/// Adapter for the Anthropic messages API.
pub struct AnthropicProvider {
    api_key: Option<String>,
    api_version: String,
    params: ModelParameters,
}

impl AnthropicProvider {
    /// Create an adapter over the given credentials and model parameters.
    pub fn new(config: &ProviderConfig, params: ModelParameters) -> Self {
        Self {
            api_key: config.api_key.clone(),
            api_version: config
                .api_version
                .clone()
                .unwrap_or_else(|| DEFAULT_API_VERSION.to_string()),
            params,
        }
    }
}

impl ProviderAdapter for AnthropicProvider {
    fn name(&self) -> &'static str {
        "anthropic"
    }

    fn default_base_url(&self) -> &'static str {
        "https://api.anthropic.com"
    }

    fn request_path(&self) -> &'static str {
        "v1/messages"
    }

    fn auth_header(&self) -> Option<AuthHeader> {
        self.api_key
            .as_deref()
            .map(|key| AuthHeader::new("x-api-key", key))
    }

    fn extra_headers(&self) -> Vec<(&'static str, String)> {
        vec![("anthropic-version", self.api_version.clone())]
    }

    fn build_request(&self, messages: &[ChatMessage]) -> LlmResult<String> {
        self.params.validate()?;

        // The messages API takes system prompts as a top-level field, not
        // as conversation turns.
        let mut system_parts: Vec<&str> = Vec::new();
        let mut wire_messages: Vec<Value> = Vec::new();
        for message in messages {
            match message.role {
                MessageRole::System => system_parts.push(&message.content),
                _ => wire_messages.push(json!({
                    "role": message.role.to_string(),
                    "content": message.content,
                })),
            }
        }

        let mut body = json!({
            "model": self.params.model,
            "max_tokens": self.params.max_tokens.unwrap_or(DEFAULT_MAX_TOKENS),
            "messages": wire_messages,
        });
        if !system_parts.is_empty() {
            body["system"] = json!(system_parts.join("\n\n"));
        }
        // The API rejects requests carrying both temperature and top_p.
        if let Some(temperature) = self.params.temperature {
            body["temperature"] = json!(temperature);
        } else if let Some(top_p) = self.params.top_p {
            body["top_p"] = json!(top_p);
        }
        if let Some(stop) = &self.params.stop {
            body["stop_sequences"] = json!(stop);
        }

        Ok(body.to_string())
    }

    fn parse_response(&self, response: &ApiResponse) -> LlmResult<ChatResponse> {
        let value: Value = serde_json::from_str(&response.body).map_err(|err| {
            malformed_response(self.name(), response, format!("not JSON: {err}"))
        })?;

        let blocks = value
            .get("content")
            .and_then(Value::as_array)
            .ok_or_else(|| malformed_response(self.name(), response, "no content blocks"))?;
        let content: String = blocks
            .iter()
            .filter(|block| block.get("type").and_then(Value::as_str) == Some("text"))
            .filter_map(|block| block.get("text").and_then(Value::as_str))
            .collect();

        let usage = value.get("usage").map(|usage| {
            TokenUsage::new(
                read_u32(usage, "input_tokens"),
                read_u32(usage, "output_tokens"),
                None,
            )
        });
        let finish_reason = value
            .get("stop_reason")
            .and_then(Value::as_str)
            .map(String::from);
        let model = value.get("model").and_then(Value::as_str).map(String::from);

        Ok(ChatResponse {
            content,
            model,
            usage,
            finish_reason,
        })
    }

    fn extract_error_message(&self, body: &str) -> Option<String> {
        let value: Value = serde_json::from_str(body.trim()).ok()?;
        let error = value.get("error")?;
        let message = error.get("message").and_then(Value::as_str)?;
        match error.get("type").and_then(Value::as_str) {
            Some(kind) => Some(format!("{kind}: {message}")),
            None => Some(message.to_string()),
        }
    }
}
