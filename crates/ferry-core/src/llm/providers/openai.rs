//! OpenAI chat completions backend.

use crate::config::{ModelParameters, ProviderConfig};
use crate::error::LlmResult;
use crate::llm::messages::{ChatMessage, ChatResponse, TokenUsage};
use crate::llm::providers::adapter::{AuthHeader, ProviderAdapter};
use crate::llm::providers::{malformed_response, read_u32};
use crate::net::executor::ApiResponse;
use serde_json::{json, Value};

/// Adapter for the OpenAI chat completions API.
pub struct OpenAiProvider {
    api_key: Option<String>,
    params: ModelParameters,
}

impl OpenAiProvider {
    /// Create an adapter over the given credentials and model parameters.
    pub fn new(config: &ProviderConfig, params: ModelParameters) -> Self {
        Self {
            api_key: config.api_key.clone(),
            params,
        }
    }
}

impl ProviderAdapter for OpenAiProvider {
    fn name(&self) -> &'static str {
        "openai"
    }

    fn default_base_url(&self) -> &'static str {
        "https://api.openai.com/v1"
    }

    fn request_path(&self) -> &'static str {
        "chat/completions"
    }

    fn auth_header(&self) -> Option<AuthHeader> {
        self.api_key.as_deref().map(|key| AuthHeader::bearer(key))
    }

    fn build_request(&self, messages: &[ChatMessage]) -> LlmResult<String> {
        self.params.validate()?;

        let wire_messages: Vec<Value> = messages
            .iter()
            .map(|message| {
                json!({
                    "role": message.role.to_string(),
                    "content": message.content,
                })
            })
            .collect();

        let mut body = json!({
            "model": self.params.model,
            "messages": wire_messages,
        });
        if let Some(max_tokens) = self.params.max_tokens {
            body["max_tokens"] = json!(max_tokens);
        }
        if let Some(temperature) = self.params.temperature {
            body["temperature"] = json!(temperature);
        }
        if let Some(top_p) = self.params.top_p {
            body["top_p"] = json!(top_p);
        }
        if let Some(stop) = &self.params.stop {
            body["stop"] = json!(stop);
        }

        Ok(body.to_string())
    }

    fn parse_response(&self, response: &ApiResponse) -> LlmResult<ChatResponse> {
        let value: Value = serde_json::from_str(&response.body).map_err(|err| {
            malformed_response(self.name(), response, format!("not JSON: {err}"))
        })?;

        let first_choice = value
            .get("choices")
            .and_then(|choices| choices.get(0))
            .ok_or_else(|| malformed_response(self.name(), response, "no choices returned"))?;
        let content = first_choice
            .get("message")
            .and_then(|message| message.get("content"))
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();
        let finish_reason = first_choice
            .get("finish_reason")
            .and_then(Value::as_str)
            .map(String::from);

        let usage = value.get("usage").map(|usage| {
            TokenUsage::new(
                read_u32(usage, "prompt_tokens"),
                read_u32(usage, "completion_tokens"),
                usage
                    .get("total_tokens")
                    .and_then(Value::as_u64)
                    .map(|total| total as u32),
            )
        });
        let model = value.get("model").and_then(Value::as_str).map(String::from);

        Ok(ChatResponse {
            content,
            model,
            usage,
            finish_reason,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LlmError;

    fn provider(params: ModelParameters) -> OpenAiProvider {
        OpenAiProvider::new(&ProviderConfig::new().with_api_key("sk-test"), params)
    }

    #[test]
    fn request_carries_model_and_messages_only_when_bare() {
        let provider = provider(ModelParameters::new("gpt-4o"));
        let body = provider
            .build_request(&[ChatMessage::user("hello")])
            .unwrap();
        let value: Value = serde_json::from_str(&body).unwrap();
        assert_eq!(value["model"], "gpt-4o");
        assert_eq!(value["messages"][0]["role"], "user");
        assert_eq!(value["messages"][0]["content"], "hello");
        assert!(value.get("max_tokens").is_none());
        assert!(value.get("temperature").is_none());
        assert!(value.get("stop").is_none());
    }

    #[test]
    fn optional_parameters_appear_when_set() {
        let provider = provider(
            ModelParameters::new("gpt-4o")
                .with_max_tokens(256)
                .with_temperature(0.5)
                .with_top_p(0.25)
                .with_stop(vec!["END".to_string()]),
        );
        let body = provider
            .build_request(&[ChatMessage::user("hello")])
            .unwrap();
        let value: Value = serde_json::from_str(&body).unwrap();
        assert_eq!(value["max_tokens"], 256);
        assert_eq!(value["temperature"], 0.5);
        assert_eq!(value["top_p"], 0.25);
        assert_eq!(value["stop"][0], "END");
    }

    #[test]
    fn empty_model_is_caught_before_building_the_body() {
        let provider = provider(ModelParameters::new(""));
        let err = provider
            .build_request(&[ChatMessage::user("hello")])
            .unwrap_err();
        assert!(matches!(err, LlmError::Config { .. }));
    }

    #[test]
    fn auth_header_is_bearer_when_a_key_exists() {
        let with_key = provider(ModelParameters::new("gpt-4o"));
        let header = with_key.auth_header().unwrap();
        assert_eq!(header.name, "Authorization");
        assert_eq!(header.value, "Bearer sk-test");

        let keyless = OpenAiProvider::new(&ProviderConfig::new(), ModelParameters::new("gpt-4o"));
        assert_eq!(keyless.auth_header(), None);
    }

    #[test]
    fn completion_response_is_normalized() {
        let provider = provider(ModelParameters::new("gpt-4o"));
        let response = ApiResponse {
            status: 200,
            body: json!({
                "model": "gpt-4o-2024-11-20",
                "choices": [{
                    "message": {"role": "assistant", "content": "hi there"},
                    "finish_reason": "stop",
                }],
                "usage": {"prompt_tokens": 9, "completion_tokens": 3, "total_tokens": 12},
            })
            .to_string(),
        };

        let parsed = provider.parse_response(&response).unwrap();
        assert_eq!(parsed.content, "hi there");
        assert_eq!(parsed.model.as_deref(), Some("gpt-4o-2024-11-20"));
        assert_eq!(parsed.finish_reason.as_deref(), Some("stop"));
        let usage = parsed.usage.unwrap();
        assert_eq!(usage.prompt_tokens, 9);
        assert_eq!(usage.completion_tokens, 3);
        assert_eq!(usage.total_tokens, 12);
    }

    #[test]
    fn choiceless_response_is_a_provider_error() {
        let provider = provider(ModelParameters::new("gpt-4o"));
        let response = ApiResponse {
            status: 200,
            body: r#"{"object": "chat.completion", "choices": []}"#.to_string(),
        };
        let err = provider.parse_response(&response).unwrap_err();
        assert_eq!(err.status_code(), Some(200));
        assert!(err.message().contains("unexpected response body"));
    }

    #[test]
    fn non_json_response_is_a_provider_error() {
        let provider = provider(ModelParameters::new("gpt-4o"));
        let response = ApiResponse {
            status: 200,
            body: "<html>oops</html>".to_string(),
        };
        let err = provider.parse_response(&response).unwrap_err();
        assert_eq!(err.status_code(), Some(200));
        assert_eq!(err.body_excerpt(), Some("<html>oops</html>"));
    }
}
