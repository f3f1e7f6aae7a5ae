//! Chat message and response types shared by all providers.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Who authored a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    /// Instructions that frame the conversation.
    System,
    /// The human side of the conversation.
    User,
    /// The model side of the conversation.
    Assistant,
}

impl fmt::Display for MessageRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::System => write!(f, "system"),
            Self::User => write!(f, "user"),
            Self::Assistant => write!(f, "assistant"),
        }
    }
}

/// One turn of a conversation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Author of this turn.
    pub role: MessageRole,
    /// Text content of this turn.
    pub content: String,
}

impl ChatMessage {
    /// Create a system message.
    pub fn system<S: Into<String>>(content: S) -> Self {
        Self {
            role: MessageRole::System,
            content: content.into(),
        }
    }

    /// Create a user message.
    pub fn user<S: Into<String>>(content: S) -> Self {
        Self {
            role: MessageRole::User,
            content: content.into(),
        }
    }

    /// Create an assistant message.
    pub fn assistant<S: Into<String>>(content: S) -> Self {
        Self {
            role: MessageRole::Assistant,
            content: content.into(),
        }
    }
}

/// Token accounting reported by the provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenUsage {
    /// Tokens consumed by the prompt.
    pub prompt_tokens: u32,
    /// Tokens generated in the completion.
    pub completion_tokens: u32,
    /// Total tokens billed for the exchange.
    pub total_tokens: u32,
}

impl TokenUsage {
    /// Build a usage record. Providers that do not report a total get one
    /// derived from the two parts.
    pub fn new(prompt_tokens: u32, completion_tokens: u32, total_tokens: Option<u32>) -> Self {
        Self {
            prompt_tokens,
            completion_tokens,
            total_tokens: total_tokens.unwrap_or(prompt_tokens + completion_tokens),
        }
    }
}

/// A provider's answer, normalized across vendors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatResponse {
    /// Generated text.
    pub content: String,
    /// Model that actually served the request, when reported.
    pub model: Option<String>,
    /// Token accounting, when reported.
    pub usage: Option<TokenUsage>,
    /// Why generation stopped, in the provider's own vocabulary.
    pub finish_reason: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roles_serialize_lowercase() {
        let message = ChatMessage::user("hello");
        let json = serde_json::to_value(&message).unwrap();
        assert_eq!(json["role"], "user");
        assert_eq!(MessageRole::System.to_string(), "system");
        assert_eq!(MessageRole::Assistant.to_string(), "assistant");
    }

    #[test]
    fn constructors_set_role_and_content() {
        assert_eq!(ChatMessage::system("rules").role, MessageRole::System);
        assert_eq!(ChatMessage::assistant("hi").content, "hi");
    }

    #[test]
    fn missing_total_is_derived() {
        let usage = TokenUsage::new(10, 32, None);
        assert_eq!(usage.total_tokens, 42);
    }

    #[test]
    fn reported_total_is_kept() {
        let usage = TokenUsage::new(10, 32, Some(45));
        assert_eq!(usage.total_tokens, 45);
    }
}
