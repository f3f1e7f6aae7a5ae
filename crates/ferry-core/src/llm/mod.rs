//! Chat client, message types, and provider backends.

pub mod client;
pub mod messages;
pub mod providers;


pub use client::{ChatCompletion, LlmClient, LlmClientBuilder};
pub use messages::{ChatMessage, ChatResponse, MessageRole, TokenUsage};
