//! Outbound client layer for LLM provider APIs.
//!
//! Three concerns, kept separate:
//!
//! - **Transport resolution** ([`net`]): decide once, at client
//!   construction, whether requests go direct or through a proxy. The
//!   decision comes from explicit configuration first, then an optional
//!   host proxy service, and falls back to an explicit direct connection
//!   that ignores ambient proxy variables. Resolution never fails.
//! - **Execution** ([`net::RequestExecutor`]): one authenticated JSON POST
//!   per call, no retries, no state between calls, cancellable at any
//!   point.
//! - **Providers** ([`llm::providers`]): vendor adapters behind one trait,
//!   so adding a backend never touches resolution or execution.
//!
//! Failures land in a single taxonomy ([`LlmError`]) that separates what
//! an operator can act on: unreachable endpoint, broken TLS, other wire
//! trouble, cancellation, or a provider rejection with its status and a
//! bounded body excerpt.

pub mod config;
pub mod error;
pub mod llm;
pub mod net;

pub use config::{ModelParameters, ProviderConfig, ProxySettings, TimeoutConfig};
pub use error::{LlmError, LlmResult};
pub use llm::providers::{AnthropicProvider, AuthHeader, OpenAiProvider, ProviderAdapter};
pub use llm::{
    ChatCompletion, ChatMessage, ChatResponse, LlmClient, LlmClientBuilder, MessageRole,
    TokenUsage,
};
pub use net::{
    HostProxyService, NoHostProxy, ProxyCandidate, ProxyKind, TargetOrigin, TransportPolicy,
    TransportResolver,
};
