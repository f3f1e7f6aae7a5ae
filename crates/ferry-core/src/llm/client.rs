//! The high-level chat client tying resolution, execution, and provider
//! adapters together.

use crate::config::{ProviderConfig, ProxySettings};
use crate::error::{LlmError, LlmResult};
use crate::llm::messages::{ChatMessage, ChatResponse};
use crate::llm::providers::ProviderAdapter;
use crate::net::executor::RequestExecutor;
use crate::net::host_proxy::{HostProxyService, NoHostProxy};
use crate::net::policy::{TargetOrigin, TransportPolicy};
use crate::net::resolver::TransportResolver;
use async_trait::async_trait;
use std::fmt;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, instrument};

/// Object-safe chat interface, for code that should not care which
/// concrete client sits behind it.
#[async_trait]
pub trait ChatCompletion: Send + Sync {
    /// Send a conversation and return the provider's answer.
    async fn chat(&self, messages: &[ChatMessage]) -> LlmResult<ChatResponse>;
}

/// A chat client bound to one provider and one resolved transport policy.
///
/// Construction does all the one-time work: the configuration is
/// validated, the transport policy is resolved for the provider's
/// endpoint, and the HTTP client is built with that policy baked in. After
/// that the client is immutable; [`chat`] calls only read shared state, so
/// cloning the client or wrapping it in an [`Arc`] and calling it from
/// many tasks at once is safe and cheap.
///
/// Each call sends exactly one request. There are no retries and no
/// response caching; a failure comes back as a classified [`LlmError`]
/// and it is the caller's decision what to do next.
///
/// # Examples
///
/// ```no_run
/// use ferry_core::{ChatMessage, LlmClient, ModelParameters, OpenAiProvider, ProviderConfig};
/// use std::sync::Arc;
///
/// # async fn run() -> ferry_core::LlmResult<()> {
/// let config = ProviderConfig::new().with_api_key_from_env("OPENAI_API_KEY");
/// let adapter = Arc::new(OpenAiProvider::new(&config, ModelParameters::new("gpt-4o")));
/// let client = LlmClient::new(adapter, config)?;
///
/// let reply = client.chat(&[ChatMessage::user("Say hello")]).await?;
/// println!("{}", reply.content);
/// # Ok(())
/// # }
/// ```
///
/// [`chat`]: LlmClient::chat
#[derive(Clone)]
pub struct LlmClient {
    adapter: Arc<dyn ProviderAdapter>,
    executor: RequestExecutor,
}

impl LlmClient {
    /// Build a client with proxy settings captured from the environment
    /// and no host proxy service.
    ///
    /// # Errors
    ///
    /// Returns [`LlmError::Config`] when the configuration or base URL is
    /// unusable. Transport resolution itself cannot fail.
    pub fn new(adapter: Arc<dyn ProviderAdapter>, config: ProviderConfig) -> LlmResult<Self> {
        Self::builder(adapter, config).build()
    }

    /// Start building a client with explicit control over proxy settings,
    /// the host proxy service, and cancellation.
    pub fn builder(adapter: Arc<dyn ProviderAdapter>, config: ProviderConfig) -> LlmClientBuilder {
        LlmClientBuilder {
            adapter,
            config,
            settings: None,
            host_proxy: Arc::new(NoHostProxy),
            cancel: CancellationToken::new(),
        }
    }

    /// Send a conversation to the provider and return its answer.
    ///
    /// The adapter serializes the conversation, the executor POSTs it
    /// under the resolved transport policy, and the adapter parses the
    /// response back into a [`ChatResponse`].
    ///
    /// # Errors
    ///
    /// Any [`LlmError`]: configuration problems caught before the request
    /// leaves, transport failures, cancellation, or a provider rejection.
    #[instrument(skip(self, messages), fields(provider = %self.adapter.name()))]
    pub async fn chat(&self, messages: &[ChatMessage]) -> LlmResult<ChatResponse> {
        let body = self.adapter.build_request(messages)?;
        let response = self
            .executor
            .post_json(self.adapter.request_path(), body, self.adapter.as_ref())
            .await?;
        let parsed = self.adapter.parse_response(&response)?;
        debug!(
            "chat completed: {} chars, finish reason {:?}",
            parsed.content.len(),
            parsed.finish_reason
        );
        Ok(parsed)
    }

    /// Name of the provider this client talks to.
    pub fn provider_name(&self) -> &'static str {
        self.adapter.name()
    }

    /// The transport policy resolved when this client was built.
    pub fn transport_policy(&self) -> &TransportPolicy {
        self.executor.policy()
    }
}

impl fmt::Debug for LlmClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LlmClient")
            .field("provider", &self.adapter.name())
            .field("policy", self.executor.policy())
            .finish()
    }
}

#[async_trait]
impl ChatCompletion for LlmClient {
    async fn chat(&self, messages: &[ChatMessage]) -> LlmResult<ChatResponse> {
        LlmClient::chat(self, messages).await
    }
}

/// Builder for [`LlmClient`].
pub struct LlmClientBuilder {
    adapter: Arc<dyn ProviderAdapter>,
    config: ProviderConfig,
    settings: Option<ProxySettings>,
    host_proxy: Arc<dyn HostProxyService>,
    cancel: CancellationToken,
}

impl LlmClientBuilder {
    /// Use this proxy settings snapshot instead of reading the
    /// environment.
    pub fn with_proxy_settings(mut self, settings: ProxySettings) -> Self {
        self.settings = Some(settings);
        self
    }

    /// Let a host proxy service participate in transport resolution.
    pub fn with_host_proxy(mut self, host_proxy: Arc<dyn HostProxyService>) -> Self {
        self.host_proxy = host_proxy;
        self
    }

    /// Cancel in-flight requests when this token fires.
    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    /// Validate the configuration, resolve the transport policy, and
    /// build the client.
    ///
    /// # Errors
    ///
    /// Returns [`LlmError::Config`] for broken timeouts, an unparseable
    /// base URL, or a base URL without a host.
    pub fn build(self) -> LlmResult<LlmClient> {
        self.config.validate()?;

        let base_url = self
            .config
            .base_url
            .clone()
            .unwrap_or_else(|| self.adapter.default_base_url().to_string());
        let url = reqwest::Url::parse(&base_url)
            .map_err(|err| LlmError::config(format!("invalid base URL '{base_url}': {err}")))?;
        let target = TargetOrigin::from_url(&url)
            .ok_or_else(|| LlmError::config(format!("base URL '{base_url}' has no host")))?;

        let settings = self.settings.unwrap_or_else(ProxySettings::from_env);
        let resolver = TransportResolver::new(settings, self.host_proxy);
        let policy = resolver.resolve(&target);
        debug!("resolved transport policy for {}: {}", target, policy);

        let executor = RequestExecutor::new(base_url, policy, &self.config, self.cancel)?;
        Ok(LlmClient {
            adapter: self.adapter,
            executor,
        })
    }
}
