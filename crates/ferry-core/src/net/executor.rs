//! Single-shot execution of authenticated JSON requests.

use crate::config::ProviderConfig;
use crate::error::{classify_api_error, classify_transport_error, redact_secrets, LlmError, LlmResult};
use crate::llm::providers::ProviderAdapter;
use crate::net::policy::TransportPolicy;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, CONTENT_TYPE};
use reqwest::Client;
use tokio_util::sync::CancellationToken;
use tracing::{debug, instrument, warn};

/// Raw outcome of a successful exchange: the status line and the body,
/// still unparsed.
#[derive(Debug, Clone)]
pub struct ApiResponse {
    /// HTTP status code, always in the 2xx range when returned by
    /// [`RequestExecutor::post_json`].
    pub status: u16,
    /// Response body as text.
    pub body: String,
}

/// Sends one authenticated JSON POST per call and classifies whatever
/// comes back.
///
/// The transport policy, the endpoint, and all deadlines are fixed at
/// construction; individual calls only contribute a path and a body. The
/// executor keeps no state between calls and never retries, so callers can
/// share one instance across tasks freely.
#[derive(Clone)]
pub struct RequestExecutor {
    http: Client,
    base_url: String,
    policy: TransportPolicy,
    cancel: CancellationToken,
}

impl RequestExecutor {
    /// Build an executor for one endpoint under one transport policy.
    ///
    /// A `Direct` policy explicitly disables proxying, so ambient
    /// `HTTP_PROXY`-style variables cannot leak in. A `Proxy` policy routes
    /// everything through the given endpoint.
    ///
    /// # Errors
    ///
    /// Returns [`LlmError::Config`] when the proxy endpoint cannot be
    /// expressed as a URL or the HTTP client cannot be constructed.
    pub fn new(
        base_url: impl Into<String>,
        policy: TransportPolicy,
        config: &ProviderConfig,
        cancel: CancellationToken,
    ) -> LlmResult<Self> {
        let base_url = base_url.into();
        let mut builder = Client::builder()
            .connect_timeout(config.timeouts.connect_timeout())
            .timeout(config.timeouts.request_timeout());

        builder = match policy.proxy_url() {
            None => builder.no_proxy(),
            Some(proxy_url) => {
                let proxy = reqwest::Proxy::all(proxy_url.as_str()).map_err(|err| {
                    LlmError::config(format!("unusable proxy endpoint {proxy_url}: {err}"))
                })?;
                builder.proxy(proxy)
            }
        };

        let mut default_headers = HeaderMap::new();
        for (name, value) in &config.headers {
            if let (Ok(header_name), Ok(header_value)) = (
                HeaderName::from_bytes(name.as_bytes()),
                HeaderValue::from_str(value),
            ) {
                default_headers.insert(header_name, header_value);
            } else {
                warn!("skipping malformed configured header {:?}", name);
            }
        }
        if !default_headers.is_empty() {
            builder = builder.default_headers(default_headers);
        }

        let http = builder
            .build()
            .map_err(|err| LlmError::config(format!("failed to build HTTP client: {err}")))?;

        debug!("http client ready for {} ({})", base_url, policy);
        Ok(Self {
            http,
            base_url,
            policy,
            cancel,
        })
    }

    /// The transport policy this executor was built with.
    pub fn policy(&self) -> &TransportPolicy {
        &self.policy
    }

    /// POST a prepared JSON body to `path` under the configured base URL.
    ///
    /// The body is sent exactly as given. The provider contributes its
    /// auth header and any extra headers its API requires. A 2xx response
    /// comes back as [`ApiResponse`]; everything else is classified into
    /// the error taxonomy.
    ///
    /// Cancellation is checked before the request leaves and raced against
    /// it while in flight. The cancellation token stays cancelled either
    /// way, so later calls on the same executor short-circuit.
    ///
    /// # Errors
    ///
    /// [`LlmError::Cancelled`] when the caller cancelled, a transport
    /// variant when the exchange broke on the wire, or [`LlmError::Api`]
    /// when the provider answered with a non-success status.
    #[instrument(skip(self, json_body, provider), fields(provider = %provider.name()))]
    pub async fn post_json(
        &self,
        path: &str,
        json_body: String,
        provider: &dyn ProviderAdapter,
    ) -> LlmResult<ApiResponse> {
        if self.cancel.is_cancelled() {
            return Err(LlmError::Cancelled);
        }

        let url = join_url(&self.base_url, path);
        let mut request = self
            .http
            .post(&url)
            .header(CONTENT_TYPE, "application/json")
            .body(json_body);
        if let Some(auth) = provider.auth_header() {
            request = request.header(auth.name, auth.value);
        }
        for (name, value) in provider.extra_headers() {
            request = request.header(name, value);
        }

        let send_and_read = async {
            let response = request
                .send()
                .await
                .map_err(|err| classify_transport_error(&url, &err))?;
            let status = response.status().as_u16();
            let body = response
                .text()
                .await
                .map_err(|err| classify_transport_error(&url, &err))?;
            Ok::<ApiResponse, LlmError>(ApiResponse { status, body })
        };

        let response = tokio::select! {
            _ = self.cancel.cancelled() => {
                warn!("request to {} cancelled by caller", url);
                return Err(LlmError::Cancelled);
            }
            outcome = send_and_read => outcome?,
        };

        if (200..300).contains(&response.status) {
            debug!("request to {} succeeded with status {}", url, response.status);
            return Ok(response);
        }

        // Scrub before vendor extraction so an extracted message can
        // never carry a credential the body echoed back.
        let scrubbed = redact_secrets(&response.body);
        let vendor_message = provider.extract_error_message(&scrubbed);
        let err = classify_api_error(provider.name(), response.status, &scrubbed, vendor_message);
        warn!("request to {} failed: {}", url, err);
        Err(err)
    }
}

fn join_url(base: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn join_url_normalizes_slashes() {
        assert_eq!(
            join_url("https://api.openai.com/v1", "chat/completions"),
            "https://api.openai.com/v1/chat/completions"
        );
        assert_eq!(
            join_url("https://api.openai.com/v1/", "/chat/completions"),
            "https://api.openai.com/v1/chat/completions"
        );
        assert_eq!(
            join_url("https://api.anthropic.com", "v1/messages"),
            "https://api.anthropic.com/v1/messages"
        );
    }

    #[test]
    fn direct_executor_builds() {
        let executor = RequestExecutor::new(
            "https://api.openai.com/v1",
            TransportPolicy::Direct,
            &ProviderConfig::new(),
            CancellationToken::new(),
        );
        assert!(executor.is_ok());
        assert_eq!(executor.unwrap().policy(), &TransportPolicy::Direct);
    }

    #[test]
    fn proxied_executor_builds() {
        let policy = TransportPolicy::Proxy {
            host: "proxy.corp.example".to_string(),
            port: 3128,
        };
        let executor = RequestExecutor::new(
            "https://api.openai.com/v1",
            policy.clone(),
            &ProviderConfig::new(),
            CancellationToken::new(),
        );
        assert!(executor.is_ok());
        assert_eq!(executor.unwrap().policy(), &policy);
    }

    #[test]
    fn malformed_configured_headers_are_tolerated() {
        let config = ProviderConfig::new()
            .with_header("x-good", "yes")
            .with_header("bad header\n", "nope");
        let executor = RequestExecutor::new(
            "https://api.openai.com/v1",
            TransportPolicy::Direct,
            &config,
            CancellationToken::new(),
        );
        assert!(executor.is_ok());
    }
}
