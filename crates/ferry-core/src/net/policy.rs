//! The transport decision and the endpoint it is made for.

use serde::{Deserialize, Serialize};
use std::fmt;

/// How outbound requests reach the provider.
///
/// Resolution always lands on one of these two shapes. `Direct` is not a
/// "no decision" placeholder; it actively disables any proxying the
/// process environment might otherwise inject.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransportPolicy {
    /// Connect straight to the endpoint, ignoring ambient proxy variables.
    Direct,
    /// Route every request through `host:port`.
    Proxy {
        /// Proxy hostname or address.
        host: String,
        /// Proxy port, always non-zero.
        port: u16,
    },
}

impl TransportPolicy {
    /// The proxy endpoint as a URL, or `None` for direct connections.
    pub fn proxy_url(&self) -> Option<String> {
        match self {
            Self::Direct => None,
            Self::Proxy { host, port } => Some(format!("http://{host}:{port}")),
        }
    }
}

impl fmt::Display for TransportPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Direct => write!(f, "direct"),
            Self::Proxy { host, port } => write!(f, "proxy {host}:{port}"),
        }
    }
}

/// Scheme and host of the endpoint a policy is being resolved for.
///
/// Host proxy services pick proxies per destination, so resolution hands
/// them this instead of the full URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetOrigin {
    /// URL scheme, `https` for every built-in provider.
    pub scheme: String,
    /// Hostname of the endpoint.
    pub host: String,
}

impl TargetOrigin {
    /// Build an origin from its parts.
    pub fn new(scheme: impl Into<String>, host: impl Into<String>) -> Self {
        Self {
            scheme: scheme.into(),
            host: host.into(),
        }
    }

    /// Extract the origin of a parsed URL. `None` when the URL has no
    /// host, as with `file:` or `data:` schemes.
    pub fn from_url(url: &reqwest::Url) -> Option<Self> {
        let host = url.host_str()?;
        Some(Self::new(url.scheme(), host))
    }
}

impl fmt::Display for TargetOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}://{}", self.scheme, self.host)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn direct_policy_has_no_proxy_url() {
        assert_eq!(TransportPolicy::Direct.proxy_url(), None);
        assert_eq!(TransportPolicy::Direct.to_string(), "direct");
    }

    #[test]
    fn proxy_policy_formats_an_http_url() {
        let policy = TransportPolicy::Proxy {
            host: "proxy.corp.example".to_string(),
            port: 8443,
        };
        assert_eq!(
            policy.proxy_url().as_deref(),
            Some("http://proxy.corp.example:8443")
        );
        assert_eq!(policy.to_string(), "proxy proxy.corp.example:8443");
    }

    #[test]
    fn origin_comes_from_url_scheme_and_host() {
        let url = reqwest::Url::parse("https://api.openai.com/v1/chat/completions").unwrap();
        let origin = TargetOrigin::from_url(&url).unwrap();
        assert_eq!(origin.scheme, "https");
        assert_eq!(origin.host, "api.openai.com");
        assert_eq!(origin.to_string(), "https://api.openai.com");
    }

    #[test]
    fn hostless_urls_have_no_origin() {
        let url = reqwest::Url::parse("data:text/plain,hello").unwrap();
        assert_eq!(TargetOrigin::from_url(&url), None);
    }
}
