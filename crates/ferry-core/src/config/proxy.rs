//! Explicit proxy overrides sourced from the process environment.

use serde::{Deserialize, Serialize};
use tracing::warn;

/// Snapshot of the explicit proxy override variables.
///
/// The four values are captured once, when the settings are constructed,
/// and the snapshot is what transport resolution consults afterwards. Host
/// and port come from separate variables and a pair only takes effect when
/// both halves are usable. Ports are kept as raw strings here so that a
/// malformed value can be skipped at resolution time instead of failing
/// construction.
///
/// `https` and `http` pairs are independent; the HTTPS pair is preferred
/// when both are present since the provider endpoints this crate talks to
/// are all HTTPS.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProxySettings {
    /// Value of `FERRY_HTTPS_PROXY_HOST`, if set and non-empty.
    pub https_proxy_host: Option<String>,
    /// Value of `FERRY_HTTPS_PROXY_PORT`, if set and non-empty.
    pub https_proxy_port: Option<String>,
    /// Value of `FERRY_HTTP_PROXY_HOST`, if set and non-empty.
    pub http_proxy_host: Option<String>,
    /// Value of `FERRY_HTTP_PROXY_PORT`, if set and non-empty.
    pub http_proxy_port: Option<String>,
}

impl ProxySettings {
    /// Environment variable naming the HTTPS proxy host.
    pub const HTTPS_PROXY_HOST_VAR: &'static str = "FERRY_HTTPS_PROXY_HOST";
    /// Environment variable naming the HTTPS proxy port.
    pub const HTTPS_PROXY_PORT_VAR: &'static str = "FERRY_HTTPS_PROXY_PORT";
    /// Environment variable naming the HTTP proxy host.
    pub const HTTP_PROXY_HOST_VAR: &'static str = "FERRY_HTTP_PROXY_HOST";
    /// Environment variable naming the HTTP proxy port.
    pub const HTTP_PROXY_PORT_VAR: &'static str = "FERRY_HTTP_PROXY_PORT";

    /// Capture the override variables from the current environment.
    ///
    /// Later changes to the environment do not affect the returned
    /// snapshot. Ambient `HTTP_PROXY`/`HTTPS_PROXY` variables are ignored
    /// on purpose; only the `FERRY_*` pairs participate.
    pub fn from_env() -> Self {
        Self {
            https_proxy_host: read_var(Self::HTTPS_PROXY_HOST_VAR),
            https_proxy_port: read_var(Self::HTTPS_PROXY_PORT_VAR),
            http_proxy_host: read_var(Self::HTTP_PROXY_HOST_VAR),
            http_proxy_port: read_var(Self::HTTP_PROXY_PORT_VAR),
        }
    }

    /// The explicit proxy endpoint, if a complete and usable pair is set.
    ///
    /// The HTTPS pair is checked first, then the HTTP pair. A pair with a
    /// blank host, a port that does not parse as a number, or a zero port
    /// is logged and skipped; it never raises an error.
    pub fn explicit_override(&self) -> Option<(String, u16)> {
        pair_override("https", &self.https_proxy_host, &self.https_proxy_port)
            .or_else(|| pair_override("http", &self.http_proxy_host, &self.http_proxy_port))
    }
}

fn read_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|value| !value.trim().is_empty())
}

fn pair_override(
    label: &str,
    host: &Option<String>,
    port: &Option<String>,
) -> Option<(String, u16)> {
    let host = host.as_deref().map(str::trim).filter(|h| !h.is_empty())?;
    let raw_port = port.as_deref().map(str::trim).filter(|p| !p.is_empty())?;
    match raw_port.parse::<u16>() {
        Ok(port) if port > 0 => Some((host.to_string(), port)),
        _ => {
            warn!(
                "ignoring {} proxy override for host {}: unusable port {:?}",
                label, host, raw_port
            );
            None
        }
    }
}
