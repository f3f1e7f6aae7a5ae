//! Transport policy resolution.

use crate::config::ProxySettings;
use crate::net::host_proxy::{HostProxyService, ProxyKind};
use crate::net::policy::{TargetOrigin, TransportPolicy};
use std::sync::Arc;
use tracing::debug;

/// Decides how a target endpoint will be reached.
///
/// The search runs in a fixed order and stops at the first hit:
///
/// 1. An explicit override pair from [`ProxySettings`].
/// 2. A usable HTTP or HTTPS candidate from the host proxy service, when
///    one is present and enabled.
/// 3. Neither: connect direct.
///
/// Nothing in the search can fail. Misconfigured overrides and unusable
/// candidates are logged and skipped, never surfaced as errors, so a
/// broken proxy setup degrades to a direct connection instead of taking
/// the client down.
pub struct TransportResolver {
    settings: ProxySettings,
    host_proxy: Arc<dyn HostProxyService>,
}

impl TransportResolver {
    /// Create a resolver over a settings snapshot and a host service.
    pub fn new(settings: ProxySettings, host_proxy: Arc<dyn HostProxyService>) -> Self {
        Self {
            settings,
            host_proxy,
        }
    }

    /// Resolve the transport policy for one target endpoint.
    pub fn resolve(&self, target: &TargetOrigin) -> TransportPolicy {
        if let Some((host, port)) = self.settings.explicit_override() {
            debug!("using explicit proxy override {}:{} for {}", host, port, target);
            return TransportPolicy::Proxy { host, port };
        }

        if self.host_proxy.proxies_enabled() {
            for candidate in self.host_proxy.select_proxies(target) {
                if !matches!(candidate.kind, ProxyKind::Http | ProxyKind::Https) {
                    debug!(
                        "skipping {:?} proxy candidate {}:{} for {}",
                        candidate.kind, candidate.host, candidate.port, target
                    );
                    continue;
                }
                if candidate.host.trim().is_empty() || candidate.port == 0 {
                    debug!("skipping unusable proxy candidate for {}", target);
                    continue;
                }
                debug!(
                    "using host-selected proxy {}:{} for {}",
                    candidate.host, candidate.port, target
                );
                return TransportPolicy::Proxy {
                    host: candidate.host,
                    port: candidate.port,
                };
            }
        }

        debug!("no proxy configured for {}, connecting direct", target);
        TransportPolicy::Direct
    }
}
