//! Integration point for host-level proxy services.
//!
//! Some platforms run a local service that knows, per destination, which
//! proxy outbound traffic should use. This module defines the seam that
//! lets such a service participate in transport resolution without the
//! rest of the crate knowing whether one exists.

use crate::net::policy::TargetOrigin;

/// Protocol a proxy candidate speaks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProxyKind {
    /// Plain HTTP proxying.
    Http,
    /// HTTP proxying with CONNECT for TLS targets.
    Https,
    /// SOCKS proxying. Reported by some host services but not usable by
    /// this client, so resolution skips these.
    Socks,
}

/// One proxy suggestion from the host service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProxyCandidate {
    /// Protocol the proxy speaks.
    pub kind: ProxyKind,
    /// Proxy hostname or address.
    pub host: String,
    /// Proxy port.
    pub port: u16,
}

impl ProxyCandidate {
    /// Build a candidate from its parts.
    pub fn new(kind: ProxyKind, host: impl Into<String>, port: u16) -> Self {
        Self {
            kind,
            host: host.into(),
            port,
        }
    }
}

/// A host service that suggests proxies for outbound destinations.
///
/// Both methods answer from whatever state the service already holds;
/// neither can fail. A service that is not running, not configured, or
/// simply has no opinion expresses that by returning `false` or an empty
/// list, and resolution treats all of those the same way: connect direct.
#[cfg_attr(test, mockall::automock)]
pub trait HostProxyService: Send + Sync {
    /// Whether the service exists and has proxying switched on at all.
    /// When this returns `false`, [`select_proxies`] is never called.
    ///
    /// [`select_proxies`]: HostProxyService::select_proxies
    fn proxies_enabled(&self) -> bool;

    /// Proxy candidates for the given destination, best first. May be
    /// empty.
    fn select_proxies(&self, target: &TargetOrigin) -> Vec<ProxyCandidate>;
}

/// The host service to use when there is none.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoHostProxy;

impl HostProxyService for NoHostProxy {
    fn proxies_enabled(&self) -> bool {
        false
    }

    fn select_proxies(&self, _target: &TargetOrigin) -> Vec<ProxyCandidate> {
        Vec::new()
    }
}
