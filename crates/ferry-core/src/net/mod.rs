//! Transport: policy resolution, host proxy integration, and request
//! execution.

pub mod executor;
pub mod host_proxy;
pub mod policy;
pub mod resolver;


pub use executor::{ApiResponse, RequestExecutor};
pub use host_proxy::{HostProxyService, NoHostProxy, ProxyCandidate, ProxyKind};
pub use policy::{TargetOrigin, TransportPolicy};
pub use resolver::TransportResolver;
