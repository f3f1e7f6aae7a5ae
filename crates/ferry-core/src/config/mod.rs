//! Configuration types: provider settings, model parameters, proxy
//! overrides, and timeouts.

mod provider;
mod proxy;
mod timeouts;

pub use provider::{ModelParameters, ProviderConfig};
pub use proxy::ProxySettings;
pub use timeouts::TimeoutConfig;
