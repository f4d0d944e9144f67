//! Shared ENI bridge builder
//!
//! Provisions and tears down HNS networks and endpoints that bridge Windows
//! containers to a host adapter (ENI). Calls are synchronous and idempotent:
//! every operation re-resolves state from HNS by deterministic name.

pub mod builder;
pub mod config;
pub mod error;
pub mod hns;
pub mod network;

pub use builder::{new_builder, NetworkBuilder};
pub use config::{BuilderConfig, BuilderKind, PluginConfig};
pub use error::{Error, Result};
pub use hns::{HnsClient, HnsVersion, Policy};
pub use network::{BridgeBuilder, Endpoint, MacAddress, Network, SharedEni};
