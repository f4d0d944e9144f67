//! Container network management on Windows
//!
//! Provides:
//! - Network and endpoint descriptions
//! - Namespace classification and deterministic naming
//! - Endpoint lifecycle tracking
//! - The HNS bridge builder (network and endpoint lifecycle)

pub mod bridge;
pub mod endpoint;
pub mod mac;
pub mod namespace;
pub mod naming;
pub mod state;
pub mod types;

pub use bridge::BridgeBuilder;
pub use mac::MacAddress;
pub use namespace::{NamespaceRef, NamespaceType};
pub use state::{AttachMode, EndpointLifecycle};
pub use types::{Endpoint, Network, SharedEni};
