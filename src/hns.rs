//! Host Networking Service (HNS) surface
//!
//! Provides:
//! - Client trait for the HNS/HCN request-response API
//! - Request and record shapes
//! - Endpoint policy composition (SNAT, routes)
//! - Version gating

pub mod client;
#[cfg(test)]
pub mod mock;
pub mod policy;
pub mod version;

pub use client::{
    HnsClient, HnsEndpoint, HnsEndpointSpec, HnsGlobals, HnsNetwork, HnsNetworkSpec, HnsSubnet,
    HNS_L2_BRIDGE,
};
pub use policy::Policy;
pub use version::{check_version, HnsVersion};
