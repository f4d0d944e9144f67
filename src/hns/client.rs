//! Host Networking Service client surface
//!
//! The transport to HNS/HCN lives outside this crate; the builder talks to it
//! through [`HnsClient`] using the request and record shapes below. Field
//! names follow the HNS V1 JSON schema.

use crate::error::Result;
use crate::hns::{HnsVersion, Policy};
use serde::{Deserialize, Serialize};
use std::net::IpAddr;

/// HNS network type used for bridging containers to an ENI
pub const HNS_L2_BRIDGE: &str = "l2bridge";

/// Host-wide HNS settings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct HnsGlobals {
    #[serde(rename = "Version")]
    pub version: HnsVersion,
}

/// Subnet of an HNS network
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct HnsSubnet {
    pub address_prefix: String,
    pub gateway_address: String,
}

/// Request body for creating an HNS network
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct HnsNetworkSpec {
    pub name: String,
    #[serde(rename = "Type")]
    pub network_type: String,
    pub network_adapter_name: String,
    pub subnets: Vec<HnsSubnet>,
}

/// Request body for creating an HNS endpoint
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HnsEndpointSpec {
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "VirtualNetworkName")]
    pub virtual_network_name: String,
    #[serde(rename = "DNSSuffix", skip_serializing_if = "String::is_empty")]
    pub dns_suffix: String,
    #[serde(rename = "DNSServerList", skip_serializing_if = "String::is_empty")]
    pub dns_server_list: String,
    #[serde(rename = "IPAddress")]
    pub ip_address: IpAddr,
    #[serde(rename = "PrefixLength")]
    pub prefix_length: u8,
    #[serde(rename = "Policies", skip_serializing_if = "Vec::is_empty")]
    pub policies: Vec<Policy>,
}

/// HNS network as reported by the service
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct HnsNetwork {
    pub id: String,
    pub name: String,
}

/// HNS endpoint as reported by the service
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct HnsEndpoint {
    pub id: String,
    pub name: String,
    pub virtual_network_name: String,
    pub mac_address: String,
}

/// Request/response client for the Host Networking Service
///
/// Lookups return `Ok(None)` when no object has the given name.
/// `hot_detach_endpoint` reports a container that no longer exists as
/// [`crate::Error::ComputeSystemNotFound`].
pub trait HnsClient {
    fn globals(&self) -> Result<HnsGlobals>;

    fn create_network(&self, spec: &HnsNetworkSpec) -> Result<HnsNetwork>;
    fn network_by_name(&self, name: &str) -> Result<Option<HnsNetwork>>;
    fn delete_network(&self, id: &str) -> Result<()>;

    fn create_endpoint(&self, spec: &HnsEndpointSpec) -> Result<HnsEndpoint>;
    fn endpoint_by_name(&self, name: &str) -> Result<Option<HnsEndpoint>>;
    fn delete_endpoint(&self, id: &str) -> Result<()>;

    /// HNS V1: attach an endpoint to a running container
    fn hot_attach_endpoint(&self, container_id: &str, endpoint_id: &str) -> Result<()>;
    /// HNS V1: detach an endpoint from a container
    fn hot_detach_endpoint(&self, container_id: &str, endpoint_id: &str) -> Result<()>;

    /// HCN V2: add an endpoint to a namespace
    fn add_namespace_endpoint(&self, namespace_id: &str, endpoint_id: &str) -> Result<()>;
    /// HCN V2: remove an endpoint from a namespace
    fn remove_namespace_endpoint(&self, namespace_id: &str, endpoint_id: &str) -> Result<()>;
    /// HCN V2: ids of endpoints in a namespace
    fn namespace_endpoint_ids(&self, namespace_id: &str) -> Result<Vec<String>>;
}
