//! Network and endpoint descriptions handed in by the orchestrator

use crate::error::{Error, Result};
use crate::network::MacAddress;
use ipnet::IpNet;
use serde::Deserialize;
use std::net::IpAddr;

/// The host adapter backing a bridge network
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SharedEni {
    /// OS link name of the adapter (e.g., "Ethernet 2")
    pub link_name: String,
    /// Hardware address of the adapter
    pub mac_address: MacAddress,
}

impl SharedEni {
    pub fn new(link_name: impl Into<String>, mac_address: MacAddress) -> Self {
        Self {
            link_name: link_name.into(),
            mac_address,
        }
    }
}

/// A bridge network joining container endpoints to a shared ENI
#[derive(Debug, Clone, Deserialize)]
pub struct Network {
    /// Configured network name, used as the bridge name prefix
    pub name: String,

    /// Namespace the bridge should live in (must be empty on Windows)
    #[serde(default)]
    pub bridge_netns_path: Option<String>,

    /// Adapter the bridge is bound to
    pub shared_eni: SharedEni,

    /// Addresses assigned to the ENI, with their subnet prefix length
    #[serde(default)]
    pub eni_ip_addresses: Vec<IpNet>,

    /// Default gateway of the ENI subnet
    pub gateway_ip_address: IpAddr,

    /// CIDR blocks of the virtual network, when known
    #[serde(default)]
    pub vpc_cidrs: Option<Vec<IpNet>>,

    /// CIDR block of cluster service addresses
    #[serde(default)]
    pub service_cidr: Option<IpNet>,

    #[serde(default)]
    pub dns_suffix_search_list: Vec<String>,

    #[serde(default)]
    pub dns_servers: Vec<IpAddr>,
}

impl Network {
    /// Create a network with the required fields; the rest start empty
    pub fn new(
        name: impl Into<String>,
        shared_eni: SharedEni,
        eni_ip_address: IpNet,
        gateway_ip_address: IpAddr,
    ) -> Self {
        Self {
            name: name.into(),
            bridge_netns_path: None,
            shared_eni,
            eni_ip_addresses: vec![eni_ip_address],
            gateway_ip_address,
            vpc_cidrs: None,
            service_cidr: None,
            dns_suffix_search_list: Vec::new(),
            dns_servers: Vec::new(),
        }
    }

    pub fn with_vpc_cidrs(mut self, cidrs: Vec<IpNet>) -> Self {
        self.vpc_cidrs = Some(cidrs);
        self
    }

    pub fn with_service_cidr(mut self, cidr: IpNet) -> Self {
        self.service_cidr = Some(cidr);
        self
    }

    pub fn with_dns(mut self, suffixes: Vec<String>, servers: Vec<IpAddr>) -> Self {
        self.dns_suffix_search_list = suffixes;
        self.dns_servers = servers;
        self
    }

    pub fn with_bridge_netns_path(mut self, path: impl Into<String>) -> Self {
        self.bridge_netns_path = Some(path.into());
        self
    }

    /// Whether the bridge is requested outside the host namespace
    pub fn wants_foreign_bridge_netns(&self) -> bool {
        self.bridge_netns_path
            .as_deref()
            .is_some_and(|path| !path.is_empty())
    }

    /// Primary ENI address with its prefix length
    pub fn primary_eni_address(&self) -> Result<&IpNet> {
        self.eni_ip_addresses.first().ok_or_else(|| {
            Error::Validation(format!("Network '{}' has no ENI address", self.name))
        })
    }

    /// Subnet of the primary ENI address (e.g., 10.0.1.17/24 -> 10.0.1.0/24)
    pub fn eni_subnet(&self) -> Result<IpNet> {
        Ok(self.primary_eni_address()?.trunc())
    }
}

/// A container attachment point on a network
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    /// Container the endpoint is set up for
    pub container_id: String,
    /// Raw namespace reference: "", "none", "container:<id>" or a namespace id
    pub netns_name: String,
    /// Pre-allocated addresses, with their prefix length
    pub ip_addresses: Vec<IpNet>,
}

impl Endpoint {
    pub fn new(
        container_id: impl Into<String>,
        netns_name: impl Into<String>,
        ip_address: IpNet,
    ) -> Self {
        Self {
            container_id: container_id.into(),
            netns_name: netns_name.into(),
            ip_addresses: vec![ip_address],
        }
    }

    /// The single IPv4 address this endpoint may carry
    pub fn single_ipv4_address(&self) -> Result<IpNet> {
        match self.ip_addresses.as_slice() {
            [addr @ IpNet::V4(_)] => Ok(*addr),
            _ => Err(Error::Validation(format!(
                "Only a single IPv4 address per endpoint is supported on Windows (container {})",
                self.container_id
            ))),
        }
    }
}
