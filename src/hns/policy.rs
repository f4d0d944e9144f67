//! Endpoint traffic policies
//!
//! Endpoint traffic leaving the VPC is SNATed to the ENI primary address.
//! Traffic to service addresses and to the host itself is routed to the load
//! balancer in the host namespace instead.

use crate::error::{Error, Result};
use crate::network::Network;
use ipnet::IpNet;
use serde::Serialize;

/// HNS endpoint policy, tagged by its HNS `Type`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "Type")]
pub enum Policy {
    /// SNAT to the ENI primary address, except for the listed destinations
    #[serde(rename = "OutBoundNAT")]
    OutboundNat {
        #[serde(rename = "Exceptions", skip_serializing_if = "Vec::is_empty")]
        exceptions: Vec<IpNet>,
    },

    /// Route a destination prefix to the host (next hop is implicit)
    #[serde(rename = "ROUTE")]
    Route {
        #[serde(rename = "DestinationPrefix")]
        destination_prefix: IpNet,
        #[serde(rename = "NeedEncap")]
        need_encap: bool,
    },
}

impl Policy {
    pub fn route_to_host(destination_prefix: IpNet) -> Self {
        Policy::Route {
            destination_prefix,
            need_encap: true,
        }
    }
}

/// Destinations exempt from SNAT
///
/// The ENI subnet when VPC CIDRs are unknown, otherwise every VPC CIDR;
/// followed by the service CIDR if one is configured.
pub fn snat_exceptions(nw: &Network) -> Result<Vec<IpNet>> {
    let mut exceptions = match &nw.vpc_cidrs {
        None => vec![nw.eni_subnet()?],
        Some(cidrs) => cidrs.clone(),
    };

    if let Some(service_cidr) = nw.service_cidr {
        exceptions.push(service_cidr);
    }

    Ok(exceptions)
}

/// Build the ordered policy list for a new endpoint on `nw`
pub fn endpoint_policies(nw: &Network) -> Result<Vec<Policy>> {
    let mut policies = vec![Policy::OutboundNat {
        exceptions: snat_exceptions(nw)?,
    }];

    if let Some(service_cidr) = nw.service_cidr {
        let primary = nw.primary_eni_address()?;
        let host = IpNet::new(primary.addr(), primary.max_prefix_len())
            .map_err(|e| Error::Validation(format!("Invalid host route for {}: {}", primary, e)))?;

        policies.push(Policy::route_to_host(service_cidr));
        policies.push(Policy::route_to_host(host));
    }

    Ok(policies)
}
