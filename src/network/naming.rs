//! Deterministic HNS object names
//!
//! Retried or duplicate invocations must converge on the same objects, so
//! names are derived only from their inputs.

use crate::network::{Endpoint, Network};

/// Generate the HNS network name (e.g., "vpcbr025a3b4c5d6e")
pub fn network_name(nw: &Network) -> String {
    format!("{}br{}", nw.name, nw.shared_eni.mac_address.to_hex())
}

/// Generate the HNS endpoint name
///
/// Uses the namespace identifier, falling back to the container id.
pub fn endpoint_name(ep: &Endpoint, identifier: &str) -> String {
    let id = if identifier.is_empty() {
        ep.container_id.as_str()
    } else {
        identifier
    };
    format!("cid-{}", id)
}
