//! HNS bridge network management
//!
//! Provides:
//! - The bridge builder bound to an HNS client
//! - Creation and deletion of the l2bridge network backed by a shared ENI

use crate::config::BuilderConfig;
use crate::error::{Error, Result};
use crate::hns::{
    check_version, HnsClient, HnsNetworkSpec, HnsSubnet, HnsVersion, HNS_L2_BRIDGE,
};
use crate::network::{naming, Network};
use tracing::{debug, error, info, instrument};

/// Bridges containers to a shared ENI using HNS l2bridge networks
pub struct BridgeBuilder<C> {
    pub(crate) client: C,
    min_version: HnsVersion,
}

impl<C: HnsClient> BridgeBuilder<C> {
    /// Create a builder that requires at least `min_version` of HNS
    pub fn new(client: C, min_version: HnsVersion) -> Self {
        Self {
            client,
            min_version,
        }
    }

    pub fn from_config(client: C, config: &BuilderConfig) -> Self {
        Self::new(client, config.min_hns_version)
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    /// Create the HNS network for `nw` unless it already exists
    #[instrument(skip(self, nw), fields(network = %nw.name))]
    pub fn find_or_create_network(&self, nw: &Network) -> Result<()> {
        check_version(&self.client, &self.min_version)?;

        // HNS cannot create virtual switches outside the host compartment.
        if nw.wants_foreign_bridge_netns() {
            return Err(Error::Validation(format!(
                "Network '{}': bridge must be in the host network namespace on Windows, not '{}'",
                nw.name,
                nw.bridge_netns_path.as_deref().unwrap_or_default()
            )));
        }

        let subnet = nw.eni_subnet()?;
        let network_name = naming::network_name(nw);

        if let Some(existing) = self.client.network_by_name(&network_name)? {
            info!(name = %network_name, id = %existing.id, "Found existing HNS network");
            return Ok(());
        }

        let spec = HnsNetworkSpec {
            name: network_name.clone(),
            network_type: HNS_L2_BRIDGE.to_string(),
            network_adapter_name: nw.shared_eni.link_name.clone(),
            subnets: vec![HnsSubnet {
                address_prefix: subnet.to_string(),
                gateway_address: nw.gateway_ip_address.to_string(),
            }],
        };
        let request = serde_json::to_string(&spec)?;
        debug!(%request, "Creating HNS network");

        let created = self.client.create_network(&spec).inspect_err(|e| {
            error!(name = %network_name, error = %e, "Failed to create HNS network");
        })?;

        info!(name = %network_name, id = %created.id, "Created HNS network");
        Ok(())
    }

    /// Delete the HNS network for `nw`
    #[instrument(skip(self, nw), fields(network = %nw.name))]
    pub fn delete_network(&self, nw: &Network) -> Result<()> {
        let network_name = naming::network_name(nw);
        let network = self
            .client
            .network_by_name(&network_name)?
            .ok_or_else(|| Error::NetworkNotFound(network_name.clone()))?;

        info!(name = %network_name, id = %network.id, "Deleting HNS network");
        self.client.delete_network(&network.id).inspect_err(|e| {
            error!(name = %network_name, error = %e, "Failed to delete HNS network");
        })
    }
}
