//! HNS endpoint lifecycle
//!
//! Endpoints are created for the infra container (or for an HCN namespace)
//! and attached with whichever generation of the API the request implies.
//! App containers only hot-attach to, and detach from, the infra container's
//! endpoint. A failed attach deletes the endpoint that was just created.

use crate::error::{Error, Result};
use crate::hns::{policy, HnsClient, HnsEndpointSpec};
use crate::network::{
    naming, state::State, AttachMode, BridgeBuilder, Endpoint, EndpointLifecycle, MacAddress,
    NamespaceRef, Network,
};
use ipnet::IpNet;
use tracing::{debug, error, info, instrument, warn};

impl<C: HnsClient> BridgeBuilder<C> {
    /// Create and attach the endpoint for `ep`, or resolve the existing one
    ///
    /// Returns the endpoint's MAC address.
    #[instrument(skip(self, nw, ep), fields(network = %nw.name, container_id = %ep.container_id))]
    pub fn find_or_create_endpoint(&self, nw: &Network, ep: &Endpoint) -> Result<MacAddress> {
        let address = ep.single_ipv4_address()?;

        let ns = NamespaceRef::classify(&ep.netns_name, &ep.container_id);
        let endpoint_name = naming::endpoint_name(ep, &ns.identifier);
        let mut lifecycle =
            EndpointLifecycle::new(&endpoint_name, AttachMode::for_namespace(ns.ns_type));

        if let Some(existing) = self.client.endpoint_by_name(&endpoint_name)? {
            info!(name = %endpoint_name, id = %existing.id, "Found existing HNS endpoint");
            lifecycle.adopted(&existing.id)?;
            let mac = endpoint_mac(&endpoint_name, &existing.mac_address)?;

            if ns.owns_endpoint() {
                // Duplicate create call; the endpoint was attached by an earlier one.
                info!(
                    name = %endpoint_name,
                    container_id = %ep.container_id,
                    "HNS endpoint is already attached"
                );
            } else {
                self.hot_attach(&existing.id, &ep.container_id)?;
            }

            return Ok(mac);
        }

        if !ns.owns_endpoint() {
            error!(
                name = %endpoint_name,
                container_id = %ep.container_id,
                "Failed to find endpoint shared by container"
            );
            return Err(Error::EndpointNotFound(endpoint_name));
        }

        let spec = Self::endpoint_spec(nw, &endpoint_name, address)?;
        let request = serde_json::to_string(&spec)?;
        debug!(%request, "Creating HNS endpoint");

        let created = self.client.create_endpoint(&spec).inspect_err(|e| {
            error!(name = %endpoint_name, error = %e, "Failed to create HNS endpoint");
        })?;
        info!(name = %endpoint_name, id = %created.id, "Created HNS endpoint");
        lifecycle.created(&created.id)?;

        // A MAC that cannot be reported back fails the create like an attach error.
        let attached = endpoint_mac(&endpoint_name, &created.mac_address).and_then(|mac| {
            let joined = match lifecycle.mode {
                AttachMode::Namespace => self.add_to_namespace(&created.id, &ns.identifier),
                AttachMode::HotAttach => self.hot_attach(&created.id, &ep.container_id),
            };
            joined.map(|()| mac)
        });

        match attached {
            Ok(mac) => {
                lifecycle.attached()?;
                Ok(mac)
            }
            Err(err) => {
                self.rollback(&mut lifecycle);
                Err(err)
            }
        }
    }

    /// Detach the endpoint for `ep` and delete it if this request owns it
    #[instrument(skip(self, nw, ep), fields(network = %nw.name, container_id = %ep.container_id))]
    pub fn delete_endpoint(&self, nw: &Network, ep: &Endpoint) -> Result<()> {
        let ns = NamespaceRef::classify(&ep.netns_name, &ep.container_id);
        let endpoint_name = naming::endpoint_name(ep, &ns.identifier);

        let existing = self
            .client
            .endpoint_by_name(&endpoint_name)?
            .ok_or_else(|| Error::EndpointNotFound(endpoint_name.clone()))?;
        let mut lifecycle =
            EndpointLifecycle::new(&endpoint_name, AttachMode::for_namespace(ns.ns_type));
        lifecycle.adopted(&existing.id)?;

        info!(id = %existing.id, container_id = %ep.container_id, "Detaching HNS endpoint from container netns");
        match lifecycle.mode {
            AttachMode::Namespace => {
                // Namespace and endpoint are 1:1, so the endpoint can be deleted
                // even if it could not be removed from the namespace.
                if let Err(e) = self
                    .client
                    .remove_namespace_endpoint(&ns.identifier, &existing.id)
                {
                    warn!(id = %existing.id, namespace = %ns.identifier, error = %e, "Failed to detach endpoint, ignoring");
                }
            }
            AttachMode::HotAttach => {
                match self.client.hot_detach_endpoint(&ep.container_id, &existing.id) {
                    Ok(()) => {}
                    Err(Error::ComputeSystemNotFound(_)) => {
                        debug!(container_id = %ep.container_id, "Container is already gone");
                    }
                    Err(e) => {
                        error!(id = %existing.id, error = %e, "Failed to detach HNS endpoint");
                        return Err(e);
                    }
                }
            }
        }
        lifecycle.detached()?;

        if !ns.owns_endpoint() {
            // The endpoint belongs to the infra container.
            info!(name = %endpoint_name, "Keeping shared HNS endpoint");
            return Ok(());
        }

        info!(name = %endpoint_name, id = %existing.id, "Deleting HNS endpoint");
        self.client.delete_endpoint(&existing.id).inspect_err(|e| {
            error!(name = %endpoint_name, error = %e, "Failed to delete HNS endpoint");
        })?;
        lifecycle.deleted()
    }

    /// Build the HNS request for a new endpoint on `nw`
    fn endpoint_spec(nw: &Network, name: &str, address: IpNet) -> Result<HnsEndpointSpec> {
        let dns_servers: Vec<String> = nw.dns_servers.iter().map(|s| s.to_string()).collect();

        Ok(HnsEndpointSpec {
            name: name.to_string(),
            virtual_network_name: naming::network_name(nw),
            dns_suffix: nw.dns_suffix_search_list.join(","),
            dns_server_list: dns_servers.join(","),
            ip_address: address.addr(),
            prefix_length: address.prefix_len(),
            policies: policy::endpoint_policies(nw)?,
        })
    }

    /// Attach an endpoint to a container using HNS V1
    fn hot_attach(&self, endpoint_id: &str, container_id: &str) -> Result<()> {
        info!(id = %endpoint_id, container_id, "Attaching HNS endpoint to container");
        self.client
            .hot_attach_endpoint(container_id, endpoint_id)
            .inspect_err(|e| {
                // The container may have stopped or lost its netns in the meantime.
                error!(id = %endpoint_id, error = %e, "Failed to attach HNS endpoint");
            })
    }

    /// Add an endpoint to an HCN namespace unless it is already a member
    fn add_to_namespace(&self, endpoint_id: &str, namespace_id: &str) -> Result<()> {
        info!(id = %endpoint_id, namespace = %namespace_id, "Adding HNS endpoint to namespace");

        let members = self
            .client
            .namespace_endpoint_ids(namespace_id)
            .inspect_err(|e| {
                error!(namespace = %namespace_id, error = %e, "Failed to get endpoints from namespace");
            })?;
        if members.iter().any(|id| id == endpoint_id) {
            info!(id = %endpoint_id, namespace = %namespace_id, "HNS endpoint is already in namespace");
            return Ok(());
        }

        self.client
            .add_namespace_endpoint(namespace_id, endpoint_id)
            .inspect_err(|e| {
                error!(id = %endpoint_id, error = %e, "Failed to attach HNS endpoint");
            })
    }

    /// Delete an endpoint this call created but could not attach
    ///
    /// Failures are logged only; the caller reports the attach error.
    fn rollback(&self, lifecycle: &mut EndpointLifecycle) {
        if lifecycle.state() != State::Created {
            return;
        }
        let Some(id) = lifecycle.id.clone() else {
            return;
        };

        info!(name = %lifecycle.name, id = %id, "Deleting the failed HNS endpoint");
        match self.client.delete_endpoint(&id) {
            Ok(()) => {
                if let Err(e) = lifecycle.deleted() {
                    warn!(error = %e, "Endpoint lifecycle out of sync after rollback");
                }
            }
            Err(e) => error!(name = %lifecycle.name, error = %e, "Failed to delete HNS endpoint"),
        }
    }
}

/// Parse the MAC HNS reported for endpoint `name`
fn endpoint_mac(name: &str, value: &str) -> Result<MacAddress> {
    MacAddress::parse(value).map_err(|_| {
        error!(name, mac = value, "HNS endpoint has an invalid MAC address");
        Error::InvalidEndpointMac {
            endpoint: name.to_string(),
            value: value.to_string(),
        }
    })
}
