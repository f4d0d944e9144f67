//! Network builder capability
//!
//! The orchestrator drives every platform implementation through the same
//! four operations; the concrete builder is picked from configuration.

use crate::config::{BuilderConfig, BuilderKind};
use crate::error::Result;
use crate::hns::HnsClient;
use crate::network::{BridgeBuilder, Endpoint, MacAddress, Network};

/// Sets up and tears down container networking on a host
pub trait NetworkBuilder {
    /// Create the network unless it already exists
    fn find_or_create_network(&self, nw: &Network) -> Result<()>;

    fn delete_network(&self, nw: &Network) -> Result<()>;

    /// Create or resolve the endpoint for a container, returning its MAC address
    fn find_or_create_endpoint(&self, nw: &Network, ep: &Endpoint) -> Result<MacAddress>;

    fn delete_endpoint(&self, nw: &Network, ep: &Endpoint) -> Result<()>;
}

impl<C: HnsClient> NetworkBuilder for BridgeBuilder<C> {
    fn find_or_create_network(&self, nw: &Network) -> Result<()> {
        BridgeBuilder::find_or_create_network(self, nw)
    }

    fn delete_network(&self, nw: &Network) -> Result<()> {
        BridgeBuilder::delete_network(self, nw)
    }

    fn find_or_create_endpoint(&self, nw: &Network, ep: &Endpoint) -> Result<MacAddress> {
        BridgeBuilder::find_or_create_endpoint(self, nw, ep)
    }

    fn delete_endpoint(&self, nw: &Network, ep: &Endpoint) -> Result<()> {
        BridgeBuilder::delete_endpoint(self, nw, ep)
    }
}

/// Create the builder selected by `config`
pub fn new_builder<C>(config: &BuilderConfig, client: C) -> Box<dyn NetworkBuilder>
where
    C: HnsClient + 'static,
{
    match config.kind {
        BuilderKind::Bridge => Box::new(BridgeBuilder::from_config(client, config)),
    }
}
