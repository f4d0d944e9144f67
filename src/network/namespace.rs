//! Namespace classification for endpoint requests
//!
//! Orchestrators group containers into pods or tasks around an infrastructure
//! (pause) container that owns the network namespace. Older Windows and
//! Kubernetes releases invoke the plugin once per container and expect the
//! shared endpoint to be hot-attached to each of them; newer ones hand over an
//! HCN namespace id and invoke the plugin once.

use tracing::debug;

/// Prefix marking a container that shares another container's namespace
const CONTAINER_PREFIX: &str = "container:";

/// How an endpoint request relates to its network namespace
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NamespaceType {
    /// First container of a group; owns the endpoint
    Infra,
    /// Workload container sharing the endpoint of an infra container
    App,
    /// Externally created HCN namespace
    NamespaceHandle,
}

/// Classified namespace reference
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamespaceRef {
    pub ns_type: NamespaceType,
    /// Infra container id, shared container id, or HCN namespace id
    pub identifier: String,
}

impl NamespaceRef {
    /// Classify a raw namespace reference for the given container
    pub fn classify(netns_name: &str, container_id: &str) -> Self {
        if netns_name.is_empty() || netns_name == "none" {
            return Self {
                ns_type: NamespaceType::Infra,
                identifier: container_id.to_string(),
            };
        }

        if let Some(shared) = netns_name.strip_prefix(CONTAINER_PREFIX) {
            debug!(container_id, shared_with = shared, "Container shares netns of another container");
            return Self {
                ns_type: NamespaceType::App,
                identifier: shared.to_string(),
            };
        }

        debug!(container_id, namespace = netns_name, "Container is in HCN namespace");
        Self {
            ns_type: NamespaceType::NamespaceHandle,
            identifier: netns_name.to_string(),
        }
    }

    /// Whether this request owns the endpoint (creates and deletes it)
    pub fn owns_endpoint(&self) -> bool {
        self.ns_type != NamespaceType::App
    }
}
