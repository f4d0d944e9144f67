//! In-memory HNS for tests
//!
//! Simulates networks, endpoints, V1 attachments and HCN namespaces, with
//! switches to inject failures into individual calls.

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use crate::error::{Error, Result};
use crate::hns::{
    HnsClient, HnsEndpoint, HnsEndpointSpec, HnsGlobals, HnsNetwork, HnsNetworkSpec, HnsVersion,
};

#[derive(Default)]
struct MockState {
    version: HnsVersion,
    next_id: u32,
    networks: HashMap<String, HnsNetwork>,
    network_specs: HashMap<String, HnsNetworkSpec>,
    endpoints: HashMap<String, HnsEndpoint>,
    endpoint_specs: HashMap<String, HnsEndpointSpec>,
    attachments: HashSet<(String, String)>,
    namespaces: HashMap<String, Vec<String>>,
    gone_containers: HashSet<String>,
    fail_attach: bool,
    fail_detach: bool,
    fail_endpoint_delete: bool,
    fail_namespace_remove: bool,
    fail_network_delete: bool,
    bad_mac: bool,
    join_on_create: Option<String>,
    calls: Vec<String>,
}

impl MockState {
    fn allocate_id(&mut self, kind: &str) -> String {
        self.next_id += 1;
        format!("{}-{:04}", kind, self.next_id)
    }
}

/// Mock HNS backend for testing
pub struct MockHns {
    state: Mutex<MockState>,
}

impl MockHns {
    pub fn new() -> Self {
        Self::with_version(HnsVersion::new(9, 2))
    }

    pub fn with_version(version: HnsVersion) -> Self {
        Self {
            state: Mutex::new(MockState {
                version,
                ..Default::default()
            }),
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, MockState> {
        self.state.lock().unwrap()
    }

    pub fn fail_attach(&self, fail: bool) {
        self.lock().fail_attach = fail;
    }

    pub fn fail_detach(&self, fail: bool) {
        self.lock().fail_detach = fail;
    }

    pub fn fail_endpoint_delete(&self, fail: bool) {
        self.lock().fail_endpoint_delete = fail;
    }

    pub fn fail_namespace_remove(&self, fail: bool) {
        self.lock().fail_namespace_remove = fail;
    }

    pub fn fail_network_delete(&self, fail: bool) {
        self.lock().fail_network_delete = fail;
    }

    /// Report an unparseable MAC address for endpoints created from now on
    pub fn report_bad_mac(&self, bad: bool) {
        self.lock().bad_mac = bad;
    }

    /// Make new endpoints members of `namespace_id` as soon as they are created
    pub fn join_namespace_on_create(&self, namespace_id: &str) {
        self.lock().join_on_create = Some(namespace_id.to_string());
    }

    /// Mark a container as no longer existing
    pub fn remove_container(&self, container_id: &str) {
        self.lock().gone_containers.insert(container_id.to_string());
    }

    /// Create an empty HCN namespace
    pub fn add_namespace(&self, namespace_id: &str) {
        self.lock()
            .namespaces
            .insert(namespace_id.to_string(), Vec::new());
    }

    pub fn network_count(&self) -> usize {
        self.lock().networks.len()
    }

    pub fn network_spec(&self, name: &str) -> Option<HnsNetworkSpec> {
        self.lock().network_specs.get(name).cloned()
    }

    pub fn endpoint_count(&self) -> usize {
        self.lock().endpoints.len()
    }

    pub fn endpoint_spec(&self, name: &str) -> Option<HnsEndpointSpec> {
        self.lock().endpoint_specs.get(name).cloned()
    }

    pub fn endpoint_id(&self, name: &str) -> Option<String> {
        self.lock()
            .endpoints
            .values()
            .find(|ep| ep.name == name)
            .map(|ep| ep.id.clone())
    }

    pub fn is_attached(&self, container_id: &str, endpoint_id: &str) -> bool {
        self.lock()
            .attachments
            .contains(&(container_id.to_string(), endpoint_id.to_string()))
    }

    pub fn namespace_members(&self, namespace_id: &str) -> Vec<String> {
        self.lock()
            .namespaces
            .get(namespace_id)
            .cloned()
            .unwrap_or_default()
    }

    /// Names of the mutating calls received, in order
    pub fn calls(&self) -> Vec<String> {
        self.lock().calls.clone()
    }

    pub fn call_count(&self, call: &str) -> usize {
        self.lock().calls.iter().filter(|c| *c == call).count()
    }
}

impl Default for MockHns {
    fn default() -> Self {
        Self::new()
    }
}

impl HnsClient for MockHns {
    fn globals(&self) -> Result<HnsGlobals> {
        Ok(HnsGlobals {
            version: self.lock().version,
        })
    }

    fn create_network(&self, spec: &HnsNetworkSpec) -> Result<HnsNetwork> {
        let mut state = self.lock();
        state.calls.push("create_network".to_string());

        if state.networks.values().any(|nw| nw.name == spec.name) {
            return Err(Error::hns("create network", &spec.name, "network already exists"));
        }

        let id = state.allocate_id("nw");
        let network = HnsNetwork {
            id: id.clone(),
            name: spec.name.clone(),
        };
        state.networks.insert(id, network.clone());
        state.network_specs.insert(spec.name.clone(), spec.clone());
        Ok(network)
    }

    fn network_by_name(&self, name: &str) -> Result<Option<HnsNetwork>> {
        Ok(self
            .lock()
            .networks
            .values()
            .find(|nw| nw.name == name)
            .cloned())
    }

    fn delete_network(&self, id: &str) -> Result<()> {
        let mut state = self.lock();
        state.calls.push("delete_network".to_string());

        if state.fail_network_delete {
            return Err(Error::hns("delete network", id, "injected failure"));
        }

        let network = state
            .networks
            .remove(id)
            .ok_or_else(|| Error::hns("delete network", id, "network not found"))?;
        state.network_specs.remove(&network.name);
        Ok(())
    }

    fn create_endpoint(&self, spec: &HnsEndpointSpec) -> Result<HnsEndpoint> {
        let mut state = self.lock();
        state.calls.push("create_endpoint".to_string());

        if !state
            .networks
            .values()
            .any(|nw| nw.name == spec.virtual_network_name)
        {
            return Err(Error::hns(
                "create endpoint",
                &spec.name,
                format!("network {} not found", spec.virtual_network_name),
            ));
        }

        let id = state.allocate_id("ep");
        let mac_address = if state.bad_mac {
            String::new()
        } else {
            format!("00-15-5D-00-00-{:02X}", state.next_id % 256)
        };
        let endpoint = HnsEndpoint {
            id: id.clone(),
            name: spec.name.clone(),
            virtual_network_name: spec.virtual_network_name.clone(),
            mac_address,
        };
        if let Some(namespace_id) = state.join_on_create.clone() {
            state
                .namespaces
                .entry(namespace_id)
                .or_default()
                .push(id.clone());
        }
        state.endpoints.insert(id, endpoint.clone());
        state.endpoint_specs.insert(spec.name.clone(), spec.clone());
        Ok(endpoint)
    }

    fn endpoint_by_name(&self, name: &str) -> Result<Option<HnsEndpoint>> {
        Ok(self
            .lock()
            .endpoints
            .values()
            .find(|ep| ep.name == name)
            .cloned())
    }

    fn delete_endpoint(&self, id: &str) -> Result<()> {
        let mut state = self.lock();
        state.calls.push("delete_endpoint".to_string());

        if state.fail_endpoint_delete {
            return Err(Error::hns("delete endpoint", id, "injected failure"));
        }

        let endpoint = state
            .endpoints
            .remove(id)
            .ok_or_else(|| Error::hns("delete endpoint", id, "endpoint not found"))?;
        state.endpoint_specs.remove(&endpoint.name);
        state.attachments.retain(|(_, ep)| ep != id);
        for members in state.namespaces.values_mut() {
            members.retain(|ep| ep != id);
        }
        Ok(())
    }

    fn hot_attach_endpoint(&self, container_id: &str, endpoint_id: &str) -> Result<()> {
        let mut state = self.lock();
        state.calls.push("hot_attach_endpoint".to_string());

        if state.fail_attach || state.gone_containers.contains(container_id) {
            return Err(Error::hns("attach endpoint", endpoint_id, "container is not running"));
        }

        state
            .attachments
            .insert((container_id.to_string(), endpoint_id.to_string()));
        Ok(())
    }

    fn hot_detach_endpoint(&self, container_id: &str, endpoint_id: &str) -> Result<()> {
        let mut state = self.lock();
        state.calls.push("hot_detach_endpoint".to_string());

        if state.gone_containers.contains(container_id) {
            return Err(Error::ComputeSystemNotFound(container_id.to_string()));
        }
        if state.fail_detach {
            return Err(Error::hns("detach endpoint", endpoint_id, "injected failure"));
        }

        state
            .attachments
            .remove(&(container_id.to_string(), endpoint_id.to_string()));
        Ok(())
    }

    fn add_namespace_endpoint(&self, namespace_id: &str, endpoint_id: &str) -> Result<()> {
        let mut state = self.lock();
        state.calls.push("add_namespace_endpoint".to_string());

        if state.fail_attach {
            return Err(Error::hns("add namespace endpoint", namespace_id, "injected failure"));
        }

        let members = state
            .namespaces
            .get_mut(namespace_id)
            .ok_or_else(|| Error::hns("add namespace endpoint", namespace_id, "namespace not found"))?;
        members.push(endpoint_id.to_string());
        Ok(())
    }

    fn remove_namespace_endpoint(&self, namespace_id: &str, endpoint_id: &str) -> Result<()> {
        let mut state = self.lock();
        state.calls.push("remove_namespace_endpoint".to_string());

        if state.fail_namespace_remove {
            return Err(Error::hns(
                "remove namespace endpoint",
                namespace_id,
                "injected failure",
            ));
        }

        if let Some(members) = state.namespaces.get_mut(namespace_id) {
            members.retain(|ep| ep != endpoint_id);
        }
        Ok(())
    }

    fn namespace_endpoint_ids(&self, namespace_id: &str) -> Result<Vec<String>> {
        self.lock()
            .namespaces
            .get(namespace_id)
            .cloned()
            .ok_or_else(|| Error::hns("list namespace endpoints", namespace_id, "namespace not found"))
    }
}
