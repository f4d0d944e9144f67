//! Endpoint lifecycle state machine
//!
//! Tracks one endpoint through a single create or delete call using the
//! state-machines crate in dynamic dispatch mode. Nothing is persisted; every
//! call re-resolves the endpoint from HNS.

use crate::network::NamespaceType;
use state_machines::state_machine;

state_machine! {
    name: EndpointMachine,
    dynamic: true,
    initial: Absent,
    states: [Absent, Created, Attached, Detached, Deleted],
    events {
        create {
            transition: { from: Absent, to: Created }
        }
        adopt {
            transition: { from: Absent, to: Attached }
        }
        attach {
            transition: { from: Created, to: Attached }
        }
        detach {
            transition: { from: Attached, to: Detached }
        }
        delete {
            transition: { from: [Created, Detached], to: Deleted }
        }
    }
}

/// Simple state enum for external use
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    Absent,
    Created,
    Attached,
    Detached,
    Deleted,
}

impl State {
    fn from_name(s: &str) -> Self {
        match s {
            "Created" => State::Created,
            "Attached" => State::Attached,
            "Detached" => State::Detached,
            "Deleted" => State::Deleted,
            _ => State::Absent,
        }
    }
}

/// Attachment generation used to join an endpoint to its container
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttachMode {
    /// HNS V1 per-container hot attach
    HotAttach,
    /// HCN V2 namespace membership
    Namespace,
}

impl AttachMode {
    /// HCN namespaces take V2 membership; containers use V1 hot attach
    pub fn for_namespace(ns_type: NamespaceType) -> Self {
        match ns_type {
            NamespaceType::NamespaceHandle => AttachMode::Namespace,
            NamespaceType::Infra | NamespaceType::App => AttachMode::HotAttach,
        }
    }
}

/// Lifecycle of one HNS endpoint within a call
pub struct EndpointLifecycle {
    machine: DynamicEndpointMachine<()>,
    /// Deterministic endpoint name
    pub name: String,
    /// HNS endpoint id, once known
    pub id: Option<String>,
    /// How the endpoint is joined to, and detached from, its container
    pub mode: AttachMode,
}

impl EndpointLifecycle {
    pub fn new(name: impl Into<String>, mode: AttachMode) -> Self {
        Self {
            machine: EndpointMachine::new(()).into_dynamic(),
            name: name.into(),
            id: None,
            mode,
        }
    }

    /// Get current state as enum
    pub fn state(&self) -> State {
        State::from_name(self.machine.current_state())
    }

    /// Endpoint was just created by this call
    pub fn created(&mut self, id: impl Into<String>) -> crate::error::Result<()> {
        self.fire(EndpointMachineEvent::Create, "create")?;
        self.id = Some(id.into());
        Ok(())
    }

    /// Endpoint already existed and is assumed attached
    pub fn adopted(&mut self, id: impl Into<String>) -> crate::error::Result<()> {
        self.fire(EndpointMachineEvent::Adopt, "adopt")?;
        self.id = Some(id.into());
        Ok(())
    }

    pub fn attached(&mut self) -> crate::error::Result<()> {
        self.fire(EndpointMachineEvent::Attach, "attach")
    }

    pub fn detached(&mut self) -> crate::error::Result<()> {
        self.fire(EndpointMachineEvent::Detach, "detach")
    }

    pub fn deleted(&mut self) -> crate::error::Result<()> {
        self.fire(EndpointMachineEvent::Delete, "delete")
    }

    fn fire(&mut self, event: EndpointMachineEvent, label: &str) -> crate::error::Result<()> {
        let state = self.machine.current_state().to_string();
        self.machine
            .handle(event)
            .map_err(|_| crate::error::Error::InvalidTransition {
                endpoint: self.name.clone(),
                event: label.to_string(),
                state,
            })
    }
}
