//! [`HardwareRegistry`] – the set of interfaces a robot exposes.
//!
//! A simulated robot registers one interface per [`InterfaceKind`].  The
//! control framework discovers what is available with
//! [`HardwareRegistry::registered`] and then borrows the interface it needs to
//! bind a controller.

use std::collections::BTreeMap;

use jointsim_types::{CommandKind, InterfaceKind, SimError};
use tracing::warn;

use crate::interface::{JointCommandInterface, JointStateInterface};

/// Central registry of a robot's hardware interfaces.
///
/// Construct with [`HardwareRegistry::new`], register interfaces, then hand
/// out borrows to controllers.
#[derive(Debug, Default)]
pub struct HardwareRegistry {
    state: Option<JointStateInterface>,
    commands: BTreeMap<InterfaceKind, JointCommandInterface>,
}

impl HardwareRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the joint-state interface.  Any previously registered
    /// joint-state interface is replaced.
    pub fn register_state_interface(&mut self, interface: JointStateInterface) {
        if self.state.is_some() {
            warn!(interface = %InterfaceKind::JointState, "replacing registered interface");
        }
        self.state = Some(interface);
    }

    /// Register a command interface under the kind it exposes.  Any
    /// previously registered interface of the same kind is replaced.
    pub fn register_command_interface(&mut self, interface: JointCommandInterface) {
        let kind = interface.interface_kind();
        if self.commands.insert(kind, interface).is_some() {
            warn!(interface = %kind, "replacing registered interface");
        }
    }

    /// Kinds of every registered interface, joint state first.
    pub fn registered(&self) -> Vec<InterfaceKind> {
        self.state
            .as_ref()
            .map(|_| InterfaceKind::JointState)
            .into_iter()
            .chain(self.commands.keys().copied())
            .collect()
    }

    /// `true` when an interface of `kind` is registered.
    pub fn is_registered(&self, kind: InterfaceKind) -> bool {
        match kind {
            InterfaceKind::JointState => self.state.is_some(),
            _ => self.commands.contains_key(&kind),
        }
    }

    /// Borrow the joint-state interface.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::InterfaceNotRegistered`] when none was registered.
    pub fn state_interface(&self) -> Result<&JointStateInterface, SimError> {
        self.state
            .as_ref()
            .ok_or(SimError::InterfaceNotRegistered(InterfaceKind::JointState))
    }

    /// Borrow the command interface for `kind`.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::InterfaceNotRegistered`] when none was registered.
    pub fn command_interface(&self, kind: CommandKind) -> Result<&JointCommandInterface, SimError> {
        self.commands
            .get(&kind.interface())
            .ok_or(SimError::InterfaceNotRegistered(kind.interface()))
    }

    /// Mutably borrow the command interface for `kind`, e.g. to claim a
    /// handle.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::InterfaceNotRegistered`] when none was registered.
    pub fn command_interface_mut(
        &mut self,
        kind: CommandKind,
    ) -> Result<&mut JointCommandInterface, SimError> {
        self.commands
            .get_mut(&kind.interface())
            .ok_or(SimError::InterfaceNotRegistered(kind.interface()))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::interface::{JointBuffers, JointCommandHandle, JointStateHandle};

    fn state_interface(names: &[&str]) -> JointStateInterface {
        let mut js = JointStateInterface::new();
        for name in names {
            js.register_handle(JointStateHandle::new(
                *name,
                Arc::new(JointBuffers::new(0.0, 0.0)),
            ));
        }
        js
    }

    #[test]
    fn empty_registry_reports_nothing() {
        let registry = HardwareRegistry::new();
        assert!(registry.registered().is_empty());
        assert_eq!(
            registry.state_interface().unwrap_err(),
            SimError::InterfaceNotRegistered(InterfaceKind::JointState)
        );
        assert_eq!(
            registry.command_interface(CommandKind::Velocity).unwrap_err(),
            SimError::InterfaceNotRegistered(InterfaceKind::VelocityCommand)
        );
    }

    #[test]
    fn registered_lists_state_then_commands() {
        let mut registry = HardwareRegistry::new();
        registry.register_command_interface(JointCommandInterface::velocity());
        registry.register_command_interface(JointCommandInterface::effort());
        registry.register_state_interface(state_interface(&["joint1"]));

        assert_eq!(
            registry.registered(),
            vec![
                InterfaceKind::JointState,
                InterfaceKind::EffortCommand,
                InterfaceKind::VelocityCommand,
            ]
        );
        assert!(registry.is_registered(InterfaceKind::EffortCommand));
    }

    #[test]
    fn re_registering_replaces_interface() {
        let mut registry = HardwareRegistry::new();
        registry.register_state_interface(state_interface(&["joint1"]));
        registry.register_state_interface(state_interface(&["a", "b"]));
        assert_eq!(registry.state_interface().unwrap().names(), vec!["a", "b"]);
    }

    #[test]
    fn command_interface_mut_allows_claiming() {
        let js = state_interface(&["joint1"]);
        let mut ej = JointCommandInterface::effort();
        ej.register_handle(JointCommandHandle::new(
            js.handle("joint1").unwrap(),
            CommandKind::Effort,
        ))
        .unwrap();

        let mut registry = HardwareRegistry::new();
        registry.register_state_interface(js);
        registry.register_command_interface(ej);

        let handle = registry
            .command_interface_mut(CommandKind::Effort)
            .unwrap()
            .handle("joint1")
            .unwrap();
        handle.set_command(2.0);

        let ej = registry.command_interface(CommandKind::Effort).unwrap();
        assert_eq!(ej.claims(), ["joint1".to_string()]);
        assert_eq!(
            registry.state_interface().unwrap().handle("joint1").unwrap().snapshot().effort_command,
            2.0
        );
    }
}
