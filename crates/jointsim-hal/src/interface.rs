//! Joint handles and the interfaces that expose them to controllers.
//!
//! A joint's five scalars live in one [`JointBuffers`] allocation owned
//! jointly (via `Arc`) by the adapter and every handle that refers to it.
//! The allocation never moves, so a handle obtained at startup stays valid
//! for the lifetime of the robot.
//!
//! Registration follows the usual hardware-interface order: every
//! [`JointStateHandle`] is registered first, and each [`JointCommandHandle`]
//! is built on top of a state handle fetched back from the
//! [`JointStateInterface`] with
//! [`JointCommandInterface::register_joint`].

use std::sync::Arc;

use jointsim_types::{CommandKind, InterfaceKind, JointSnapshot, SimError};
use tracing::warn;

use crate::scalar::SharedScalar;

/// Sensed state and pending commands for one joint.
#[derive(Debug, Default)]
pub struct JointBuffers {
    pub position: SharedScalar,
    pub velocity: SharedScalar,
    pub effort: SharedScalar,
    pub effort_command: SharedScalar,
    pub velocity_command: SharedScalar,
}

impl JointBuffers {
    /// Buffers with the given initial position and effort; velocity and both
    /// commands start at zero.
    pub fn new(position: f64, effort: f64) -> Self {
        Self {
            position: SharedScalar::new(position),
            effort: SharedScalar::new(effort),
            ..Self::default()
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Handles
// ─────────────────────────────────────────────────────────────────────────────

/// Read-only view of a joint's sensed position, velocity and effort.
#[derive(Debug, Clone)]
pub struct JointStateHandle {
    name: Arc<str>,
    buffers: Arc<JointBuffers>,
}

impl JointStateHandle {
    /// Handle named `name` over `buffers`.
    pub fn new(name: impl Into<Arc<str>>, buffers: Arc<JointBuffers>) -> Self {
        Self {
            name: name.into(),
            buffers,
        }
    }

    /// Joint name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Accumulated position in radians.
    pub fn position(&self) -> f64 {
        self.buffers.position.get()
    }

    /// Last sensed velocity in rad/s.
    pub fn velocity(&self) -> f64 {
        self.buffers.velocity.get()
    }

    /// Last sensed effort.
    pub fn effort(&self) -> f64 {
        self.buffers.effort.get()
    }

    /// `true` when both handles point at the same joint buffers.
    pub fn shares_buffers_with(&self, other: &JointStateHandle) -> bool {
        Arc::ptr_eq(&self.buffers, &other.buffers)
    }

    /// Copy every scalar of the joint, commands included.
    pub fn snapshot(&self) -> JointSnapshot {
        JointSnapshot {
            name: self.name.to_string(),
            position: self.position(),
            velocity: self.velocity(),
            effort: self.effort(),
            effort_command: self.buffers.effort_command.get(),
            velocity_command: self.buffers.velocity_command.get(),
        }
    }
}

/// A state handle plus write access to one of the joint's command scalars.
#[derive(Debug, Clone)]
pub struct JointCommandHandle {
    state: JointStateHandle,
    kind: CommandKind,
}

impl JointCommandHandle {
    /// Command handle writing `kind`'s scalar of `state`'s joint.
    pub fn new(state: JointStateHandle, kind: CommandKind) -> Self {
        Self { state, kind }
    }

    /// Joint name.
    pub fn name(&self) -> &str {
        self.state.name()
    }

    /// Which command scalar this handle writes.
    pub fn kind(&self) -> CommandKind {
        self.kind
    }

    /// The state handle this command handle was registered against.
    pub fn state(&self) -> &JointStateHandle {
        &self.state
    }

    /// See [`JointStateHandle::position`].
    pub fn position(&self) -> f64 {
        self.state.position()
    }

    /// See [`JointStateHandle::velocity`].
    pub fn velocity(&self) -> f64 {
        self.state.velocity()
    }

    /// See [`JointStateHandle::effort`].
    pub fn effort(&self) -> f64 {
        self.state.effort()
    }

    /// Current value of the command scalar.
    pub fn command(&self) -> f64 {
        self.command_scalar().get()
    }

    /// Overwrite the command scalar; the next write phase applies it.
    pub fn set_command(&self, value: f64) {
        self.command_scalar().set(value);
    }

    fn command_scalar(&self) -> &SharedScalar {
        match self.kind {
            CommandKind::Effort => &self.state.buffers.effort_command,
            CommandKind::Velocity => &self.state.buffers.velocity_command,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// JointStateInterface
// ─────────────────────────────────────────────────────────────────────────────

/// Ordered collection of [`JointStateHandle`]s keyed by joint name.
#[derive(Debug, Default)]
pub struct JointStateInterface {
    handles: Vec<JointStateHandle>,
}

impl JointStateInterface {
    /// An empty interface.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `handle`.  A handle with the same name is replaced in place,
    /// keeping its original position in the ordering.
    pub fn register_handle(&mut self, handle: JointStateHandle) {
        match self.handles.iter_mut().find(|h| h.name() == handle.name()) {
            Some(existing) => {
                warn!(
                    interface = %InterfaceKind::JointState,
                    joint = handle.name(),
                    "replacing existing joint handle"
                );
                *existing = handle;
            }
            None => self.handles.push(handle),
        }
    }

    /// Look up the handle for `name`.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::UnknownJoint`] when no handle has that name.
    pub fn handle(&self, name: &str) -> Result<JointStateHandle, SimError> {
        self.handles
            .iter()
            .find(|h| h.name() == name)
            .cloned()
            .ok_or_else(|| SimError::UnknownJoint {
                interface: InterfaceKind::JointState,
                joint: name.to_string(),
            })
    }

    /// Joint names in registration order.
    pub fn names(&self) -> Vec<&str> {
        self.handles.iter().map(JointStateHandle::name).collect()
    }

    /// Registered handles in registration order.
    pub fn handles(&self) -> &[JointStateHandle] {
        &self.handles
    }

    /// Number of registered joints.
    pub fn len(&self) -> usize {
        self.handles.len()
    }

    /// `true` when no joint is registered.
    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// JointCommandInterface
// ─────────────────────────────────────────────────────────────────────────────

/// Ordered collection of [`JointCommandHandle`]s of a single
/// [`CommandKind`], with resource claiming.
///
/// Fetching a handle through [`handle`][Self::handle] claims the joint so the
/// host can see which joints a controller is using.
#[derive(Debug)]
pub struct JointCommandInterface {
    kind: CommandKind,
    handles: Vec<JointCommandHandle>,
    claims: Vec<String>,
}

impl JointCommandInterface {
    /// An empty interface exposing `kind` commands.
    pub fn new(kind: CommandKind) -> Self {
        Self {
            kind,
            handles: Vec::new(),
            claims: Vec::new(),
        }
    }

    /// An empty effort-command interface.
    pub fn effort() -> Self {
        Self::new(CommandKind::Effort)
    }

    /// An empty velocity-command interface.
    pub fn velocity() -> Self {
        Self::new(CommandKind::Velocity)
    }

    /// Command kind every handle in this interface writes.
    pub fn kind(&self) -> CommandKind {
        self.kind
    }

    /// Registry key for this interface.
    pub fn interface_kind(&self) -> InterfaceKind {
        self.kind.interface()
    }

    /// Register `handle`, replacing any handle with the same name.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::InterfaceMismatch`] when the handle writes a
    /// different command scalar than this interface exposes.
    pub fn register_handle(&mut self, handle: JointCommandHandle) -> Result<(), SimError> {
        if handle.kind() != self.kind {
            return Err(SimError::InterfaceMismatch {
                expected: self.interface_kind(),
                found: handle.kind(),
            });
        }
        self.insert(handle);
        Ok(())
    }

    /// Build a command handle of this interface's kind on `state` and
    /// register it, replacing any handle with the same name.
    pub fn register_joint(&mut self, state: JointStateHandle) {
        self.insert(JointCommandHandle::new(state, self.kind));
    }

    fn insert(&mut self, handle: JointCommandHandle) {
        match self.handles.iter_mut().find(|h| h.name() == handle.name()) {
            Some(existing) => {
                warn!(
                    interface = %self.kind.interface(),
                    joint = handle.name(),
                    "replacing existing joint handle"
                );
                *existing = handle;
            }
            None => self.handles.push(handle),
        }
    }

    /// Look up and claim the handle for `name`.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::UnknownJoint`] when no handle has that name.
    pub fn handle(&mut self, name: &str) -> Result<JointCommandHandle, SimError> {
        let handle = self
            .handles
            .iter()
            .find(|h| h.name() == name)
            .cloned()
            .ok_or_else(|| SimError::UnknownJoint {
                interface: self.kind.interface(),
                joint: name.to_string(),
            })?;
        if !self.claims.iter().any(|c| c == name) {
            self.claims.push(name.to_string());
        }
        Ok(handle)
    }

    /// Joints claimed since the last [`clear_claims`][Self::clear_claims],
    /// in claim order.
    pub fn claims(&self) -> &[String] {
        &self.claims
    }

    /// Release every claim.
    pub fn clear_claims(&mut self) {
        self.claims.clear();
    }

    /// Joint names in registration order.
    pub fn names(&self) -> Vec<&str> {
        self.handles.iter().map(JointCommandHandle::name).collect()
    }

    /// Number of registered joints.
    pub fn len(&self) -> usize {
        self.handles.len()
    }

    /// `true` when no joint is registered.
    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }
}
