use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Capability groups a simulated robot exposes to the control framework.
///
/// Controllers look interfaces up by kind, then look joints up by name
/// inside the interface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InterfaceKind {
    /// Read-only position / velocity / effort per joint.
    JointState,
    /// Writable effort command per joint.
    EffortCommand,
    /// Writable velocity command per joint.
    VelocityCommand,
}

impl fmt::Display for InterfaceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InterfaceKind::JointState => write!(f, "joint_state"),
            InterfaceKind::EffortCommand => write!(f, "effort_command"),
            InterfaceKind::VelocityCommand => write!(f, "velocity_command"),
        }
    }
}

/// Which command scalar a command handle writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CommandKind {
    Effort,
    Velocity,
}

impl CommandKind {
    /// The interface a handle of this kind belongs to.
    pub fn interface(self) -> InterfaceKind {
        match self {
            CommandKind::Effort => InterfaceKind::EffortCommand,
            CommandKind::Velocity => InterfaceKind::VelocityCommand,
        }
    }
}

/// Lifecycle phase of a simulated robot adapter.
///
/// `Constructed -> Bound` on a successful bind, `Constructed -> BindFailed`
/// otherwise.  Transfers are only legal in `Bound`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdapterPhase {
    Constructed,
    Bound,
    BindFailed,
}

impl fmt::Display for AdapterPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AdapterPhase::Constructed => write!(f, "constructed"),
            AdapterPhase::Bound => write!(f, "bound"),
            AdapterPhase::BindFailed => write!(f, "bind_failed"),
        }
    }
}

/// Point-in-time copy of one joint's buffers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JointSnapshot {
    pub name: String,
    /// Accumulated (multi-turn) position in radians.
    pub position: f64,
    pub velocity: f64,
    pub effort: f64,
    pub effort_command: f64,
    pub velocity_command: f64,
}

/// Error type shared by the adapter, its interfaces and the host loop.
#[derive(Error, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SimError {
    #[error("Joint Not Found: robot joint \"{joint}\" is not in the simulation model")]
    JointNotFound { joint: String },

    #[error("Bind Rejected: binding was already attempted (phase: {phase})")]
    BindAlreadyAttempted { phase: AdapterPhase },

    #[error("Not Bound: transfer requested in phase {phase}")]
    NotBound { phase: AdapterPhase },

    #[error("Stale Joint Reference: simulation joint \"{joint}\" no longer exists")]
    StaleJointReference { joint: String },

    #[error("Unknown Joint: no handle named \"{joint}\" in {interface}")]
    UnknownJoint {
        interface: InterfaceKind,
        joint: String,
    },

    #[error("Interface Not Registered: {0}")]
    InterfaceNotRegistered(InterfaceKind),

    #[error("Interface Mismatch: {expected} interface cannot hold a {found:?} handle")]
    InterfaceMismatch {
        expected: InterfaceKind,
        found: CommandKind,
    },

    #[error("Configuration Error: {0}")]
    Config(String),
}
