//! `jointsim-hal` – Simulated Joint Hardware Layer
//!
//! Bridges a physics simulation's joints and a control framework's
//! state/command buffers.
//!
//! # Modules
//!
//! - [`adapter`] – [`JointSimAdapter`][adapter::JointSimAdapter]: declares the
//!   configured joints, binds them to the simulation and transfers state and
//!   effort commands every cycle.
//! - [`robot_sim`] – [`RobotSim`][robot_sim::RobotSim]: the init / read /
//!   write lifecycle a host drives.
//! - [`joint`] – [`SimJoint`][joint::SimJoint] and
//!   [`SimModel`][joint::SimModel]: what the adapter needs from a physics
//!   engine.
//! - [`interface`] – joint state and command handles and the interfaces that
//!   hold them.
//! - [`registry`] – [`HardwareRegistry`][registry::HardwareRegistry]: the
//!   interfaces a robot exposes, keyed by
//!   [`InterfaceKind`][jointsim_types::InterfaceKind].
//! - [`config`] – [`RobotConfig`][config::RobotConfig]: the ordered joint list,
//!   loadable from TOML.
//! - [`sim`] – [`SimWorld`][sim::SimWorld]: an in-process stand-in for the
//!   physics engine, for tests and CI.
//! - [`controller`] / [`pid`] – effort controllers that run between the read
//!   and write phases.
//! - [`angles`] – wrap-aware angle arithmetic.

pub mod adapter;
pub mod angles;
pub mod config;
pub mod controller;
pub mod interface;
pub mod joint;
pub mod pid;
pub mod registry;
pub mod robot_sim;
pub mod scalar;
pub mod sim;

pub use adapter::JointSimAdapter;
pub use config::{JointConfig, RobotConfig};
pub use controller::{Controller, JointEffortForwardController, JointPositionController};
pub use interface::{JointCommandHandle, JointCommandInterface, JointStateHandle, JointStateInterface};
pub use joint::{SimJoint, SimModel};
pub use registry::HardwareRegistry;
pub use robot_sim::RobotSim;
pub use sim::SimWorld;
