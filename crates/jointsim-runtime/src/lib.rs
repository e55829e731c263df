//! `jointsim-runtime` – Simulation Host Glue
//!
//! # Modules
//!
//! - [`control_loop`] – [`ControlLoop`][control_loop::ControlLoop]: binds a
//!   [`RobotSim`][jointsim_hal::RobotSim] to a
//!   [`SimWorld`][jointsim_hal::SimWorld] and runs the fixed-rate
//!   read → update → write → step cycle.
//! - [`telemetry`] – [`init_tracing`][telemetry::init_tracing]: installs the
//!   global `tracing` subscriber with an optional OTLP span exporter.

pub mod control_loop;
pub mod telemetry;

pub use control_loop::{ControlLoop, ControlLoopConfig};
pub use telemetry::{TracerProviderGuard, init_tracing};
