//! The [`RobotSim`] lifecycle every simulated robot implements.
//!
//! The host drives it in a fixed order: [`init_sim`][RobotSim::init_sim] once
//! after the simulation has loaded the model, then every control cycle
//! [`read_sim`][RobotSim::read_sim], controller updates, and
//! [`write_sim`][RobotSim::write_sim] before the physics step.

use std::time::Duration;

use jointsim_types::SimError;

use crate::joint::SimModel;
use crate::registry::HardwareRegistry;

/// A robot whose hardware lives inside a physics simulation.
pub trait RobotSim: Send {
    /// Resolve the robot's joints against the live simulation `model`.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::JointNotFound`] when a declared joint is missing
    /// from the model.  The host is expected to abort loading this robot.
    fn init_sim(&mut self, model: &dyn SimModel) -> Result<(), SimError>;

    /// Copy sensed joint state from the simulation into the state buffers.
    ///
    /// `time` is the simulation time since start, `period` the time elapsed
    /// since the previous cycle.
    fn read_sim(&mut self, time: Duration, period: Duration) -> Result<(), SimError>;

    /// Push the command buffers into the simulation.
    fn write_sim(&mut self, time: Duration, period: Duration) -> Result<(), SimError>;

    /// Interfaces the robot exposes to controllers.
    fn hardware(&self) -> &HardwareRegistry;

    /// Mutable access to the interfaces, needed to claim command handles.
    fn hardware_mut(&mut self) -> &mut HardwareRegistry;
}
