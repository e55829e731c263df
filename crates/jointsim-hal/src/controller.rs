//! Controllers that bind to a robot's effort-command interface.
//!
//! A controller claims the command handle it writes when it is created and
//! then runs once per cycle, between the adapter's read and write phases.

use std::time::Duration;

use jointsim_types::{CommandKind, SimError};

use crate::angles::shortest_angular_distance;
use crate::interface::JointCommandHandle;
use crate::pid::{Pid, PidGains};
use crate::registry::HardwareRegistry;

/// A per-cycle controller.
pub trait Controller: Send {
    /// Name used in log output.
    fn name(&self) -> &str;

    /// Compute and write new commands.  `time` is the simulation time,
    /// `period` the time since the previous update.
    fn update(&mut self, time: Duration, period: Duration);
}

fn claim_effort(hardware: &mut HardwareRegistry, joint: &str) -> Result<JointCommandHandle, SimError> {
    hardware
        .command_interface_mut(CommandKind::Effort)?
        .handle(joint)
}

// ─────────────────────────────────────────────────────────────────────────────
// Position controller
// ─────────────────────────────────────────────────────────────────────────────

/// Drives one joint's accumulated position to a set-point by writing a PID
/// effort.  The error is the shortest angular distance, so the joint never
/// takes the long way round.
pub struct JointPositionController {
    name: String,
    handle: JointCommandHandle,
    pid: Pid,
    set_point: f64,
}

impl JointPositionController {
    /// Claim `joint`'s effort handle.  The set-point starts at the joint's
    /// current position, so the controller initially holds still.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::Config`] for non-finite gains (nothing is claimed),
    /// or [`SimError::InterfaceNotRegistered`] / [`SimError::UnknownJoint`]
    /// when the handle cannot be claimed.
    pub fn new(hardware: &mut HardwareRegistry, joint: &str, gains: PidGains) -> Result<Self, SimError> {
        let pid = Pid::new(gains)?;
        let handle = claim_effort(hardware, joint)?;
        Ok(Self {
            name: format!("{joint}_position_controller"),
            set_point: handle.position(),
            handle,
            pid,
        })
    }

    /// Current set-point in radians.
    pub fn set_point(&self) -> f64 {
        self.set_point
    }

    /// Move the set-point; takes effect on the next update.
    pub fn set_set_point(&mut self, set_point: f64) {
        self.set_point = set_point;
    }
}

impl Controller for JointPositionController {
    fn name(&self) -> &str {
        &self.name
    }

    fn update(&mut self, _time: Duration, period: Duration) {
        let error = shortest_angular_distance(self.handle.position(), self.set_point);
        let effort = self.pid.compute_command(error, period);
        self.handle.set_command(effort);
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Forward controller
// ─────────────────────────────────────────────────────────────────────────────

/// Writes a fixed effort to one joint every cycle.
pub struct JointEffortForwardController {
    name: String,
    handle: JointCommandHandle,
    effort: f64,
}

impl JointEffortForwardController {
    /// Claim `joint`'s effort handle; the commanded effort starts at zero.
    pub fn new(hardware: &mut HardwareRegistry, joint: &str) -> Result<Self, SimError> {
        Ok(Self {
            name: format!("{joint}_effort_controller"),
            handle: claim_effort(hardware, joint)?,
            effort: 0.0,
        })
    }

    /// Effort written on every following update.
    pub fn set_effort(&mut self, effort: f64) {
        self.effort = effort;
    }
}

impl Controller for JointEffortForwardController {
    fn name(&self) -> &str {
        &self.name
    }

    fn update(&mut self, _time: Duration, _period: Duration) {
        self.handle.set_command(self.effort);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapter::JointSimAdapter;
    use crate::config::RobotConfig;
    use crate::robot_sim::RobotSim;
    use jointsim_types::InterfaceKind;

    const DT: Duration = Duration::from_millis(10);

    fn effort_command(adapter: &JointSimAdapter, joint: &str) -> f64 {
        adapter
            .snapshot()
            .into_iter()
            .find(|s| s.name == joint)
            .unwrap()
            .effort_command
    }

    #[test]
    fn position_controller_claims_its_joint() {
        let mut adapter = JointSimAdapter::new(&RobotConfig::default());
        let ctrl = JointPositionController::new(
            adapter.hardware_mut(),
            "joint2",
            PidGains::default(),
        )
        .unwrap();
        assert_eq!(ctrl.name(), "joint2_position_controller");
        // Initial set-point is the declared initial position.
        assert_eq!(ctrl.set_point(), 1.0);
        assert_eq!(
            adapter
                .hardware()
                .command_interface(CommandKind::Effort)
                .unwrap()
                .claims(),
            ["joint2".to_string()]
        );
    }

    #[test]
    fn position_controller_pushes_toward_set_point() {
        let mut adapter = JointSimAdapter::new(&RobotConfig::default());
        let mut ctrl = JointPositionController::new(
            adapter.hardware_mut(),
            "joint1",
            PidGains { p: 10.0, ..PidGains::default() },
        )
        .unwrap();

        ctrl.update(Duration::ZERO, DT);
        assert!(effort_command(&adapter, "joint1").abs() < 1e-12);

        ctrl.set_set_point(1.5);
        ctrl.update(DT, DT);
        // error 0.5 rad * 10
        assert!((effort_command(&adapter, "joint1") - 5.0).abs() < 1e-9);

        ctrl.set_set_point(0.5);
        ctrl.update(DT * 2, DT);
        assert!(effort_command(&adapter, "joint1") < 0.0);
    }

    #[test]
    fn forward_controller_writes_fixed_effort() {
        let mut adapter = JointSimAdapter::new(&RobotConfig::default());
        let mut ctrl = JointEffortForwardController::new(adapter.hardware_mut(), "joint1").unwrap();
        ctrl.set_effort(-2.0);
        ctrl.update(Duration::ZERO, DT);
        assert_eq!(effort_command(&adapter, "joint1"), -2.0);
        assert_eq!(effort_command(&adapter, "joint2"), 0.0);
    }

    #[test]
    fn unknown_joint_is_rejected() {
        let mut adapter = JointSimAdapter::new(&RobotConfig::default());
        let err = JointEffortForwardController::new(adapter.hardware_mut(), "wrist")
            .err()
            .unwrap();
        assert_eq!(
            err,
            SimError::UnknownJoint {
                interface: InterfaceKind::EffortCommand,
                joint: "wrist".to_string(),
            }
        );
    }

    #[test]
    fn nan_gains_are_rejected_without_claiming() {
        let mut adapter = JointSimAdapter::new(&RobotConfig::default());
        let gains = PidGains { p: 1.0, i: 1.0, d: 0.0, i_clamp: f64::NAN };
        let err = JointPositionController::new(adapter.hardware_mut(), "joint1", gains)
            .err()
            .unwrap();
        assert!(matches!(err, SimError::Config(_)));
        assert!(
            adapter
                .hardware()
                .command_interface(CommandKind::Effort)
                .unwrap()
                .claims()
                .is_empty()
        );
    }
}
