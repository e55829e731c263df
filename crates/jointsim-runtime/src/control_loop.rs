//! [`ControlLoop`] – fixed-rate host cycle for a simulated robot.
//!
//! Each [`ControlLoop::cycle`] performs, in order:
//!
//! 1. **Read** – `robot.read_sim` copies joint state out of the simulation.
//! 2. **Update** – every registered [`Controller`] computes new commands.
//! 3. **Write** – `robot.write_sim` pushes effort commands into the simulation.
//! 4. **Step** – the world integrates one period.
//!
//! # Example
//!
//! ```rust
//! use jointsim_hal::{JointSimAdapter, RobotConfig, SimWorld};
//! use jointsim_runtime::control_loop::{ControlLoop, ControlLoopConfig};
//!
//! let world = SimWorld::builder().with_joint("joint1").with_joint("joint2").build();
//! let robot = JointSimAdapter::new(&RobotConfig::default());
//! let config = ControlLoopConfig { max_cycles: 5, ..ControlLoopConfig::default() };
//!
//! let mut host = ControlLoop::new(robot, world, config).expect("robot binds");
//! assert_eq!(host.run().unwrap(), 5);
//! ```

use std::time::Duration;

use jointsim_hal::controller::Controller;
use jointsim_hal::robot_sim::RobotSim;
use jointsim_hal::sim::SimWorld;
use jointsim_types::SimError;
use tracing::{debug, info};

// ─────────────────────────────────────────────────────────────────────────────
// Configuration
// ─────────────────────────────────────────────────────────────────────────────

/// Timing of the host loop.
#[derive(Debug, Clone, PartialEq)]
pub struct ControlLoopConfig {
    /// Control and physics period.
    pub period: Duration,
    /// Number of cycles [`ControlLoop::run`] executes.
    pub max_cycles: u64,
}

impl Default for ControlLoopConfig {
    fn default() -> Self {
        Self {
            period: Duration::from_millis(1),
            max_cycles: 1000,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// ControlLoop
// ─────────────────────────────────────────────────────────────────────────────

/// Owns a bound robot, its simulation world and the controllers that run
/// between the read and write phases.
pub struct ControlLoop<R: RobotSim> {
    robot: R,
    world: SimWorld,
    controllers: Vec<Box<dyn Controller>>,
    config: ControlLoopConfig,
    time: Duration,
    cycles: u64,
}

impl<R: RobotSim> ControlLoop<R> {
    /// Bind `robot` to `world` and build the loop.
    ///
    /// # Errors
    ///
    /// Propagates the robot's bind error; the robot is not loaded.
    pub fn new(mut robot: R, world: SimWorld, config: ControlLoopConfig) -> Result<Self, SimError> {
        robot.init_sim(&world)?;
        info!(period = ?config.period, max_cycles = config.max_cycles, "control loop ready");
        Ok(Self {
            robot,
            world,
            controllers: Vec::new(),
            config,
            time: Duration::ZERO,
            cycles: 0,
        })
    }

    /// Add a controller; controllers update in insertion order.
    pub fn add_controller(&mut self, controller: Box<dyn Controller>) {
        info!(controller = controller.name(), "controller added");
        self.controllers.push(controller);
    }

    /// The bound robot.
    pub fn robot(&self) -> &R {
        &self.robot
    }

    /// Mutable robot access, e.g. to claim handles for a new controller.
    pub fn robot_mut(&mut self) -> &mut R {
        &mut self.robot
    }

    /// The simulation world being stepped.
    pub fn world(&self) -> &SimWorld {
        &self.world
    }

    /// Mutable world access, e.g. to script joints between cycles.
    pub fn world_mut(&mut self) -> &mut SimWorld {
        &mut self.world
    }

    /// Simulation time at the start of the next cycle.
    pub fn time(&self) -> Duration {
        self.time
    }

    /// Cycles completed so far.
    pub fn cycles(&self) -> u64 {
        self.cycles
    }

    /// Run one read → update → write → step cycle.
    ///
    /// # Errors
    ///
    /// Propagates transfer errors from the robot; time does not advance.
    pub fn cycle(&mut self) -> Result<(), SimError> {
        let period = self.config.period;
        self.robot.read_sim(self.time, period)?;
        for controller in &mut self.controllers {
            controller.update(self.time, period);
        }
        self.robot.write_sim(self.time, period)?;
        self.world.step(period);
        self.time += period;
        self.cycles += 1;
        Ok(())
    }

    /// Run [`ControlLoopConfig::max_cycles`] cycles and return how many ran.
    ///
    /// # Errors
    ///
    /// Stops at and returns the first cycle error.
    pub fn run(&mut self) -> Result<u64, SimError> {
        let start = self.cycles;
        for _ in 0..self.config.max_cycles {
            self.cycle()?;
        }
        let ran = self.cycles - start;
        debug!(cycles = ran, time = ?self.time, "control loop finished");
        Ok(ran)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use jointsim_hal::adapter::JointSimAdapter;
    use jointsim_hal::config::RobotConfig;
    use jointsim_hal::controller::{JointEffortForwardController, JointPositionController};
    use jointsim_hal::joint::SimModel;
    use jointsim_hal::pid::PidGains;
    use jointsim_types::AdapterPhase;

    fn rrbot_world() -> SimWorld {
        SimWorld::builder()
            .named("rrbot")
            .with_joint("joint1")
            .with_joint("joint2")
            .build()
    }

    fn config(max_cycles: u64) -> ControlLoopConfig {
        ControlLoopConfig {
            period: Duration::from_millis(10),
            max_cycles,
        }
    }

    #[test]
    fn new_binds_robot() {
        let host = ControlLoop::new(
            JointSimAdapter::new(&RobotConfig::default()),
            rrbot_world(),
            config(1),
        )
        .unwrap();
        assert_eq!(host.robot().phase(), AdapterPhase::Bound);
        assert_eq!(host.cycles(), 0);
    }

    #[test]
    fn new_fails_when_a_joint_is_missing() {
        let world = SimWorld::builder().with_joint("joint1").build();
        let err = ControlLoop::new(
            JointSimAdapter::new(&RobotConfig::default()),
            world,
            config(1),
        )
        .err()
        .unwrap();
        assert_eq!(
            err,
            SimError::JointNotFound {
                joint: "joint2".to_string()
            }
        );
    }

    #[test]
    fn run_advances_time_per_cycle() {
        let mut host = ControlLoop::new(
            JointSimAdapter::new(&RobotConfig::default()),
            rrbot_world(),
            config(7),
        )
        .unwrap();
        assert_eq!(host.run().unwrap(), 7);
        assert_eq!(host.time(), Duration::from_millis(70));
        assert_eq!(host.world().elapsed(), Duration::from_millis(70));
    }

    #[test]
    fn forwarded_effort_reaches_the_simulation() {
        let mut host = ControlLoop::new(
            JointSimAdapter::new(&RobotConfig::default()),
            rrbot_world(),
            config(1),
        )
        .unwrap();
        let mut ctrl =
            JointEffortForwardController::new(host.robot_mut().hardware_mut(), "joint1").unwrap();
        ctrl.set_effort(5.0);
        host.add_controller(Box::new(ctrl));

        host.cycle().unwrap();
        let j1 = host.world().joint("joint1").unwrap();
        let j2 = host.world().joint("joint2").unwrap();
        assert_eq!(j1.force(0), 5.0);
        assert_eq!(j2.force(0), 0.0);
        assert!(j1.velocity(0) > 0.0);

        // The next read sees the applied force as the sensed effort.
        host.cycle().unwrap();
        assert_eq!(host.robot().snapshot()[0].effort, 5.0);
    }

    #[test]
    fn position_controller_settles_on_set_point() {
        let mut cfg = RobotConfig::from_names(["joint1", "joint2"]);
        cfg.joints[0].initial_position = 0.0;
        let mut host = ControlLoop::new(JointSimAdapter::new(&cfg), rrbot_world(), config(2000)).unwrap();

        let mut ctrl = JointPositionController::new(
            host.robot_mut().hardware_mut(),
            "joint1",
            PidGains { p: 20.0, i: 0.0, d: 8.0, i_clamp: 0.0 },
        )
        .unwrap();
        ctrl.set_set_point(0.8);
        host.add_controller(Box::new(ctrl));

        host.run().unwrap();
        let snap = &host.robot().snapshot()[0];
        assert!((snap.position - 0.8).abs() < 1e-2, "position {}", snap.position);
        assert!(snap.velocity.abs() < 1e-2, "velocity {}", snap.velocity);
    }

    #[test]
    fn removed_joint_surfaces_as_stale_reference() {
        let mut host = ControlLoop::new(
            JointSimAdapter::new(&RobotConfig::default()),
            rrbot_world(),
            config(3),
        )
        .unwrap();
        host.cycle().unwrap();
        assert!(host.world_mut().remove_joint("joint2"));

        assert_eq!(
            host.run(),
            Err(SimError::StaleJointReference {
                joint: "joint2".to_string()
            })
        );
        assert_eq!(host.cycles(), 1);
    }
}
