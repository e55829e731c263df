//! [`JointSimAdapter`] – drives a configured list of revolute joints inside a
//! physics simulation.
//!
//! # Lifecycle
//!
//! | Phase | Entered by | Allowed calls |
//! |---|---|---|
//! | `Constructed` | [`JointSimAdapter::new`] | `init_sim` |
//! | `Bound` | successful `init_sim` | `read_sim`, `write_sim` |
//! | `BindFailed` | failed `init_sim` | none (transfers return `NotBound`) |
//!
//! # Cycle contract
//!
//! - `read_sim` accumulates the shortest angular distance to the simulator's
//!   angle into the position buffer (so multi-turn winding survives the
//!   simulator's wrapped angle) and overwrites velocity and effort.
//! - `write_sim` applies each joint's effort command to axis 0, once per
//!   call, unscaled.  Velocity commands are exposed but not forwarded.
//!
//! # Example
//!
//! ```rust
//! use std::time::Duration;
//!
//! use jointsim_hal::adapter::JointSimAdapter;
//! use jointsim_hal::config::RobotConfig;
//! use jointsim_hal::robot_sim::RobotSim;
//! use jointsim_hal::sim::SimWorld;
//!
//! let world = SimWorld::builder().with_joint("joint1").with_joint("joint2").build();
//! let mut robot = JointSimAdapter::new(&RobotConfig::default());
//! robot.init_sim(&world).expect("both joints exist");
//!
//! let dt = Duration::from_millis(1);
//! robot.read_sim(Duration::ZERO, dt).unwrap();
//! robot.write_sim(Duration::ZERO, dt).unwrap();
//! assert_eq!(robot.bound_joints(), vec!["joint1", "joint2"]);
//! ```

use std::sync::{Arc, Weak};
use std::time::Duration;

use jointsim_types::{AdapterPhase, JointSnapshot, SimError};
use tracing::{error, info, trace};

use crate::angles::shortest_angular_distance;
use crate::config::RobotConfig;
use crate::interface::{JointBuffers, JointCommandInterface, JointStateHandle, JointStateInterface};
use crate::joint::{SimJoint, SimModel};
use crate::registry::HardwareRegistry;
use crate::robot_sim::RobotSim;

/// Axis every transfer reads and writes; the joints are single-DOF.
const AXIS: usize = 0;

// ─────────────────────────────────────────────────────────────────────────────
// Internal records
// ─────────────────────────────────────────────────────────────────────────────

struct JointSpec {
    name: String,
    buffers: Arc<JointBuffers>,
}

/// Non-owning link from a declared joint to its simulation counterpart.
struct JointBinding {
    spec: usize,
    sim: Weak<dyn SimJoint>,
}

// ─────────────────────────────────────────────────────────────────────────────
// JointSimAdapter
// ─────────────────────────────────────────────────────────────────────────────

/// Hardware adapter between a physics simulation's joints and the
/// control framework's state and command interfaces.
pub struct JointSimAdapter {
    joints: Vec<JointSpec>,
    hardware: HardwareRegistry,
    bindings: Vec<JointBinding>,
    phase: AdapterPhase,
}

impl JointSimAdapter {
    /// Declare the configured joints and register their interfaces.
    ///
    /// `config` is expected to be valid (see [`RobotConfig::validate`]); use
    /// [`JointSimAdapter::from_config`] to validate first.
    pub fn new(config: &RobotConfig) -> Self {
        let mut js = JointStateInterface::new();
        let mut ej = JointCommandInterface::effort();
        let mut vj = JointCommandInterface::velocity();
        let mut joints = Vec::with_capacity(config.joints.len());

        for joint in &config.joints {
            let buffers = Arc::new(JointBuffers::new(
                joint.initial_position,
                joint.initial_effort,
            ));
            js.register_handle(JointStateHandle::new(joint.name.as_str(), buffers.clone()));
            joints.push(JointSpec {
                name: joint.name.clone(),
                buffers,
            });
        }
        for state in js.handles() {
            ej.register_joint(state.clone());
            vj.register_joint(state.clone());
        }

        let mut hardware = HardwareRegistry::new();
        hardware.register_state_interface(js);
        hardware.register_command_interface(ej);
        hardware.register_command_interface(vj);

        Self {
            joints,
            hardware,
            bindings: Vec::new(),
            phase: AdapterPhase::Constructed,
        }
    }

    /// Validate `config`, then construct.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::Config`] when the joint list is invalid.
    pub fn from_config(config: &RobotConfig) -> Result<Self, SimError> {
        config.validate()?;
        Ok(Self::new(config))
    }

    /// Current lifecycle phase.
    pub fn phase(&self) -> AdapterPhase {
        self.phase
    }

    /// Declared joint names, in declaration order.
    pub fn joint_names(&self) -> Vec<&str> {
        self.joints.iter().map(|j| j.name.as_str()).collect()
    }

    /// Names of the joints bound so far, in declaration order.
    ///
    /// After a failed bind this holds the joints resolved before the
    /// missing one.
    pub fn bound_joints(&self) -> Vec<&str> {
        self.bindings
            .iter()
            .map(|b| self.joints[b.spec].name.as_str())
            .collect()
    }

    /// Copy of every joint's buffers, in declaration order.
    pub fn snapshot(&self) -> Vec<JointSnapshot> {
        self.joints
            .iter()
            .map(|j| JointStateHandle::new(j.name.as_str(), j.buffers.clone()).snapshot())
            .collect()
    }

    fn ensure_bound(&self) -> Result<(), SimError> {
        match self.phase {
            AdapterPhase::Bound => Ok(()),
            phase => Err(SimError::NotBound { phase }),
        }
    }

    /// Upgrade every binding, in order.  Fails on the first stale one
    /// before any transfer happens, so a cycle is applied to all joints or
    /// to none.
    fn resolve_all(&self) -> Result<Vec<(&JointBuffers, Arc<dyn SimJoint>)>, SimError> {
        self.bindings
            .iter()
            .map(|binding| {
                let spec = &self.joints[binding.spec];
                binding
                    .sim
                    .upgrade()
                    .map(|sim| (spec.buffers.as_ref(), sim))
                    .ok_or_else(|| SimError::StaleJointReference {
                        joint: spec.name.clone(),
                    })
            })
            .collect()
    }
}

impl RobotSim for JointSimAdapter {
    fn init_sim(&mut self, model: &dyn SimModel) -> Result<(), SimError> {
        if self.phase != AdapterPhase::Constructed {
            return Err(SimError::BindAlreadyAttempted { phase: self.phase });
        }

        for (index, spec) in self.joints.iter().enumerate() {
            info!(model = model.name(), joint = %spec.name, "resolving simulation joint");
            match model.joint(&spec.name) {
                Some(joint) => self.bindings.push(JointBinding {
                    spec: index,
                    sim: Arc::downgrade(&joint),
                }),
                None => {
                    error!(
                        model = model.name(),
                        joint = %spec.name,
                        "robot joint is not in the simulation model"
                    );
                    self.phase = AdapterPhase::BindFailed;
                    return Err(SimError::JointNotFound {
                        joint: spec.name.clone(),
                    });
                }
            }
        }

        self.phase = AdapterPhase::Bound;
        info!(model = model.name(), joints = self.bindings.len(), "robot bound to simulation");
        Ok(())
    }

    fn read_sim(&mut self, time: Duration, period: Duration) -> Result<(), SimError> {
        self.ensure_bound()?;
        trace!(?time, ?period, "read_sim");
        for (buffers, sim) in self.resolve_all()? {
            buffers
                .position
                .add(shortest_angular_distance(buffers.position.get(), sim.angle(AXIS)));
            buffers.velocity.set(sim.velocity(AXIS));
            buffers.effort.set(sim.force(AXIS));
        }
        Ok(())
    }

    fn write_sim(&mut self, time: Duration, period: Duration) -> Result<(), SimError> {
        self.ensure_bound()?;
        trace!(?time, ?period, "write_sim");
        for (buffers, sim) in self.resolve_all()? {
            sim.set_force(AXIS, buffers.effort_command.get());
        }
        Ok(())
    }

    fn hardware(&self) -> &HardwareRegistry {
        &self.hardware
    }

    fn hardware_mut(&mut self) -> &mut HardwareRegistry {
        &mut self.hardware
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
