//! In-process simulation world for CI/CD testing without a physics engine.
//!
//! [`SimWorld`] implements [`SimModel`] with a table of [`SimulatedJoint`]s.
//! Each joint is a damped rotor integrated with semi-implicit Euler; the
//! reported angle is wrapped to `(-π, π]` the way full simulators report
//! revolute joints.  This lets the adapter and its controllers run in
//! headless tests and CI pipelines.
//!
//! # Example
//!
//! ```rust
//! use std::time::Duration;
//!
//! use jointsim_hal::joint::SimModel;
//! use jointsim_hal::sim::SimWorld;
//!
//! let mut world = SimWorld::builder().with_joint("joint1").build();
//! let joint = world.joint("joint1").expect("declared above");
//! joint.set_force(0, 1.0);
//! world.step(Duration::from_millis(10));
//! assert!(joint.velocity(0) > 0.0);
//! ```

use std::sync::Arc;
use std::time::Duration;

use crate::angles::normalize_angle;
use crate::joint::{SimJoint, SimModel};
use crate::scalar::SharedScalar;

// ────────────────────────────────────────────────────────────────────────────
// Simulated joint
// ────────────────────────────────────────────────────────────────────────────

/// A single-axis revolute joint with rotational inertia and viscous damping.
#[derive(Debug)]
pub struct SimulatedJoint {
    angle: SharedScalar,
    velocity: SharedScalar,
    force: SharedScalar,
    inertia: f64,
    damping: f64,
}

impl SimulatedJoint {
    /// A joint at rest at angle zero.
    ///
    /// # Panics
    ///
    /// Panics unless `inertia` is finite and strictly positive, since
    /// integration divides by it.
    pub fn new(inertia: f64, damping: f64) -> Self {
        assert!(
            inertia.is_finite() && inertia > 0.0,
            "joint inertia must be finite and positive, got {inertia}"
        );
        Self {
            angle: SharedScalar::default(),
            velocity: SharedScalar::default(),
            force: SharedScalar::default(),
            inertia,
            damping,
        }
    }

    /// Teleport the joint to `angle` (wrapped).
    pub fn set_angle(&self, angle: f64) {
        self.angle.set(normalize_angle(angle));
    }

    /// Overwrite the angular velocity.
    pub fn set_velocity(&self, velocity: f64) {
        self.velocity.set(velocity);
    }

    /// Advance the joint by `dt` seconds under the currently applied force.
    fn integrate(&self, dt: f64) {
        let acc = (self.force.get() - self.damping * self.velocity.get()) / self.inertia;
        let vel = self.velocity.get() + acc * dt;
        self.velocity.set(vel);
        self.angle.set(normalize_angle(self.angle.get() + vel * dt));
    }
}

impl SimJoint for SimulatedJoint {
    fn angle(&self, _axis: usize) -> f64 {
        self.angle.get()
    }

    fn velocity(&self, _axis: usize) -> f64 {
        self.velocity.get()
    }

    fn force(&self, _axis: usize) -> f64 {
        self.force.get()
    }

    fn set_force(&self, _axis: usize, effort: f64) {
        self.force.set(effort);
    }
}

// ────────────────────────────────────────────────────────────────────────────
// SimWorld
// ────────────────────────────────────────────────────────────────────────────

/// A named model owning an ordered table of simulated joints.
pub struct SimWorld {
    name: String,
    joints: Vec<(String, Arc<SimulatedJoint>)>,
    elapsed: Duration,
}

impl SimWorld {
    /// Start building a world.
    pub fn builder() -> SimWorldBuilder {
        SimWorldBuilder::default()
    }

    /// Typed access to a joint, for scripting tests.
    pub fn simulated_joint(&self, name: &str) -> Option<&Arc<SimulatedJoint>> {
        self.joints.iter().find(|(n, _)| n == name).map(|(_, j)| j)
    }

    /// Remove `name` from the world, dropping the world's reference to it.
    /// Returns `false` when no such joint exists.
    pub fn remove_joint(&mut self, name: &str) -> bool {
        let before = self.joints.len();
        self.joints.retain(|(n, _)| n != name);
        self.joints.len() != before
    }

    /// Integrate every joint over `period`.
    pub fn step(&mut self, period: Duration) {
        let dt = period.as_secs_f64();
        for (_, joint) in &self.joints {
            joint.integrate(dt);
        }
        self.elapsed += period;
    }

    /// Total simulated time.
    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    /// Joint names in insertion order.
    pub fn joint_names(&self) -> Vec<&str> {
        self.joints.iter().map(|(n, _)| n.as_str()).collect()
    }
}

impl SimModel for SimWorld {
    fn name(&self) -> &str {
        &self.name
    }

    fn joint(&self, name: &str) -> Option<Arc<dyn SimJoint>> {
        self.simulated_joint(name)
            .map(|j| j.clone() as Arc<dyn SimJoint>)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Builder
// ────────────────────────────────────────────────────────────────────────────

/// Default rotational inertia (kg·m²) of a joint added with
/// [`SimWorldBuilder::with_joint`].
pub const DEFAULT_INERTIA: f64 = 1.0;
/// Default viscous damping (N·m·s/rad).
pub const DEFAULT_DAMPING: f64 = 0.1;

/// Builder for [`SimWorld`].  Joints keep insertion order; re-adding a name
/// replaces the earlier joint.
pub struct SimWorldBuilder {
    name: String,
    joints: Vec<(String, Arc<SimulatedJoint>)>,
}

impl Default for SimWorldBuilder {
    fn default() -> Self {
        Self {
            name: "sim_world".to_string(),
            joints: Vec::new(),
        }
    }
}

impl SimWorldBuilder {
    /// Set the model name reported by [`SimModel::name`].
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Add a joint with [`DEFAULT_INERTIA`] and [`DEFAULT_DAMPING`].
    pub fn with_joint(self, name: impl Into<String>) -> Self {
        self.with_joint_params(name, DEFAULT_INERTIA, DEFAULT_DAMPING)
    }

    /// Add a joint with explicit inertia and damping.
    ///
    /// # Panics
    ///
    /// Panics when `inertia` is not finite and strictly positive.
    pub fn with_joint_params(mut self, name: impl Into<String>, inertia: f64, damping: f64) -> Self {
        let name = name.into();
        let joint = Arc::new(SimulatedJoint::new(inertia, damping));
        match self.joints.iter_mut().find(|(n, _)| *n == name) {
            Some(slot) => slot.1 = joint,
            None => self.joints.push((name, joint)),
        }
        self
    }

    /// Finish the world; simulated time starts at zero.
    pub fn build(self) -> SimWorld {
        SimWorld {
            name: self.name,
            joints: self.joints,
            elapsed: Duration::ZERO,
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
