//! Simulation-side traits: what the adapter needs from a physics engine.
//!
//! A physics engine plugs in by implementing [`SimModel`] for its robot model
//! and [`SimJoint`] for its joints.  The adapter never owns a simulation
//! joint; it keeps a `Weak` reference and only touches the joint through the
//! accessors below.

use std::sync::Arc;

/// A single-degree-of-freedom joint living inside a physics simulation.
///
/// Methods take `&self`: the simulation owns the joint and mutates it through
/// its own interior state, the same way engine joint pointers behave.
pub trait SimJoint: Send + Sync {
    /// Current angle of `axis` in radians, in whatever bounded range the
    /// simulator uses.
    fn angle(&self, axis: usize) -> f64;

    /// Current angular velocity of `axis` in rad/s.
    fn velocity(&self, axis: usize) -> f64;

    /// Force (or torque) currently acting on `axis`.
    fn force(&self, axis: usize) -> f64;

    /// Apply `effort` to `axis` for the next simulation step.
    fn set_force(&self, axis: usize, effort: f64);
}

/// A simulated robot model whose joints can be looked up by name.
pub trait SimModel {
    /// Model name, used in log output.
    fn name(&self) -> &str;

    /// Return the joint called `name`, or `None` when the model has no such
    /// joint.
    fn joint(&self, name: &str) -> Option<Arc<dyn SimJoint>>;
}
