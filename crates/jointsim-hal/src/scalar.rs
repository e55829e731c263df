//! [`SharedScalar`] – an `f64` cell that can be read and written through
//! shared references.
//!
//! The adapter, the interface handles and the controllers all hold the same
//! buffers.  Each scalar has a single writer per cycle phase, so all accesses
//! use relaxed ordering.

use std::sync::atomic::{AtomicU64, Ordering};

/// Lock-free `f64` storage.
#[derive(Debug, Default)]
pub struct SharedScalar(AtomicU64);

impl SharedScalar {
    /// Cell holding `value`.
    pub fn new(value: f64) -> Self {
        Self(AtomicU64::new(value.to_bits()))
    }

    /// Current value.
    pub fn get(&self) -> f64 {
        f64::from_bits(self.0.load(Ordering::Relaxed))
    }

    /// Replace the value.
    pub fn set(&self, value: f64) {
        self.0.store(value.to_bits(), Ordering::Relaxed);
    }

    /// Add `delta` to the stored value.
    pub fn add(&self, delta: f64) {
        self.set(self.get() + delta);
    }
}
