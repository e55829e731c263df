//! PID (Proportional–Integral–Derivative) loop used by the joint controllers.
//!
//! The loop is error-driven: the caller computes the error (for revolute
//! joints usually a shortest angular distance) and the elapsed period, and
//! receives an effort.  This keeps wrap handling out of the PID itself.
//!
//! # Example
//!
//! ```rust
//! use std::time::Duration;
//!
//! use jointsim_hal::pid::{Pid, PidGains};
//!
//! let mut pid = Pid::new(PidGains { p: 10.0, i: 0.0, d: 0.0, i_clamp: 0.0 }).unwrap();
//! let effort = pid.compute_command(0.5, Duration::from_millis(10));
//! assert!((effort - 5.0).abs() < 1e-12);
//! ```

use std::time::Duration;

use jointsim_types::SimError;
use serde::{Deserialize, Serialize};

/// PID gains.
///
/// `i_clamp` bounds the integral contribution to `[-i_clamp, i_clamp]`; zero
/// disables the integral term's contribution entirely.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PidGains {
    pub p: f64,
    pub i: f64,
    pub d: f64,
    #[serde(default)]
    pub i_clamp: f64,
}

impl PidGains {
    /// Check every gain is finite.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::Config`] naming the first non-finite gain.
    pub fn validate(&self) -> Result<(), SimError> {
        let gains = [
            ("p", self.p),
            ("i", self.i),
            ("d", self.d),
            ("i_clamp", self.i_clamp),
        ];
        for (name, value) in gains {
            if !value.is_finite() {
                return Err(SimError::Config(format!(
                    "PID gain {name} must be finite, got {value}"
                )));
            }
        }
        Ok(())
    }
}

/// Error-driven PID loop with integral clamping.
#[derive(Debug, Clone)]
pub struct Pid {
    gains: PidGains,
    i_term: f64,
    last_error: Option<f64>,
}

impl Pid {
    /// Create a loop with zeroed integral and derivative memory.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::Config`] when any gain is NaN or infinite.
    pub fn new(gains: PidGains) -> Result<Self, SimError> {
        gains.validate()?;
        Ok(Self {
            gains,
            i_term: 0.0,
            last_error: None,
        })
    }

    /// Return the gains this loop was built with.
    pub fn gains(&self) -> PidGains {
        self.gains
    }

    /// Compute the command for `error` after `period`.
    ///
    /// A zero period returns `0.0` and leaves the loop state untouched.
    pub fn compute_command(&mut self, error: f64, period: Duration) -> f64 {
        let dt = period.as_secs_f64();
        if dt <= 0.0 || !error.is_finite() {
            return 0.0;
        }

        let limit = self.gains.i_clamp.abs();
        self.i_term = (self.i_term + self.gains.i * error * dt).clamp(-limit, limit);

        let d_term = match self.last_error {
            Some(prev) => self.gains.d * (error - prev) / dt,
            None => 0.0,
        };
        self.last_error = Some(error);

        self.gains.p * error + self.i_term + d_term
    }

    /// Clear the integral accumulator and derivative memory.
    pub fn reset(&mut self) {
        self.i_term = 0.0;
        self.last_error = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DT: Duration = Duration::from_millis(100);

    fn gains(p: f64, i: f64, d: f64, i_clamp: f64) -> PidGains {
        PidGains { p, i, d, i_clamp }
    }

    #[test]
    fn proportional_only() {
        let mut pid = Pid::new(gains(2.0, 0.0, 0.0, 0.0)).unwrap();
        // 2.0 * 10.0 = 20.0
        assert!((pid.compute_command(10.0, DT) - 20.0).abs() < 1e-9);
        assert!(pid.compute_command(0.0, DT).abs() < 1e-12);
    }

    #[test]
    fn integral_accumulates_and_is_clamped() {
        let mut pid = Pid::new(gains(0.0, 1.0, 0.0, 0.15)).unwrap();
        // i_term: 0.1, then 0.2 clamped to 0.15.
        assert!((pid.compute_command(1.0, DT) - 0.1).abs() < 1e-9);
        assert!((pid.compute_command(1.0, DT) - 0.15).abs() < 1e-9);
        assert!((pid.compute_command(-1.0, DT) - 0.05).abs() < 1e-9);
    }

    #[test]
    fn zero_clamp_disables_integral() {
        let mut pid = Pid::new(gains(0.0, 5.0, 0.0, 0.0)).unwrap();
        assert_eq!(pid.compute_command(1.0, DT), 0.0);
    }

    #[test]
    fn derivative_uses_backward_difference() {
        let mut pid = Pid::new(gains(0.0, 0.0, 1.0, 0.0)).unwrap();
        // First call has no history.
        assert_eq!(pid.compute_command(1.0, DT), 0.0);
        // (0.5 - 1.0) / 0.1 = -5.0
        assert!((pid.compute_command(0.5, DT) - (-5.0)).abs() < 1e-9);
    }

    #[test]
    fn zero_period_leaves_state_untouched() {
        let mut pid = Pid::new(gains(1.0, 1.0, 1.0, 10.0)).unwrap();
        assert_eq!(pid.compute_command(3.0, Duration::ZERO), 0.0);

        let mut fresh = Pid::new(gains(1.0, 1.0, 1.0, 10.0)).unwrap();
        assert!((pid.compute_command(3.0, DT) - fresh.compute_command(3.0, DT)).abs() < 1e-12);
    }

    #[test]
    fn reset_matches_fresh_loop() {
        let mut pid = Pid::new(gains(1.0, 1.0, 1.0, 10.0)).unwrap();
        pid.compute_command(2.0, DT);
        pid.compute_command(1.0, DT);
        pid.reset();

        let mut fresh = Pid::new(pid.gains()).unwrap();
        assert!((pid.compute_command(0.7, DT) - fresh.compute_command(0.7, DT)).abs() < 1e-12);
    }

    #[test]
    fn non_finite_gains_are_rejected() {
        let g: PidGains = toml::from_str("p = 1.0\ni = 1.0\nd = 0.0\ni_clamp = nan").unwrap();
        assert!(matches!(Pid::new(g), Err(SimError::Config(msg)) if msg.contains("i_clamp")));

        assert!(Pid::new(gains(f64::INFINITY, 0.0, 0.0, 0.0)).is_err());
        assert!(Pid::new(gains(0.0, 0.0, f64::NEG_INFINITY, 0.0)).is_err());
    }

    #[test]
    fn gains_deserialize_with_default_clamp() {
        let g: PidGains = toml::from_str("p = 100.0\ni = 0.01\nd = 10.0").unwrap();
        assert_eq!(g, gains(100.0, 0.01, 10.0, 0.0));
    }
}
