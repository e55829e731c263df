//! Angle helpers for revolute joints.
//!
//! Simulators report joint angles wrapped to a bounded range, while the
//! control side wants a continuous, multi-turn position.  The adapter bridges
//! the two by accumulating [`shortest_angular_distance`] every cycle.
//!
//! # Example
//!
//! ```rust
//! use jointsim_hal::angles::shortest_angular_distance;
//!
//! // 350° is 20° *behind* 10°, not 340° ahead of it.
//! let d = shortest_angular_distance(10f64.to_radians(), 350f64.to_radians());
//! assert!((d - (-20f64).to_radians()).abs() < 1e-9);
//! ```

use std::f64::consts::{PI, TAU};

/// Wrap `angle` into `[0, 2π)`.
pub fn normalize_angle_positive(angle: f64) -> f64 {
    let wrapped = angle.rem_euclid(TAU);
    // rem_euclid rounds tiny negative inputs up to exactly 2π.
    if wrapped >= TAU { 0.0 } else { wrapped }
}

/// Wrap `angle` into `(-π, π]`.
pub fn normalize_angle(angle: f64) -> f64 {
    let a = normalize_angle_positive(angle);
    if a > PI { a - TAU } else { a }
}

/// Signed distance along the shorter arc from `from` to `to`, in `(-π, π]`.
///
/// Adding the result to `from` lands on `to` modulo 2π.
pub fn shortest_angular_distance(from: f64, to: f64) -> f64 {
    normalize_angle(to - from)
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    #[test]
    fn positive_wrap_stays_in_range() {
        assert!((normalize_angle_positive(-PI / 2.0) - 1.5 * PI).abs() < EPS);
        assert!((normalize_angle_positive(5.0 * PI) - PI).abs() < EPS);
        assert_eq!(normalize_angle_positive(TAU), 0.0);
        assert_eq!(normalize_angle_positive(-1e-20), 0.0);
    }

    #[test]
    fn signed_wrap_is_half_open_at_minus_pi() {
        assert!((normalize_angle(-PI) - PI).abs() < EPS);
        assert!((normalize_angle(PI) - PI).abs() < EPS);
        assert!((normalize_angle(1.5 * PI) - (-0.5 * PI)).abs() < EPS);
        assert!((normalize_angle(-7.0) - (-7.0 + TAU)).abs() < EPS);
    }

    #[test]
    fn distance_to_self_is_zero() {
        for a in [-10.0, -PI, 0.0, 1.0, 3.0, 42.0] {
            assert!(shortest_angular_distance(a, a).abs() < EPS);
        }
    }

    #[test]
    fn distance_takes_the_short_way_round() {
        let d = shortest_angular_distance(0.1, TAU - 0.1);
        assert!((d - (-0.2)).abs() < EPS);

        let d = shortest_angular_distance(TAU - 0.1, 0.1);
        assert!((d - 0.2).abs() < EPS);
    }

    #[test]
    fn distance_ignores_whole_turns_in_the_source() {
        // A multi-turn position compared with a wrapped simulator angle.
        let d = shortest_angular_distance(4.0 * PI + 0.25, 0.5);
        assert!((d - 0.25).abs() < EPS);
    }
}
