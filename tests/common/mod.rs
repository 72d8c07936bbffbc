use std::f64::consts::{PI, TAU};

use rust_orrery::math::angle::normalize_angle;

/// The signed phase change from `from` to `to`, wrapped into (-pi, pi].
pub fn phase_change(from: f64, to: f64) -> f64 {
    let diff = normalize_angle(to - from);
    if diff > PI {
        diff - TAU
    } else {
        diff
    }
}
