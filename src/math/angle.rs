use nalgebra::Vector3;

use std::f64::consts::TAU;

/// Wraps an angle into [0, 2pi).
pub fn normalize_angle(theta: f64) -> f64 {
    let wrapped = theta.rem_euclid(TAU);
    // rem_euclid can round up to exactly TAU for tiny negative inputs
    if wrapped >= TAU {
        0.0
    } else {
        wrapped
    }
}

/// Position on a circular orbit of the given radius, in the xz-plane.
/// Every orbit in the model is coplanar, so y is always zero.
pub fn circular_orbit_position(distance: f64, angle: f64) -> Vector3<f64> {
    Vector3::new(distance * angle.cos(), 0.0, distance * angle.sin())
}
