use nalgebra::{Isometry3, Point3, Unit, Vector3};

use std::f64::consts::PI;

// Anything shorter than this is treated as a zero vector when normalizing.
pub const DEGENERATE_LENGTH: f64 = 1e-12;

pub fn reject(u: &Vector3<f64>, v: &Vector3<f64>) -> Vector3<f64> {
    // Computes the vector rejection of u from v. v must be non-zero.
    let u_proj_v = u.dot(v) * v / v.norm_squared();
    u - u_proj_v
}

/// Normalizes `v`, or returns `fallback` if `v` is too short to have a
/// meaningful direction. `fallback` is assumed to be a unit vector already.
pub fn normalize_or(v: &Vector3<f64>, fallback: &Vector3<f64>) -> Vector3<f64> {
    v.try_normalize(DEGENERATE_LENGTH).unwrap_or(*fallback)
}

/// Builds a view transform looking from `eye` towards `target`.
///
/// Unlike `Isometry3::look_at_rh`, this never produces NaNs: if `eye` and
/// `target` coincide, we look down -z, and if the view direction is parallel
/// to `up`, we substitute the most-`up`-like vector perpendicular to it.
pub fn safe_look_at(
    eye: &Point3<f64>,
    target: &Point3<f64>,
    up: &Vector3<f64>,
) -> Isometry3<f64> {
    let dir = normalize_or(&(target - eye), &-Vector3::z());

    let mut up = reject(up, &dir);
    if up.norm() < DEGENERATE_LENGTH {
        up = reject(&Vector3::z(), &dir);
    }

    Isometry3::look_at_rh(eye, &(eye + dir), &up)
}

/// Converts right ascension (hours) and declination (degrees) into a point
/// on a sphere of the given radius. The celestial pole points along +y.
pub fn celestial_to_cartesian(ra_hours: f64, dec_degrees: f64, radius: f64) -> Point3<f64> {
    let ra = ra_hours / 24.0 * 2.0 * PI;
    let dec = dec_degrees / 180.0 * PI;

    Point3::new(
        radius * dec.cos() * ra.cos(),
        radius * dec.sin(),
        -radius * dec.cos() * ra.sin(),
    )
}

#[derive(Debug, Clone, Copy)]
pub struct Ray {
    pub origin: Point3<f64>,
    pub direction: Unit<Vector3<f64>>,
}

impl Ray {
    /// A degenerate direction falls back to -z, the default view direction.
    pub fn new(origin: Point3<f64>, direction: Vector3<f64>) -> Self {
        let direction = Unit::new_unchecked(normalize_or(&direction, &-Vector3::z()));
        Ray { origin, direction }
    }

    pub fn point_at(&self, t: f64) -> Point3<f64> {
        self.origin + self.direction.into_inner() * t
    }

    /// Returns the distance along the ray to the first point where it
    /// touches the sphere, if any. If the origin is inside the sphere, this
    /// is the exit point.
    pub fn intersect_sphere(&self, center: &Point3<f64>, radius: f64) -> Option<f64> {
        let oc = self.origin - center;
        let b = oc.dot(&self.direction.into_inner());
        let c = oc.norm_squared() - radius * radius;

        let discriminant = b * b - c;
        if discriminant < 0.0 {
            return None;
        }

        let sqrt_disc = discriminant.sqrt();
        let t_near = -b - sqrt_disc;
        let t_far = -b + sqrt_disc;

        if t_far < 0.0 {
            None // sphere is entirely behind us
        } else if t_near >= 0.0 {
            Some(t_near)
        } else {
            Some(t_far)
        }
    }

    /// Finds the closest approach between this ray and the segment `a`-`b`.
    /// Returns the distance along the ray at that point, and the gap between
    /// the ray and the segment there.
    pub fn closest_approach_to_segment(&self, a: &Point3<f64>, b: &Point3<f64>) -> (f64, f64) {
        let u = self.direction.into_inner();
        let v = b - a;
        let w = self.origin - a;

        let uv = u.dot(&v);
        let vv = v.norm_squared();
        let uw = u.dot(&w);
        let vw = v.dot(&w);

        // Ray parameter s >= 0, segment parameter t in [0, 1]
        let project_onto_ray =
            |t: f64| -> f64 { f64::max(0.0, (a + v * t - self.origin).dot(&u)) };

        let (s, t) = if vv < DEGENERATE_LENGTH {
            // The segment is a point
            (project_onto_ray(0.0), 0.0)
        } else {
            let denom = vv - uv * uv; // |u| = 1
            if denom < DEGENERATE_LENGTH {
                // Parallel; pin the segment to the ray origin's projection
                let t = (vw / vv).clamp(0.0, 1.0);
                (project_onto_ray(t), t)
            } else {
                let s = (uv * vw - vv * uw) / denom;
                let t = (vw - uv * uw) / denom;
                if s < 0.0 {
                    let t = (vw / vv).clamp(0.0, 1.0);
                    (project_onto_ray(t), t)
                } else if !(0.0..=1.0).contains(&t) {
                    let t = t.clamp(0.0, 1.0);
                    (project_onto_ray(t), t)
                } else {
                    (s, t)
                }
            }
        };

        let gap = (self.point_at(s) - (a + v * t)).norm();
        (s, gap)
    }
}
