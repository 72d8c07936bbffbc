use std::collections::HashMap;

use nalgebra::{Point3, Vector3};

use super::orrery::{BodyID, Orrery, SurfaceKind};
use super::sky::Sky;

/// Owns the simulated bodies and the clock that drives them.
#[derive(Debug, Clone)]
pub struct SceneDriver {
    orrery: Orrery,
    sky: Sky,
    time_scale: f64,
    max_frame_delta: f64,
    // Real seconds since start, regardless of time scale. Drives animated
    // surfaces that shouldn't pause.
    elapsed: f64,
    simulated_time: f64,
    view_vectors: HashMap<BodyID, Vector3<f64>>,
}

impl SceneDriver {
    pub fn new(orrery: Orrery, sky: Sky, time_scale: f64, max_frame_delta: f64) -> Self {
        SceneDriver {
            orrery,
            sky,
            time_scale,
            max_frame_delta,
            elapsed: 0.0,
            simulated_time: 0.0,
            view_vectors: HashMap::new(),
        }
    }

    /// Advances the clock by `real_dt` seconds of wall time and updates every
    /// body. Returns the amount of simulated time that passed.
    ///
    /// `real_dt` is clamped to `[0, max_frame_delta]` before scaling, so a
    /// long stall doesn't make everything jump.
    pub fn advance(&mut self, real_dt: f64) -> f64 {
        let real_dt = if real_dt.is_finite() {
            real_dt.clamp(0.0, self.max_frame_delta)
        } else {
            0.0
        };
        let mut dt = real_dt * self.time_scale;
        if !dt.is_finite() {
            log::warn!("Frame step overflowed at time scale {}; skipping", self.time_scale);
            dt = 0.0;
        }

        self.elapsed += real_dt;
        self.simulated_time += dt;
        self.orrery.update(dt);
        dt
    }

    /// Recomputes the vector from each glowing body to the camera. Must run
    /// after `advance` so it sees this frame's positions.
    pub fn update_view_vectors(&mut self, eye: &Point3<f64>) {
        self.view_vectors.clear();
        for body in self.orrery.bodies() {
            if body.info.has_shell(SurfaceKind::Glow) {
                let v = eye - self.orrery.world_position(body.id);
                self.view_vectors.insert(body.id, v);
            }
        }
    }

    pub fn view_vector(&self, id: BodyID) -> Option<Vector3<f64>> {
        self.view_vectors.get(&id).copied()
    }

    pub fn orrery(&self) -> &Orrery {
        &self.orrery
    }

    pub fn orrery_mut(&mut self) -> &mut Orrery {
        &mut self.orrery
    }

    pub fn sky(&self) -> &Sky {
        &self.sky
    }

    pub fn time_scale(&self) -> f64 {
        self.time_scale
    }

    /// Zero pauses; negative values run the orbits backwards.
    pub fn set_time_scale(&mut self, time_scale: f64) {
        if time_scale.is_finite() {
            self.time_scale = time_scale;
        } else {
            log::debug!("Ignoring non-finite time scale {}", time_scale);
        }
    }

    pub fn shader_time(&self) -> f64 {
        self.elapsed
    }

    pub fn simulated_time(&self) -> f64 {
        self.simulated_time
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::catalog::Metadata;
    use crate::model::BodyInfo;

    fn driver() -> (SceneDriver, BodyID) {
        let mut orrery = Orrery::new(0.5, 0.5);
        let id = orrery
            .add_body(
                BodyInfo {
                    name: "Earth".to_owned(),
                    radius: 2.0,
                    distance: 130.0,
                    period: 1.0,
                    color: Point3::new(0.0, 0.0, 1.0),
                    texture: None,
                    shells: vec![SurfaceKind::Glow],
                    metadata: Metadata::default(),
                },
                None,
                0.0,
            )
            .unwrap();
        (SceneDriver::new(orrery, Sky::default(), 1.0, 0.1), id)
    }

    #[test]
    fn test_delta_is_capped_and_scaled() {
        let (mut scene, id) = driver();

        approx::assert_relative_eq!(scene.advance(0.05), 0.05);
        // A long stall only counts as one capped frame
        approx::assert_relative_eq!(scene.advance(30.0), 0.1);
        approx::assert_relative_eq!(scene.shader_time(), 0.15, max_relative = 1e-12);

        scene.set_time_scale(4.0);
        approx::assert_relative_eq!(scene.advance(0.05), 0.2);
        approx::assert_relative_eq!(scene.simulated_time(), 0.35, max_relative = 1e-12);

        let angle = scene.orrery().get_body(id).angle;
        approx::assert_relative_eq!(angle, 0.35 * 0.5, max_relative = 1e-12);
    }

    #[test]
    fn test_pause_and_rewind() {
        let (mut scene, id) = driver();
        scene.advance(0.1);
        let before = scene.orrery().world_position(id);

        scene.set_time_scale(0.0);
        assert_eq!(scene.advance(0.1), 0.0);
        assert_eq!(scene.orrery().world_position(id), before);
        // The shader clock keeps running while paused
        approx::assert_relative_eq!(scene.shader_time(), 0.2, max_relative = 1e-12);

        scene.set_time_scale(-1.0);
        scene.advance(0.1);
        approx::assert_abs_diff_eq!(scene.orrery().get_body(id).angle, 0.0, epsilon = 1e-12);

        // Negative and non-finite frame times count as nothing
        assert_eq!(scene.advance(-1.0), 0.0);
        assert_eq!(scene.advance(f64::NAN), 0.0);
        scene.set_time_scale(f64::INFINITY);
        approx::assert_relative_eq!(scene.time_scale(), -1.0);
    }

    #[test]
    fn test_huge_time_scale_stays_finite() {
        let (mut scene, id) = driver();
        let mut big = SceneDriver::new(scene.orrery().clone(), Sky::default(), f64::MAX, 10.0);
        assert_eq!(big.advance(5.0), 0.0);

        scene.set_time_scale(1e308);
        scene.advance(0.1);
        let angle = scene.orrery().get_body(id).angle;
        assert!(angle.is_finite());
        assert!(scene.orrery().world_position(id).iter().all(|x| x.is_finite()));

        scene.set_time_scale(1.0);
        scene.advance(0.1);
        let expected = angle + 0.05;
        approx::assert_relative_eq!(
            scene.orrery().world_position(id),
            Point3::new(130.0 * expected.cos(), 0.0, 130.0 * expected.sin()),
            epsilon = 1e-9
        );
    }

    #[test]
    fn test_view_vectors() {
        let (mut scene, id) = driver();
        scene.advance(0.1);
        let eye = Point3::new(0.0, 100.0, 400.0);
        scene.update_view_vectors(&eye);

        let expected = eye - scene.orrery().world_position(id);
        approx::assert_relative_eq!(scene.view_vector(id).unwrap(), expected);
        assert!(scene.view_vector(BodyID(99)).is_none());
    }
}
