use std::f64::consts::PI;

use nalgebra::{Isometry3, Perspective3, Point2, Point3, Vector3};

use super::orrery::{BodyID, Orrery};
use crate::config::CameraConfig;
use crate::math::geometry::{normalize_or, safe_look_at, Ray, DEGENERATE_LENGTH};

/// How the viewpoint is derived each frame. Exactly one is active.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CameraMode {
    /// Driven only by orbit/pan/zoom input.
    Free,
    /// Follows a body, moving by the same amount it moved since last frame.
    Tracking {
        body: BodyID,
        last_position: Point3<f64>,
    },
    /// Hovers over the sunward side of a body, looking back at the origin.
    Surface { body: BodyID },
}

#[derive(Debug, Clone)]
pub struct Viewpoint {
    pub eye: Point3<f64>,
    pub target: Point3<f64>,
    pub up: Vector3<f64>,
    pub fovy: f64,
    pub aspect: f64,
    pub znear: f64,
    pub zfar: f64,
}

impl Viewpoint {
    pub fn view_transform(&self) -> Isometry3<f64> {
        safe_look_at(&self.eye, &self.target, &self.up)
    }

    pub fn projection(&self) -> Perspective3<f64> {
        Perspective3::new(self.aspect, self.fovy, self.znear, self.zfar)
    }

    pub fn distance(&self) -> f64 {
        (self.eye - self.target).norm()
    }

    /// Casts a ray from the eye through a point given in normalized device
    /// coordinates: x and y in [-1, 1], +y up.
    pub fn ray_through(&self, ndc: &Point2<f64>) -> Ray {
        let projection = self.projection();
        let near = projection.unproject_point(&Point3::new(ndc.x, ndc.y, -1.0));
        let far = projection.unproject_point(&Point3::new(ndc.x, ndc.y, 1.0));

        let camera_to_world = self.view_transform().inverse();
        let near = camera_to_world * near;
        let far = camera_to_world * far;

        Ray::new(self.eye, far - near)
    }
}

/// Decides where the viewpoint is each frame, given the current state of the
/// orrery. Reads positions only; never mutates the bodies.
#[derive(Debug, Clone)]
pub struct CameraController {
    mode: CameraMode,
    viewpoint: Viewpoint,
    config: CameraConfig,
}

impl CameraController {
    pub fn new(config: CameraConfig) -> Self {
        let viewpoint = Viewpoint {
            eye: config.initial_eye,
            target: config.initial_target,
            up: Vector3::y(),
            fovy: config.fovy,
            aspect: config.aspect,
            znear: config.znear,
            zfar: config.zfar,
        };
        CameraController {
            mode: CameraMode::Free,
            viewpoint,
            config,
        }
    }

    pub fn mode(&self) -> &CameraMode {
        &self.mode
    }

    pub fn viewpoint(&self) -> &Viewpoint {
        &self.viewpoint
    }

    pub fn tracked_body(&self) -> Option<BodyID> {
        match self.mode {
            CameraMode::Tracking { body, .. } | CameraMode::Surface { body } => Some(body),
            CameraMode::Free => None,
        }
    }

    pub fn set_aspect(&mut self, aspect: f64) {
        if aspect.is_finite() && aspect > 0.0 {
            self.viewpoint.aspect = aspect;
        }
    }

    pub fn controls_enabled(&self) -> bool {
        !matches!(self.mode, CameraMode::Surface { .. })
    }

    // -- commands --

    /// Starts tracking the named body. Returns false, and changes nothing,
    /// if there's no such body.
    pub fn focus_on_body(&mut self, orrery: &Orrery, name: &str) -> bool {
        match orrery.find_body(name) {
            Some(id) => {
                self.track_body(orrery, id);
                true
            }
            None => {
                log::debug!("Cannot focus on unknown body {:?}", name);
                false
            }
        }
    }

    /// Snaps to the body and starts following it. The initial offset grows
    /// with the body's radius, and is reset every time this is called.
    pub fn track_body(&mut self, orrery: &Orrery, id: BodyID) {
        let position = orrery.world_position(id);
        let d = orrery.get_body(id).info.radius * self.config.focus_distance_factor;

        self.viewpoint.target = position;
        self.viewpoint.eye = position + Vector3::new(d, 0.5 * d, d);
        self.mode = CameraMode::Tracking {
            body: id,
            last_position: position,
        };
        log::debug!("Tracking {}", orrery.get_body(id).info.name);
    }

    pub fn set_surface_view(&mut self, orrery: &Orrery, name: &str) -> bool {
        match orrery.find_body(name) {
            Some(id) => {
                self.mode = CameraMode::Surface { body: id };
                self.place_on_surface(orrery, id);
                log::debug!("Surface view of {}", name);
                true
            }
            None => {
                log::debug!("Cannot view surface of unknown body {:?}", name);
                false
            }
        }
    }

    /// Looks at a fixed point from a fixed distance along its direction from
    /// the origin. Used for the background, which doesn't move, so nothing is
    /// tracked afterwards.
    pub fn focus_on_static_point(&mut self, point: &Point3<f64>) {
        if point.coords.norm() < DEGENERATE_LENGTH {
            self.viewpoint.eye = self.config.initial_eye;
        } else {
            let direction = normalize_or(&point.coords, &-Vector3::z());
            self.viewpoint.eye = Point3::from(direction * self.config.static_focus_distance);
        }
        self.viewpoint.target = *point;
        self.mode = CameraMode::Free;
    }

    pub fn detach(&mut self) {
        if self.mode != CameraMode::Free {
            log::debug!("Camera detached");
        }
        self.mode = CameraMode::Free;
    }

    // -- per-frame --

    /// Moves the viewpoint to follow the current mode. Must be called after
    /// the orrery has finished updating for this frame.
    pub fn update(&mut self, orrery: &Orrery) {
        match self.mode {
            CameraMode::Free => {}
            CameraMode::Tracking {
                body,
                last_position,
            } => {
                let position = orrery.world_position(body);
                let delta = position - last_position;
                self.viewpoint.eye += delta;
                self.viewpoint.target += delta;
                self.mode = CameraMode::Tracking {
                    body,
                    last_position: position,
                };
            }
            CameraMode::Surface { body } => self.place_on_surface(orrery, body),
        }
    }

    fn place_on_surface(&mut self, orrery: &Orrery, id: BodyID) {
        let position = orrery.world_position(id);
        let radius = orrery.get_body(id).info.radius;
        // Towards the body from the origin, where the light is
        let outward = normalize_or(&position.coords, &Vector3::x());

        self.viewpoint.eye = position - outward * (radius + self.config.surface_clearance);
        self.viewpoint.target = Point3::origin();
    }

    // -- user input; ignored in surface view --

    /// Rotates the eye around the target. `dtheta` spins around the y axis,
    /// `dphi` tilts towards or away from it.
    pub fn orbit(&mut self, dtheta: f64, dphi: f64) {
        if !self.controls_enabled() {
            return;
        }

        let offset = self.viewpoint.eye - self.viewpoint.target;
        let radius = offset.norm();
        if radius < DEGENERATE_LENGTH {
            return;
        }

        let theta = offset.x.atan2(offset.z) + dtheta;
        let phi = (offset.y / radius).clamp(-1.0, 1.0).acos() + dphi;
        let limit = self.config.phi_limit;
        let phi = phi.clamp(limit, PI - limit);

        let offset = Vector3::new(
            radius * phi.sin() * theta.sin(),
            radius * phi.cos(),
            radius * phi.sin() * theta.cos(),
        );
        self.viewpoint.eye = self.viewpoint.target + offset;
    }

    /// Scales the distance to the target by `factor`.
    pub fn zoom(&mut self, factor: f64) {
        if !self.controls_enabled() || !(factor.is_finite() && factor > 0.0) {
            return;
        }

        let offset = self.viewpoint.eye - self.viewpoint.target;
        let radius = offset.norm();
        let new_radius = (radius * factor).clamp(self.config.min_distance, self.config.max_distance);
        let direction = normalize_or(&offset, &Vector3::z());
        self.viewpoint.eye = self.viewpoint.target + direction * new_radius;
    }

    /// Slides eye and target together across the view plane. The step is
    /// proportional to the distance to the target.
    pub fn pan(&mut self, dx: f64, dy: f64) {
        if !self.controls_enabled() {
            return;
        }

        let forward = normalize_or(&(self.viewpoint.target - self.viewpoint.eye), &-Vector3::z());
        let right = normalize_or(&forward.cross(&self.viewpoint.up), &Vector3::x());
        let up = right.cross(&forward);

        let shift = (right * dx + up * dy) * self.viewpoint.distance();
        self.viewpoint.eye += shift;
        self.viewpoint.target += shift;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::catalog::Metadata;
    use crate::model::BodyInfo;

    fn orrery() -> Orrery {
        let mut orrery = Orrery::new(0.5, 0.5);
        let info = |name: &str, radius, distance, period| BodyInfo {
            name: name.to_owned(),
            radius,
            distance,
            period,
            color: Point3::new(1.0, 1.0, 1.0),
            texture: None,
            shells: Vec::new(),
            metadata: Metadata::default(),
        };
        orrery.add_body(info("Sun", 25.0, 0.0, 0.0), None, 0.0).unwrap();
        orrery.add_body(info("Earth", 2.0, 130.0, 1.0), None, 0.5).unwrap();
        orrery
    }

    #[test]
    fn test_focus_places_camera() {
        let orrery = orrery();
        let mut camera = CameraController::new(CameraConfig::default());

        assert!(camera.focus_on_body(&orrery, "Earth"));
        let earth = orrery.find_body("Earth").unwrap();
        let pos = orrery.world_position(earth);

        let vp = camera.viewpoint();
        approx::assert_relative_eq!(vp.target, pos);
        approx::assert_relative_eq!(vp.eye, pos + Vector3::new(10.0, 5.0, 10.0));
        assert_eq!(camera.tracked_body(), Some(earth));
    }

    #[test]
    fn test_unknown_names_are_ignored() {
        let orrery = orrery();
        let mut camera = CameraController::new(CameraConfig::default());
        camera.focus_on_body(&orrery, "Earth");
        let before = camera.viewpoint().clone();
        let mode = *camera.mode();

        assert!(!camera.focus_on_body(&orrery, "Unknown"));
        assert!(!camera.set_surface_view(&orrery, "Unknown"));
        assert_eq!(*camera.mode(), mode);
        assert_eq!(camera.viewpoint().eye, before.eye);
        assert_eq!(camera.viewpoint().target, before.target);
    }

    #[test]
    fn test_tracking_follows_displacement() {
        let mut orrery = orrery();
        let mut camera = CameraController::new(CameraConfig::default());
        camera.focus_on_body(&orrery, "Earth");
        camera.orbit(0.3, -0.2);
        camera.zoom(2.0);

        let earth = orrery.find_body("Earth").unwrap();
        for _ in 0..10 {
            let eye_before = camera.viewpoint().eye;
            let pos_before = orrery.world_position(earth);

            orrery.update(0.1);
            camera.update(&orrery);

            let delta = orrery.world_position(earth) - pos_before;
            approx::assert_relative_eq!(
                camera.viewpoint().eye - eye_before,
                delta,
                epsilon = 1e-9
            );
        }
    }

    #[test]
    fn test_surface_view() {
        let mut orrery = orrery();
        let mut camera = CameraController::new(CameraConfig::default());
        assert!(camera.set_surface_view(&orrery, "Earth"));
        assert!(!camera.controls_enabled());

        orrery.update(0.7);
        camera.update(&orrery);

        let pos = orrery.world_position(orrery.find_body("Earth").unwrap());
        let vp = camera.viewpoint().clone();
        approx::assert_relative_eq!(vp.target, Point3::origin());
        // On the sunward side, just above the surface
        approx::assert_relative_eq!((vp.eye - pos).norm(), 4.0, max_relative = 1e-9);
        approx::assert_relative_eq!(vp.eye.coords.norm(), 126.0, max_relative = 1e-9);

        // Input is ignored
        camera.orbit(1.0, 1.0);
        camera.zoom(3.0);
        camera.pan(0.5, 0.5);
        assert_eq!(camera.viewpoint().eye, vp.eye);

        // A body at the origin falls back to a fixed direction
        camera.set_surface_view(&orrery, "Sun");
        let eye = camera.viewpoint().eye;
        assert!(eye.coords.iter().all(|x| x.is_finite()));
        approx::assert_relative_eq!(eye, Point3::new(-27.0, 0.0, 0.0));
    }

    #[test]
    fn test_static_point_and_detach() {
        let orrery = orrery();
        let mut camera = CameraController::new(CameraConfig::default());
        camera.set_surface_view(&orrery, "Earth");

        let star = Point3::new(0.0, 0.0, -48_000.0);
        camera.focus_on_static_point(&star);
        assert_eq!(*camera.mode(), CameraMode::Free);
        approx::assert_relative_eq!(
            camera.viewpoint().eye,
            Point3::new(0.0, 0.0, -40_000.0),
            max_relative = 1e-12
        );
        approx::assert_relative_eq!(camera.viewpoint().target, star);

        // Same distance whatever the shell, e.g. a constellation centre
        // pulled inwards by its bounding box
        let centre = Point3::new(30_000.0, 0.0, 0.0);
        camera.focus_on_static_point(&centre);
        approx::assert_relative_eq!(
            camera.viewpoint().eye,
            Point3::new(40_000.0, 0.0, 0.0),
            max_relative = 1e-12
        );
        approx::assert_relative_eq!(camera.viewpoint().target, centre);

        camera.focus_on_static_point(&Point3::origin());
        assert!(camera.viewpoint().eye.coords.iter().all(|x| x.is_finite()));

        camera.focus_on_body(&orrery, "Earth");
        camera.detach();
        assert_eq!(*camera.mode(), CameraMode::Free);
        assert_eq!(camera.tracked_body(), None);
    }

    #[test]
    fn test_orbit_and_zoom() {
        let mut camera = CameraController::new(CameraConfig::default());
        let distance = camera.viewpoint().distance();

        camera.orbit(0.5, 0.2);
        approx::assert_relative_eq!(camera.viewpoint().distance(), distance, max_relative = 1e-9);

        // Can't go over the pole
        camera.orbit(0.0, -10.0);
        assert!(camera.viewpoint().eye.x.is_finite());
        assert!(camera.viewpoint().eye.y > 0.0);

        camera.zoom(0.5);
        approx::assert_relative_eq!(
            camera.viewpoint().distance(),
            distance / 2.0,
            max_relative = 1e-9
        );
        camera.zoom(1e-9);
        approx::assert_relative_eq!(camera.viewpoint().distance(), 0.5, max_relative = 1e-9);
    }

    #[test]
    fn test_center_ray() {
        let camera = CameraController::new(CameraConfig::default());
        let vp = camera.viewpoint();
        let ray = vp.ray_through(&Point2::origin());

        approx::assert_relative_eq!(ray.origin, vp.eye);
        let expected = (vp.target - vp.eye).normalize();
        approx::assert_relative_eq!(ray.direction.into_inner(), expected, epsilon = 1e-9);
    }
}
