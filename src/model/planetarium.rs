use nalgebra::{Point2, Point3};
use rand::Rng;

use super::camera::{CameraController, CameraMode, Viewpoint};
use super::orrery::Orrery;
use super::picking::{EntityRef, PickResolver};
use super::scene::SceneDriver;
use super::sky::Sky;
use crate::catalog::{Catalog, CatalogEntry, CatalogError};
use crate::config::SimulationConfig;

/// The whole interactive model: bodies, background, camera and picking,
/// behind the handful of operations a front end needs.
///
/// Each frame is two phases. `advance` first updates every body, and only
/// then lets the camera and the derived per-body values read the new
/// positions. Picks always see the last completed frame.
#[derive(Debug, Clone)]
pub struct Planetarium {
    scene: SceneDriver,
    camera: CameraController,
    picker: PickResolver,
    selection: Option<EntityRef>,
    click_drag_threshold: f64,
    pointer_down: Option<Point2<f64>>,
}

impl Planetarium {
    pub fn new<R: Rng + ?Sized>(
        catalog: &Catalog,
        config: &SimulationConfig,
        rng: &mut R,
    ) -> Result<Self, CatalogError> {
        let orrery = Orrery::from_records(&catalog.bodies, config, rng)?;
        let sky = Sky::new(catalog.stars.clone(), catalog.constellations.clone());
        log::info!(
            "Sky has {} stars and {} constellations",
            sky.stars().len(),
            sky.constellations().len()
        );

        let scene = SceneDriver::new(orrery, sky, config.time_scale, config.max_frame_delta);
        let mut planetarium = Planetarium {
            scene,
            camera: CameraController::new(config.camera.clone()),
            picker: PickResolver::new(config.line_pick_tolerance),
            selection: None,
            click_drag_threshold: config.click_drag_threshold,
            pointer_down: None,
        };
        // Derived values are valid before the first frame
        planetarium.advance(0.0);
        Ok(planetarium)
    }

    /// Runs one frame, `real_dt` seconds after the last one.
    pub fn advance(&mut self, real_dt: f64) -> f64 {
        let dt = self.scene.advance(real_dt);
        self.camera.update(self.scene.orrery());
        self.scene.update_view_vectors(&self.camera.viewpoint().eye);
        dt
    }

    // -- camera commands; unknown names do nothing --

    pub fn focus_on_body(&mut self, name: &str) {
        self.camera.focus_on_body(self.scene.orrery(), name);
    }

    pub fn set_surface_view(&mut self, name: &str) {
        self.camera.set_surface_view(self.scene.orrery(), name);
    }

    pub fn focus_on_static_point(&mut self, point: &Point3<f64>) {
        self.camera.focus_on_static_point(point);
    }

    pub fn focus_on_star(&mut self, name: &str) {
        let sky = self.scene.sky();
        match sky.find_star(name) {
            Some(id) => self.camera.focus_on_static_point(&sky.get_star(id).position),
            None => log::debug!("Cannot focus on unknown star {:?}", name),
        }
    }

    pub fn focus_on_constellation(&mut self, name: &str) {
        let sky = self.scene.sky();
        match sky.find_constellation(name) {
            Some(id) => self
                .camera
                .focus_on_static_point(&sky.get_constellation(id).center),
            None => log::debug!("Cannot focus on unknown constellation {:?}", name),
        }
    }

    pub fn detach_camera(&mut self) {
        self.camera.detach();
    }

    // -- picking --

    /// Finds what lies under a point in normalized device coordinates.
    /// Doesn't change anything.
    pub fn pick(&self, ndc: &Point2<f64>) -> Option<EntityRef> {
        let ray = self.camera.viewpoint().ray_through(ndc);
        self.picker.pick(&ray, self.scene.orrery(), self.scene.sky())
    }

    /// Picks and acts on the result: bodies and stars pull the camera over,
    /// constellations are only selected, and a miss clears the selection.
    pub fn select(&mut self, ndc: &Point2<f64>) -> Option<EntityRef> {
        let hit = self.pick(ndc);
        match hit {
            Some(EntityRef::Body(id)) => self.camera.track_body(self.scene.orrery(), id),
            Some(EntityRef::Star(id)) => {
                let position = self.scene.sky().get_star(id).position;
                self.camera.focus_on_static_point(&position);
            }
            Some(EntityRef::Constellation { .. }) | None => {}
        }
        self.selection = hit;
        hit
    }

    pub fn press_pointer(&mut self, pixel: Point2<f64>) {
        self.pointer_down = Some(pixel);
    }

    /// Finishes a press. If the pointer barely moved, it's a click and
    /// selects whatever is under `ndc`; returns whether that happened.
    pub fn release_pointer(&mut self, pixel: Point2<f64>, ndc: &Point2<f64>) -> bool {
        let is_click = match self.pointer_down.take() {
            Some(down) => (pixel - down).norm() <= self.click_drag_threshold,
            None => false,
        };
        if is_click {
            self.select(ndc);
        }
        is_click
    }

    pub fn selection(&self) -> Option<EntityRef> {
        self.selection
    }

    pub fn clear_selection(&mut self) {
        self.selection = None;
    }

    /// Looks up the catalog record behind an entity.
    pub fn describe(&self, entity: EntityRef) -> Option<CatalogEntry<'_>> {
        match entity {
            EntityRef::Body(id) => {
                let body = self.scene.orrery().try_get_body(id)?;
                Some(match body.parent {
                    Some(_) => CatalogEntry::Moon(&body.info),
                    None => CatalogEntry::Body(&body.info),
                })
            }
            EntityRef::Star(id) => self
                .scene
                .sky()
                .stars()
                .get(id.0)
                .map(|s| CatalogEntry::Star(&s.record)),
            EntityRef::Constellation { id, .. } => self
                .scene
                .sky()
                .constellations()
                .get(id.0)
                .map(|c| CatalogEntry::ConstellationMarker(&c.record)),
        }
    }

    // -- toggles --

    pub fn set_orbit_lines_visible(&mut self, visible: bool) {
        self.scene.orrery_mut().set_orbit_lines_visible(visible);
    }

    pub fn set_moons_visible(&mut self, visible: bool) {
        self.scene.orrery_mut().set_moons_visible(visible);
    }

    pub fn set_body_moons_visible(&mut self, name: &str, visible: bool) {
        let orrery = self.scene.orrery_mut();
        match orrery.find_body(name) {
            Some(id) => orrery.set_body_moons_visible(id, visible),
            None => log::debug!("Cannot toggle moons of unknown body {:?}", name),
        }
    }

    pub fn set_time_scale(&mut self, time_scale: f64) {
        self.scene.set_time_scale(time_scale);
    }

    pub fn time_scale(&self) -> f64 {
        self.scene.time_scale()
    }

    // -- orbit controls --

    pub fn orbit(&mut self, dtheta: f64, dphi: f64) {
        self.camera.orbit(dtheta, dphi);
    }

    pub fn zoom(&mut self, factor: f64) {
        self.camera.zoom(factor);
    }

    pub fn pan(&mut self, dx: f64, dy: f64) {
        self.camera.pan(dx, dy);
    }

    pub fn set_aspect(&mut self, aspect: f64) {
        self.camera.set_aspect(aspect);
    }

    // -- state --

    pub fn scene(&self) -> &SceneDriver {
        &self.scene
    }

    pub fn orrery(&self) -> &Orrery {
        self.scene.orrery()
    }

    pub fn sky(&self) -> &Sky {
        self.scene.sky()
    }

    pub fn camera_mode(&self) -> &CameraMode {
        self.camera.mode()
    }

    pub fn viewpoint(&self) -> &Viewpoint {
        self.camera.viewpoint()
    }
}
