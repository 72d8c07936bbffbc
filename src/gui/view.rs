use std::collections::HashMap;
use std::path::Path;

use kiss3d::camera::Camera;
use kiss3d::planar_camera::PlanarCamera;
use kiss3d::post_processing::PostProcessingEffect;
use kiss3d::renderer::Renderer;
use kiss3d::scene::SceneNode;
use kiss3d::window::Window;
use nalgebra::{Point2, Point3, Translation3, UnitQuaternion, Vector2, Vector3};

use super::camera::ViewCamera;
use super::controller::Controller;
use super::renderers::OverlayRenderer;
use crate::catalog::Presentable;
use crate::model::{
    BodyID, CameraMode, EntityRef, MarkerRef, Planetarium, Surface, SurfaceID, SurfaceKind,
    CONSTELLATION_STAR_RADIUS, STAR_PICK_RADIUS,
};

const CLOUD_COLOR: (f32, f32, f32) = (1.0, 1.0, 1.0);
const GLOW_COLOR: (f32, f32, f32) = (0.4, 0.6, 1.0);
const STAR_SHIMMER_RATE: f64 = 2.0;

pub struct View {
    planetarium: Planetarium,
    surface_nodes: HashMap<SurfaceID, SceneNode>,
    star_nodes: Vec<SceneNode>,
    // Constellation star markers never move, so we only need to keep them alive
    _constellation_nodes: Vec<SceneNode>,
    camera: ViewCamera,
    camera_focus: CameraFocus,
    window_size: Vector2<f64>,
    renderer: OverlayRenderer,
}

/// Cycles through the bodies in catalog order.
pub struct CameraFocus {
    focus_points: Vec<BodyID>,
    focus_idx: usize,
}

impl CameraFocus {
    pub fn new(planetarium: &Planetarium) -> Self {
        CameraFocus {
            focus_points: planetarium.orrery().bodies().map(|b| b.id).collect(),
            focus_idx: 0,
        }
    }

    pub fn next(&mut self) {
        let num_bodies = self.focus_points.len().max(1);
        self.focus_idx = (self.focus_idx + 1) % num_bodies;
    }

    pub fn prev(&mut self) {
        let num_bodies = self.focus_points.len().max(1);
        self.focus_idx = (self.focus_idx + num_bodies - 1) % num_bodies;
    }

    pub fn point(&self) -> Option<BodyID> {
        self.focus_points.get(self.focus_idx).copied()
    }
}

impl View {
    pub fn new(planetarium: Planetarium, window: &mut Window) -> Self {
        let mut surface_nodes = HashMap::new();
        for surface in planetarium.orrery().surfaces() {
            let node = Self::create_surface_object(window, &planetarium, surface);
            surface_nodes.insert(surface.id, node);
        }

        let star_nodes = planetarium
            .sky()
            .stars()
            .iter()
            .map(|star| {
                let mut node = window.add_sphere(STAR_PICK_RADIUS as f32);
                let c = star.record.color;
                node.set_color(c.x, c.y, c.z);
                node.set_local_translation(Translation3::from(to_f32(star.position).coords));
                node
            })
            .collect();

        let mut constellation_nodes = Vec::new();
        for constellation in planetarium.sky().constellations() {
            let c = constellation.record.color;
            for position in constellation.star_positions.iter() {
                let mut node = window.add_sphere(CONSTELLATION_STAR_RADIUS as f32);
                node.set_color(c.x, c.y, c.z);
                node.set_local_translation(Translation3::from(to_f32(*position).coords));
                constellation_nodes.push(node);
            }
        }

        let camera = ViewCamera::new(planetarium.viewpoint());
        let camera_focus = CameraFocus::new(&planetarium);

        let mut view = View {
            planetarium,
            surface_nodes,
            star_nodes,
            _constellation_nodes: constellation_nodes,
            camera,
            camera_focus,
            window_size: Vector2::new(window.width() as f64, window.height() as f64),
            renderer: OverlayRenderer::new(),
        };
        view.update_scene_objects();
        view
    }

    fn create_surface_object(
        window: &mut Window,
        planetarium: &Planetarium,
        surface: &Surface,
    ) -> SceneNode {
        let info = &planetarium.orrery().get_body(surface.owner).info;
        let mut sphere = window.add_sphere(surface.radius as f32);

        match surface.kind {
            SurfaceKind::Ground => {
                let color = &info.color;
                sphere.set_color(color.x, color.y, color.z);
                if let Some(texture) = &info.texture {
                    let path = Path::new(texture);
                    if path.exists() {
                        sphere.set_texture_from_file(path, texture);
                    } else {
                        log::warn!("Texture {} for {} not found", texture, info.name);
                    }
                }
            }
            SurfaceKind::Clouds => {
                let (r, g, b) = CLOUD_COLOR;
                sphere.set_color(r, g, b);
                sphere.set_surface_rendering_activation(false);
                sphere.set_lines_width(1.0);
            }
            SurfaceKind::Glow => {
                let (r, g, b) = GLOW_COLOR;
                sphere.set_color(r, g, b);
                sphere.set_surface_rendering_activation(false);
                sphere.set_points_size(1.0);
            }
        }
        sphere
    }

    pub fn planetarium_mut(&mut self) -> &mut Planetarium {
        &mut self.planetarium
    }

    /// Advances the model by `real_dt` seconds and moves everything to match.
    pub fn update_state_by(&mut self, real_dt: f64) {
        self.planetarium.advance(real_dt);
        self.update_scene_objects();
    }

    pub fn camera_focus_next(&mut self) {
        self.camera_focus.next();
        self.focus_current();
    }

    pub fn camera_focus_prev(&mut self) {
        self.camera_focus.prev();
        self.focus_current();
    }

    fn focused_name(&self) -> Option<String> {
        let id = self.camera_focus.point()?;
        Some(self.planetarium.orrery().get_body(id).info.name.clone())
    }

    fn focus_current(&mut self) {
        if let Some(name) = self.focused_name() {
            self.planetarium.focus_on_body(&name);
        }
    }

    pub fn surface_view(&mut self) {
        if let Some(name) = self.focused_name() {
            self.planetarium.set_surface_view(&name);
        }
    }

    pub fn toggle_focus_moons(&mut self) {
        if let Some(id) = self.camera_focus.point() {
            let body = self.planetarium.orrery().get_body(id);
            let (name, visible) = (body.info.name.clone(), body.moons_visible);
            self.planetarium.set_body_moons_visible(&name, !visible);
        }
    }

    /// Converts a cursor position in pixels to normalized device coordinates.
    pub fn pixel_to_ndc(&self, pixel: &Vector2<f64>) -> Point2<f64> {
        let (w, h) = (self.window_size.x.max(1.0), self.window_size.y.max(1.0));
        Point2::new(2.0 * pixel.x / w - 1.0, 1.0 - 2.0 * pixel.y / h)
    }

    fn update_scene_objects(&mut self) {
        // Stars at the centre of a system shimmer on the unscaled clock, so
        // they keep going while the orbits are paused
        let shimmer = self.planetarium.scene().shader_time() * STAR_SHIMMER_RATE;
        let brightness = 0.9 + 0.1 * shimmer.sin() as f32;

        let orrery = self.planetarium.orrery();
        for (id, node) in self.surface_nodes.iter_mut() {
            let surface = orrery.get_surface(*id);
            let info = &orrery.get_body(surface.owner).info;
            if surface.kind == SurfaceKind::Ground && info.is_stationary() {
                let c = info.color * brightness;
                node.set_color(c.x, c.y, c.z);
            }

            let position = orrery.world_position(surface.owner);
            node.set_local_translation(Translation3::from(to_f32(position).coords));
            node.set_local_rotation(UnitQuaternion::from_axis_angle(
                &Vector3::y_axis(),
                surface.spin as f32,
            ));
            node.set_visible(orrery.is_visible(surface.owner));
        }

        self.camera.sync(self.planetarium.viewpoint());
    }

    pub fn prerender_scene(&mut self, window: &mut Window, controller: &Controller) {
        self.window_size = Vector2::new(window.width() as f64, window.height() as f64);

        self.draw_orbits();
        self.draw_constellations();
        self.highlight_selected_star();

        // Draw text
        let default_font = kiss3d::text::Font::default();
        let text_color = Point3::new(1.0, 1.0, 1.0);
        window.draw_text(
            &self.left_hand_text(),
            &Point2::origin(),
            60.0,
            &default_font,
            &text_color,
        );
        window.draw_text(
            &self.time_summary_text(controller),
            // no idea why i have to multiply by 2.0, but there it is
            &Point2::new(window.width() as f32 * 2.0 - 600.0, 0.0),
            60.0,
            &default_font,
            &text_color,
        );
    }

    fn draw_orbits(&mut self) {
        let orrery = self.planetarium.orrery();
        for body in orrery.bodies() {
            if !orrery.is_orbit_line_visible(body.id) {
                continue;
            }
            let center = match body.parent {
                Some(p) => orrery.world_position(p),
                None => Point3::origin(),
            };
            // Dim the body colour so the line doesn't compete with the body
            let color = Point3::from(body.info.color.coords * 0.5);
            self.renderer
                .draw_orbit(to_f32(center), body.info.distance as f32, color);
        }
    }

    fn draw_constellations(&mut self) {
        let selected = match self.planetarium.selection() {
            Some(EntityRef::Constellation { id, .. }) => Some(id),
            _ => None,
        };
        for constellation in self.planetarium.sky().constellations() {
            let mut color = constellation.record.color;
            if Some(constellation.id) != selected {
                color = Point3::from(color.coords * 0.6);
            }
            for (a, b) in constellation.lines.iter() {
                self.renderer.draw_line(to_f32(*a), to_f32(*b), color);
            }
        }
    }

    fn highlight_selected_star(&mut self) {
        let stars = self.planetarium.sky().stars();
        for (star, node) in stars.iter().zip(self.star_nodes.iter_mut()) {
            let scale = match self.planetarium.selection() {
                Some(EntityRef::Star(id)) if id == star.id => 2.0,
                _ => 1.0,
            };
            node.set_local_scale(scale, scale, scale);
        }
    }

    fn left_hand_text(&self) -> String {
        let focus = match self.planetarium.camera_mode() {
            CameraMode::Free => String::from("Free"),
            CameraMode::Tracking { body, .. } => {
                format!("Tracking {}", self.planetarium.orrery().get_body(*body).info.name)
            }
            CameraMode::Surface { body } => {
                format!("Surface of {}", self.planetarium.orrery().get_body(*body).info.name)
            }
        };

        let selection = match self.planetarium.selection() {
            None => String::from("Nothing selected"),
            Some(entity) => match self.planetarium.describe(entity) {
                Some(entry) => {
                    let part = match entity {
                        EntityRef::Constellation {
                            marker: MarkerRef::Star(i),
                            id,
                        } => {
                            let c = self.planetarium.sky().get_constellation(id);
                            format!(" ({})", c.record.stars[i].name)
                        }
                        _ => String::new(),
                    };
                    format!(
                        "{}{}\n{}",
                        entry.name(),
                        part,
                        wrap(entry.description().unwrap_or("No description available."), 48)
                    )
                }
                None => String::from("Nothing selected"),
            },
        };

        format!("Camera: {}\n\n{}", focus, selection)
    }

    fn time_summary_text(&self, controller: &Controller) -> String {
        format!(
            "Time: {:.2}
Time scale: {}{}
FPS: {:.0}",
            self.planetarium.scene().simulated_time(),
            controller.time_scale(),
            if controller.is_paused() { " (paused)" } else { "" },
            controller.fps(),
        )
    }

    pub fn cameras_and_effect_and_renderer(
        &mut self,
    ) -> (
        Option<&mut dyn Camera>,
        Option<&mut dyn PlanarCamera>,
        Option<&mut dyn Renderer>,
        Option<&mut dyn PostProcessingEffect>,
    ) {
        (Some(&mut self.camera), None, Some(&mut self.renderer), None)
    }
}

fn to_f32(p: Point3<f64>) -> Point3<f32> {
    nalgebra::convert(p)
}

// Greedy word wrap, for the description panel
fn wrap(text: &str, width: usize) -> String {
    let mut lines = vec![String::new()];
    for word in text.split_whitespace() {
        let needs_break = lines
            .last()
            .map_or(false, |l| !l.is_empty() && l.len() + 1 + word.len() > width);
        if needs_break {
            lines.push(String::new());
        }
        if let Some(line) = lines.last_mut() {
            if !line.is_empty() {
                line.push(' ');
            }
            line.push_str(word);
        }
    }
    lines.join("\n")
}
