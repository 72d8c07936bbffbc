use kiss3d::camera::Camera;
use kiss3d::renderer::{LineRenderer, Renderer};
use nalgebra::Point3;

use self::utils::{circle_points, draw_path};

mod utils;

const ORBIT_SEGMENTS: usize = 128;

/// Immediate-mode lines: orbit circles and constellation figures. Everything
/// queued is drawn once and then forgotten.
pub struct OverlayRenderer {
    line_renderer: LineRenderer,
}

impl OverlayRenderer {
    pub fn new() -> Self {
        OverlayRenderer {
            line_renderer: LineRenderer::new(),
        }
    }

    pub fn draw_orbit(&mut self, center: Point3<f32>, radius: f32, color: Point3<f32>) {
        draw_path(
            &mut self.line_renderer,
            circle_points(center, radius, ORBIT_SEGMENTS),
            &color,
        );
    }

    pub fn draw_line(&mut self, a: Point3<f32>, b: Point3<f32>, color: Point3<f32>) {
        self.line_renderer.draw_line(a, b, color);
    }
}

impl Renderer for OverlayRenderer {
    fn render(&mut self, pass: usize, camera: &mut dyn Camera) {
        self.line_renderer.render(pass, camera);
    }
}
