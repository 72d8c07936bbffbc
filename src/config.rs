use nalgebra::Point3;

/// Tunables for the simulation core. The defaults reproduce the look of the
/// reference solar system; binaries override individual fields from the
/// command line.
#[derive(Debug, Clone)]
pub struct SimulationConfig {
    /// Maps catalog period units to radians of phase per unit time.
    pub speed_constant: f64,
    /// Radians of surface spin per unit of simulated time.
    pub spin_rate: f64,
    /// Largest real-time step a single frame may take, in seconds.
    pub max_frame_delta: f64,
    pub time_scale: f64,
    /// A pointer release farther than this (in pixels) from its press is a drag.
    pub click_drag_threshold: f64,
    /// How close (world units) a ray must pass to a constellation line to hit it.
    pub line_pick_tolerance: f64,
    pub camera: CameraConfig,
}

#[derive(Debug, Clone)]
pub struct CameraConfig {
    pub initial_eye: Point3<f64>,
    pub initial_target: Point3<f64>,
    pub fovy: f64,
    pub aspect: f64,
    pub znear: f64,
    pub zfar: f64,
    /// Tracking starts this many body radii away from the body.
    pub focus_distance_factor: f64,
    /// Height above the surface for the surface view.
    pub surface_clearance: f64,
    /// Distance from the origin to place the eye when looking at a static
    /// point. Inside the star shell, so the sky stays in front of the camera.
    pub static_focus_distance: f64,
    pub min_distance: f64,
    pub max_distance: f64,
    /// Keeps the orbit controls away from the poles, where `up` degenerates.
    pub phi_limit: f64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        SimulationConfig {
            speed_constant: 0.5,
            spin_rate: 0.5,
            max_frame_delta: 0.1,
            time_scale: 1.0,
            click_drag_threshold: 10.0,
            line_pick_tolerance: 60.0,
            camera: CameraConfig::default(),
        }
    }
}

impl Default for CameraConfig {
    fn default() -> Self {
        CameraConfig {
            initial_eye: Point3::new(0.0, 100.0, 400.0),
            initial_target: Point3::origin(),
            fovy: 60f64.to_radians(),
            aspect: 16.0 / 9.0,
            znear: 0.1,
            zfar: 100_000.0,
            focus_distance_factor: 5.0,
            surface_clearance: 2.0,
            static_focus_distance: 40_000.0,
            min_distance: 0.5,
            max_distance: 60_000.0,
            phi_limit: 0.001,
        }
    }
}
