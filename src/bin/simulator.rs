use clap::Parser;
use kiss3d::light::Light;
use kiss3d::window::Window;
use rand::rngs::StdRng;
use rand::SeedableRng;

use rust_orrery::config::SimulationConfig;
use rust_orrery::file::read_catalog;
use rust_orrery::gui::Simulation;
use rust_orrery::model::Planetarium;

/// Interactive solar system viewer.
///
/// Keys: Q/E cycle focus, V surface view, X detach, ,/. slow down/speed up,
/// R reverse, Space pause, O orbits, M moons, N moons of focused body,
/// WASD and -/= move the camera. Drag to orbit, right-drag to pan, click to
/// select.
#[derive(Debug, Parser)]
struct Args {
    /// Body catalog to load
    #[arg(long, default_value = "solar-system.txt")]
    catalog: String,
    /// Simulated time units per real second
    #[arg(long, default_value_t = 1.0, allow_negative_numbers = true)]
    time_scale: f64,
    /// Seed for the initial orbital phases
    #[arg(long)]
    seed: Option<u64>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let config = SimulationConfig {
        time_scale: args.time_scale,
        ..SimulationConfig::default()
    };
    let mut rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_rng(&mut rand::rng()),
    };

    let catalog = read_catalog(&args.catalog)?;
    let planetarium = Planetarium::new(&catalog, &config, &mut rng)?;

    let mut window = Window::new("Orrery");
    window.set_light(Light::StickToCamera);
    window.set_framerate_limit(Some(60));
    window.set_background_color(0.0, 0.0, 0.02);

    let simulation = Simulation::new(planetarium, &mut window);
    window.render_loop(simulation);
    Ok(())
}
