use std::fs;
use std::path::Path;

use clap::Parser;
use plotters::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;

use rust_orrery::config::SimulationConfig;
use rust_orrery::file::read_catalog;
use rust_orrery::model::{BodyID, Planetarium};

/// Runs the orrery without a window and plots the path of every body in the
/// orbital plane.
#[derive(Debug, Parser)]
struct Args {
    #[arg(long, default_value = "solar-system.txt")]
    catalog: String,
    /// Number of 1/60 s frames to simulate
    #[arg(long, default_value_t = 3600)]
    frames: usize,
    #[arg(long, default_value_t = 1.0, allow_negative_numbers = true)]
    time_scale: f64,
    #[arg(long, default_value_t = 0)]
    seed: u64,
    #[arg(long, default_value = "plots/trace.png")]
    output: String,
}

const FRAME_DT: f64 = 1.0 / 60.0;

struct Trace {
    name: String,
    color: RGBColor,
    points: Vec<(f32, f32)>,
}

pub fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let config = SimulationConfig {
        time_scale: args.time_scale,
        ..SimulationConfig::default()
    };
    let mut rng = StdRng::seed_from_u64(args.seed);
    let catalog = read_catalog(&args.catalog)?;
    let mut planetarium = Planetarium::new(&catalog, &config, &mut rng)?;

    let ids: Vec<BodyID> = planetarium.orrery().bodies().map(|b| b.id).collect();
    let mut traces: Vec<Trace> = ids
        .iter()
        .map(|&id| {
            let info = &planetarium.orrery().get_body(id).info;
            Trace {
                name: info.name.clone(),
                color: to_rgb(&info.color),
                points: Vec::with_capacity(args.frames + 1),
            }
        })
        .collect();

    for frame in 0..=args.frames {
        if frame > 0 {
            planetarium.advance(FRAME_DT);
        }
        for (trace, &id) in traces.iter_mut().zip(ids.iter()) {
            let p = planetarium.orrery().world_position(id);
            trace.points.push((p.x as f32, p.z as f32));
        }
    }

    log::info!(
        "Simulated {} frames ({:.3} time units), writing {}",
        args.frames,
        planetarium.scene().simulated_time(),
        args.output
    );
    if let Some(dir) = Path::new(&args.output).parent() {
        fs::create_dir_all(dir)?;
    }
    draw_plot(&args.output, &traces)
}

fn to_rgb(color: &nalgebra::Point3<f32>) -> RGBColor {
    let channel = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
    RGBColor(channel(color.x), channel(color.y), channel(color.z))
}

fn draw_plot(name: &str, traces: &[Trace]) -> Result<(), Box<dyn std::error::Error>> {
    // Square bounds, so circles stay circles
    let extent = traces
        .iter()
        .flat_map(|t| t.points.iter())
        .fold(1.0f32, |acc, &(x, z)| acc.max(x.abs()).max(z.abs()))
        * 1.05;

    let root = BitMapBackend::new(name, (800, 800)).into_drawing_area();
    root.fill(&WHITE)?;
    let mut chart = ChartBuilder::on(&root)
        .margin(5)
        .x_label_area_size(30)
        .y_label_area_size(40)
        .build_cartesian_2d(-extent..extent, -extent..extent)?;

    chart.configure_mesh().x_desc("x").y_desc("z").draw()?;

    for trace in traces {
        let color = trace.color;
        chart
            .draw_series(LineSeries::new(trace.points.iter().copied(), &color))?
            .label(trace.name.as_str())
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color));
    }

    chart
        .configure_series_labels()
        .background_style(&WHITE.mix(0.8))
        .border_style(&BLACK)
        .draw()?;

    Ok(())
}
