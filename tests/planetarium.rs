use approx::assert_relative_eq;
use nalgebra::{Point2, Point3, Vector3};
use rand::rngs::StdRng;
use rand::SeedableRng;

mod common;

use common::phase_change;
use rust_orrery::catalog::{Catalog, CatalogError, Presentable};
use rust_orrery::config::SimulationConfig;
use rust_orrery::file::{parse_catalog, read_catalog};
use rust_orrery::math::angle::normalize_angle;
use rust_orrery::model::{CameraMode, EntityRef, Planetarium, SurfaceKind};

const FRAME: f64 = 1.0 / 60.0;

fn solar_system() -> Planetarium {
    let catalog = read_catalog("solar-system.txt").unwrap();
    let mut rng = StdRng::seed_from_u64(42);
    Planetarium::new(&catalog, &SimulationConfig::default(), &mut rng).unwrap()
}

#[test]
fn test_earth_closed_form() {
    let mut p = solar_system();
    let earth = p.orrery().find_body("Earth").unwrap();
    let initial = p.orrery().get_body(earth).angle;

    let frames = 600;
    for _ in 0..frames {
        assert_relative_eq!(p.advance(FRAME), FRAME);
    }

    let angle = normalize_angle(initial + 0.5 * FRAME * frames as f64);
    assert_relative_eq!(
        phase_change(angle, p.orrery().get_body(earth).angle),
        0.0,
        epsilon = 1e-9
    );
    assert_relative_eq!(
        p.orrery().world_position(earth),
        Point3::new(130.0 * angle.cos(), 0.0, 130.0 * angle.sin()),
        epsilon = 1e-6
    );
    assert_relative_eq!(p.scene().simulated_time(), 10.0, epsilon = 1e-9);
}

#[test]
fn test_frame_clock() {
    let mut p = solar_system();
    let earth = p.orrery().find_body("Earth").unwrap();
    let sun = p.orrery().find_body("Sun").unwrap();

    // Nothing moves on an empty frame
    let before = p.orrery().world_position(earth);
    assert_eq!(p.advance(0.0), 0.0);
    assert_eq!(p.orrery().world_position(earth), before);

    // A long stall is capped
    assert_relative_eq!(p.advance(5.0), 0.1);
    assert_eq!(p.advance(-1.0), 0.0);
    assert_eq!(p.advance(f64::NAN), 0.0);

    // Running backwards
    p.set_time_scale(-2.0);
    let angle = p.orrery().get_body(earth).angle;
    let sun_angle = p.orrery().get_body(sun).angle;
    assert_relative_eq!(p.advance(FRAME), -2.0 * FRAME);
    assert_relative_eq!(
        phase_change(angle, p.orrery().get_body(earth).angle),
        -0.5 * 2.0 * FRAME,
        epsilon = 1e-12
    );
    assert_eq!(p.orrery().get_body(sun).angle, sun_angle);
}

#[test]
fn test_tracking_keeps_offset() {
    let mut p = solar_system();
    let earth = p.orrery().find_body("Earth").unwrap();

    p.focus_on_body("Earth");
    assert_eq!(
        *p.camera_mode(),
        CameraMode::Tracking {
            body: earth,
            last_position: p.orrery().world_position(earth),
        }
    );
    // Five radii out, half as high
    let offset = Vector3::new(10.0, 5.0, 10.0);
    assert_relative_eq!(
        p.viewpoint().eye - p.orrery().world_position(earth),
        offset,
        epsilon = 1e-9
    );

    for _ in 0..300 {
        p.advance(FRAME);
        let position = p.orrery().world_position(earth);
        assert_relative_eq!(p.viewpoint().target, position, epsilon = 1e-9);
        assert_relative_eq!(p.viewpoint().eye - position, offset, epsilon = 1e-9);
    }

    // Orbit controls move the eye relative to the target, and tracking
    // carries the new offset along
    p.zoom(2.0);
    let offset = p.viewpoint().eye - p.viewpoint().target;
    assert_relative_eq!(offset.norm(), 30.0, epsilon = 1e-9);
    p.advance(FRAME);
    assert_relative_eq!(
        p.viewpoint().eye - p.orrery().world_position(earth),
        offset,
        epsilon = 1e-9
    );
}

#[test]
fn test_focus_and_detach() {
    let mut p = solar_system();
    let eye = p.viewpoint().eye;

    p.focus_on_body("Vulcan");
    assert_eq!(*p.camera_mode(), CameraMode::Free);
    assert_eq!(p.viewpoint().eye, eye);

    p.focus_on_body("Mars");
    assert!(matches!(p.camera_mode(), CameraMode::Tracking { .. }));

    p.detach_camera();
    assert_eq!(*p.camera_mode(), CameraMode::Free);
    let eye = p.viewpoint().eye;
    p.advance(FRAME);
    assert_eq!(p.viewpoint().eye, eye);
}

#[test]
fn test_surface_view() {
    let mut p = solar_system();
    let earth = p.orrery().find_body("Earth").unwrap();

    p.set_surface_view("Earth");
    for _ in 0..10 {
        p.advance(FRAME);
        let position = p.orrery().world_position(earth);
        let outward = position.coords.normalize();
        assert_relative_eq!(p.viewpoint().eye, position - outward * 4.0, epsilon = 1e-9);
        assert_eq!(p.viewpoint().target, Point3::origin());
    }

    // Orbit controls are locked out
    let eye = p.viewpoint().eye;
    p.orbit(0.5, 0.5);
    p.zoom(3.0);
    p.pan(1.0, 1.0);
    assert_eq!(p.viewpoint().eye, eye);

    p.detach_camera();
    assert_eq!(*p.camera_mode(), CameraMode::Free);
}

#[test]
fn test_body_in_front_of_sky() {
    let mut p = solar_system();
    let earth = p.orrery().find_body("Earth").unwrap();
    p.focus_on_body("Earth");
    p.advance(FRAME);

    // Straight through the middle of the screen there is Earth, and far
    // behind it the sky. Earth wins.
    assert_eq!(p.pick(&Point2::origin()), Some(EntityRef::Body(earth)));
    assert_eq!(p.select(&Point2::origin()), Some(EntityRef::Body(earth)));
    assert_eq!(p.selection(), Some(EntityRef::Body(earth)));

    let entry = p.describe(EntityRef::Body(earth)).unwrap();
    assert_eq!(entry.name(), "Earth");
    assert!(entry.description().is_some());
}

#[test]
fn test_hidden_moons_are_not_pickable() {
    let mut p = solar_system();
    let moon = p.orrery().find_body("Moon").unwrap();
    p.focus_on_body("Moon");
    p.advance(0.0);
    assert_eq!(p.pick(&Point2::origin()), Some(EntityRef::Body(moon)));

    p.set_body_moons_visible("Earth", false);
    assert!(!p.orrery().is_visible(moon));
    assert_ne!(p.pick(&Point2::origin()), Some(EntityRef::Body(moon)));

    p.set_body_moons_visible("Earth", true);
    assert_eq!(p.pick(&Point2::origin()), Some(EntityRef::Body(moon)));
}

#[test]
fn test_earth_shells_and_view_vector() {
    let mut p = solar_system();
    let earth = p.orrery().find_body("Earth").unwrap();
    let kinds: Vec<SurfaceKind> = p
        .orrery()
        .get_body(earth)
        .surfaces
        .iter()
        .map(|&s| p.orrery().get_surface(s).kind)
        .collect();
    assert_eq!(
        kinds,
        vec![SurfaceKind::Ground, SurfaceKind::Clouds, SurfaceKind::Glow]
    );

    p.advance(FRAME);
    let v = p.scene().view_vector(earth).unwrap();
    assert_relative_eq!(v, p.viewpoint().eye - p.orrery().world_position(earth));

    let mars = p.orrery().find_body("Mars").unwrap();
    assert_eq!(p.scene().view_vector(mars), None);
}

#[test]
fn test_catalog_errors() {
    assert!(matches!(
        read_catalog("no-such-catalog.txt"),
        Err(CatalogError::Io { .. })
    ));

    let records = parse_catalog(
        "name radius distance period color parent shells texture\n\
         Sun 25 0 0 ffff00 - - -\n\
         Sun 20 0 0 ffff00 - - -\n",
    )
    .unwrap();
    let catalog = Catalog::with_builtin_sky(records);
    let mut rng = StdRng::seed_from_u64(0);
    assert!(matches!(
        Planetarium::new(&catalog, &SimulationConfig::default(), &mut rng),
        Err(CatalogError::DuplicateName { .. })
    ));
}

#[test]
fn test_extreme_time_scale_recovers() {
    let mut p = solar_system();
    let io = p.orrery().find_body("Io").unwrap();

    p.set_time_scale(1e308);
    p.advance(0.1);
    for body in p.orrery().bodies() {
        assert!(body.angle.is_finite(), "{} has phase {}", body.info.name, body.angle);
        assert!(p.orrery().world_position(body.id).iter().all(|x| x.is_finite()));
    }
    assert!(p.viewpoint().eye.iter().all(|x| x.is_finite()));

    // Back to normal speed, Io moves at its usual rate again
    p.set_time_scale(1.0);
    let angle = p.orrery().get_body(io).angle;
    p.advance(FRAME);
    assert_relative_eq!(
        phase_change(angle, p.orrery().get_body(io).angle),
        0.5 / 0.005 * FRAME,
        epsilon = 1e-9
    );
}
