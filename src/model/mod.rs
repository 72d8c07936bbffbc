mod camera;
mod orrery;
mod picking;
mod planetarium;
mod scene;
mod sky;

pub use camera::{CameraController, CameraMode, Viewpoint};
pub use orrery::{Body, BodyID, BodyInfo, Orrery, Surface, SurfaceID, SurfaceKind};
pub use picking::{EntityRef, MarkerRef, PickResolver};
pub use planetarium::Planetarium;
pub use scene::SceneDriver;
pub use sky::{
    Constellation, ConstellationID, Sky, Star, StarID, CONSTELLATION_SHELL_RADIUS,
    CONSTELLATION_STAR_RADIUS, STAR_PICK_RADIUS, STAR_SHELL_RADIUS,
};
