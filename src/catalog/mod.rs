//! Static descriptions of everything in the scene. Records are consumed once
//! when the scene is built; afterwards they are only read back for
//! presentation.

use nalgebra::Point3;

use crate::model::BodyInfo;

mod error;
mod sky_data;

pub use error::CatalogError;
pub use sky_data::{major_constellations, major_stars};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Link {
    pub title: String,
    pub url: String,
}

/// Free-form presentation data. None of it affects the simulation.
#[derive(Debug, Clone, Default)]
pub struct Metadata {
    pub description: Option<String>,
    pub images: Vec<String>,
    pub links: Vec<Link>,
}

/// Anything that can be shown in an info panel.
pub trait Presentable {
    fn name(&self) -> &str;
    fn metadata(&self) -> &Metadata;

    fn description(&self) -> Option<&str> {
        self.metadata().description.as_deref()
    }

    fn images(&self) -> &[String] {
        &self.metadata().images
    }

    fn links(&self) -> &[Link] {
        &self.metadata().links
    }
}

/// A body and, recursively, the moons that orbit it.
#[derive(Debug, Clone)]
pub struct BodyRecord {
    pub info: BodyInfo,
    pub moons: Vec<BodyRecord>,
}

#[derive(Debug, Clone)]
pub struct StarRecord {
    pub name: String,
    pub ra_hours: f64,
    pub dec_degrees: f64,
    pub color: Point3<f32>,
    pub metadata: Metadata,
}

#[derive(Debug, Clone)]
pub struct ConstellationStar {
    pub name: String,
    pub ra_hours: f64,
    pub dec_degrees: f64,
}

#[derive(Debug, Clone)]
pub struct ConstellationRecord {
    pub name: String,
    pub stars: Vec<ConstellationStar>,
    /// Pairs of indices into `stars`.
    pub connections: Vec<(usize, usize)>,
    pub color: Point3<f32>,
    pub metadata: Metadata,
}

/// A borrowed view of one catalog record, tagged by what it describes.
#[derive(Debug, Clone, Copy)]
pub enum CatalogEntry<'a> {
    Body(&'a BodyInfo),
    Moon(&'a BodyInfo),
    Star(&'a StarRecord),
    ConstellationMarker(&'a ConstellationRecord),
}

#[derive(Debug, Clone, Default)]
pub struct Catalog {
    pub bodies: Vec<BodyRecord>,
    pub stars: Vec<StarRecord>,
    pub constellations: Vec<ConstellationRecord>,
}

impl BodyRecord {
    pub fn new(info: BodyInfo) -> Self {
        BodyRecord {
            info,
            moons: Vec::new(),
        }
    }

    pub fn with_moon(mut self, moon: BodyRecord) -> Self {
        self.moons.push(moon);
        self
    }
}

impl Catalog {
    /// Pairs the given bodies with the built-in star and constellation tables.
    pub fn with_builtin_sky(bodies: Vec<BodyRecord>) -> Self {
        Catalog {
            bodies,
            stars: major_stars(),
            constellations: major_constellations(),
        }
    }
}

impl Presentable for BodyInfo {
    fn name(&self) -> &str {
        &self.name
    }

    fn metadata(&self) -> &Metadata {
        &self.metadata
    }
}

impl Presentable for StarRecord {
    fn name(&self) -> &str {
        &self.name
    }

    fn metadata(&self) -> &Metadata {
        &self.metadata
    }
}

impl Presentable for ConstellationRecord {
    fn name(&self) -> &str {
        &self.name
    }

    fn metadata(&self) -> &Metadata {
        &self.metadata
    }
}

impl Presentable for CatalogEntry<'_> {
    fn name(&self) -> &str {
        match self {
            CatalogEntry::Body(info) | CatalogEntry::Moon(info) => info.name(),
            CatalogEntry::Star(star) => star.name(),
            CatalogEntry::ConstellationMarker(c) => c.name(),
        }
    }

    fn metadata(&self) -> &Metadata {
        match self {
            CatalogEntry::Body(info) | CatalogEntry::Moon(info) => info.metadata(),
            CatalogEntry::Star(star) => star.metadata(),
            CatalogEntry::ConstellationMarker(c) => c.metadata(),
        }
    }
}

/// Parses a six-digit hex colour like `ffa500` (an optional leading `#` is
/// allowed) into RGB components in [0, 1].
pub fn parse_hex_color(s: &str) -> Option<Point3<f32>> {
    let s = s.strip_prefix('#').unwrap_or(s);
    if s.len() != 6 || !s.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    u32::from_str_radix(s, 16).ok().map(hex_color)
}

pub(crate) fn hex_color(rgb: u32) -> Point3<f32> {
    let channel = |shift: u32| ((rgb >> shift) & 0xff) as f32 / 255.0;
    Point3::new(channel(16), channel(8), channel(0))
}
