use std::f64::consts::TAU;

use nalgebra::{Point3, Vector3};

use crate::catalog::{CatalogError, Metadata};
use crate::math::angle::{circular_orbit_position, normalize_angle};

#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct BodyID(pub usize);

#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct SurfaceID(pub usize);

/// Auxiliary shells wrapped around a body, each slightly larger than the last.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq)]
pub enum SurfaceKind {
    Ground,
    Clouds,
    Glow,
}

// All the immutable info about a body
#[derive(Debug, Clone)]
pub struct BodyInfo {
    pub name: String,
    pub radius: f64,
    /// Orbital radius around the parent. Zero for a body that doesn't orbit.
    pub distance: f64,
    /// Zero marks a stationary body.
    pub period: f64,
    pub color: Point3<f32>,
    pub texture: Option<String>,
    pub shells: Vec<SurfaceKind>,
    pub metadata: Metadata,
}

/// One renderable, pickable sphere. Every body has a ground surface and
/// optionally a few shells; all of them resolve back to `owner`.
#[derive(Debug, Clone)]
pub struct Surface {
    pub id: SurfaceID,
    pub owner: BodyID,
    pub kind: SurfaceKind,
    pub radius: f64,
    /// Radians per unit of simulated time.
    pub spin_rate: f64,
    /// Current self-rotation about the local y axis.
    pub spin: f64,
}

#[derive(Debug, Clone)]
pub struct Body {
    pub id: BodyID,
    pub info: BodyInfo,
    pub parent: Option<BodyID>,
    pub moons: Vec<BodyID>,
    pub surfaces: Vec<SurfaceID>,
    /// Orbital phase in [0, 2pi).
    pub angle: f64,
    /// Offset from the parent's anchor. Derived from `angle` on every update.
    pub local_position: Vector3<f64>,
    pub orbit_visible: bool,
    pub moons_visible: bool,
}

impl SurfaceKind {
    pub fn radius_factor(&self) -> f64 {
        match self {
            SurfaceKind::Ground => 1.0,
            SurfaceKind::Clouds => 1.005,
            SurfaceKind::Glow => 1.025,
        }
    }

    /// Multiplier on the body's spin rate. Clouds drift slightly faster than
    /// the ground; the glow doesn't rotate.
    pub fn spin_factor(&self) -> f64 {
        match self {
            SurfaceKind::Ground => 1.0,
            SurfaceKind::Clouds => 1.1,
            SurfaceKind::Glow => 0.0,
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "clouds" => Some(SurfaceKind::Clouds),
            "glow" => Some(SurfaceKind::Glow),
            _ => None,
        }
    }
}

impl BodyInfo {
    /// Checks the orbital parameters. Every field must be finite.
    pub fn validate(&self) -> Result<(), CatalogError> {
        let out_of_range = |field, requirement, value| CatalogError::OutOfRange {
            name: self.name.clone(),
            field,
            requirement,
            value,
        };

        if !(self.radius.is_finite() && self.radius > 0.0) {
            return Err(out_of_range("radius", "finite and positive", self.radius));
        }
        if !(self.distance.is_finite() && self.distance >= 0.0) {
            return Err(out_of_range("distance", "finite and non-negative", self.distance));
        }
        if !(self.period.is_finite() && self.period >= 0.0) {
            return Err(out_of_range("period", "finite and non-negative", self.period));
        }
        // The orbital rate is 1/period, which must be finite too
        if self.period > 0.0 && !self.period.recip().is_finite() {
            return Err(out_of_range("period", "zero or not too small", self.period));
        }
        Ok(())
    }

    pub fn is_stationary(&self) -> bool {
        self.period == 0.0
    }

    pub fn has_shell(&self, kind: SurfaceKind) -> bool {
        self.shells.contains(&kind)
    }
}

impl Body {
    pub fn new(id: BodyID, info: BodyInfo, parent: Option<BodyID>, angle: f64) -> Self {
        let angle = normalize_angle(angle);
        let local_position = circular_orbit_position(info.distance, angle);
        Body {
            id,
            info,
            parent,
            moons: Vec::new(),
            surfaces: Vec::new(),
            angle,
            local_position,
            orbit_visible: true,
            moons_visible: true,
        }
    }

    /// Advances the orbital phase by `dt` units of simulated time and
    /// recomputes the local position. A stationary body keeps its phase.
    ///
    /// The phase stays finite for any finite `dt`: whole orbits are dropped
    /// before the rate is applied, and a step that still overflows is skipped.
    pub fn advance(&mut self, dt: f64, speed_constant: f64) {
        if !self.info.is_stationary() {
            let rate = self.info.period.recip() * speed_constant;
            let orbit_time = TAU / rate;
            let dt = if orbit_time.is_finite() && orbit_time != 0.0 {
                dt % orbit_time
            } else {
                dt
            };

            let step = rate * dt;
            if step.is_finite() {
                self.angle = normalize_angle(self.angle + step);
            } else {
                log::warn!("{}: skipping non-finite phase step {}", self.info.name, step);
            }
        }
        self.local_position = circular_orbit_position(self.info.distance, self.angle);
    }

    pub fn has_orbit(&self) -> bool {
        self.info.distance > 0.0
    }
}

impl Surface {
    pub fn advance(&mut self, dt: f64) {
        let step = self.spin_rate * dt;
        if step.is_finite() {
            self.spin = normalize_angle(self.spin + step);
        }
    }
}
