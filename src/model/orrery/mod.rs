use std::collections::HashMap;
use std::f64::consts::TAU;

use nalgebra::Point3;
use rand::Rng;

use crate::catalog::{BodyRecord, CatalogError};
use crate::config::SimulationConfig;

mod body;

pub use body::{Body, BodyID, BodyInfo, Surface, SurfaceID, SurfaceKind};

/// Arena holding every body in the scene, as a forest of orbit trees.
///
/// Bodies are stored in depth-first catalog order and never removed, so a
/// `BodyID` stays valid for the lifetime of the orrery. World positions are
/// cached and only change in `update`.
#[derive(Debug, Clone)]
pub struct Orrery {
    bodies: Vec<Body>,
    roots: Vec<BodyID>,
    surfaces: Vec<Surface>,
    world_positions: Vec<Point3<f64>>,
    names: HashMap<String, BodyID>,
    speed_constant: f64,
    spin_rate: f64,
}

impl Orrery {
    pub fn new(speed_constant: f64, spin_rate: f64) -> Self {
        Orrery {
            bodies: Vec::new(),
            roots: Vec::new(),
            surfaces: Vec::new(),
            world_positions: Vec::new(),
            names: HashMap::new(),
            speed_constant,
            spin_rate,
        }
    }

    /// Builds the body tree from catalog records. Each body starts at a
    /// random phase so that siblings aren't lined up. Fails on the first
    /// invalid record.
    pub fn from_records<R: Rng + ?Sized>(
        records: &[BodyRecord],
        config: &SimulationConfig,
        rng: &mut R,
    ) -> Result<Self, CatalogError> {
        let mut orrery = Orrery::new(config.speed_constant, config.spin_rate);
        for record in records.iter() {
            orrery.add_record(record, None, rng)?;
        }
        log::info!(
            "Built orrery with {} bodies ({} roots)",
            orrery.bodies.len(),
            orrery.roots.len()
        );
        Ok(orrery)
    }

    fn add_record<R: Rng + ?Sized>(
        &mut self,
        record: &BodyRecord,
        parent: Option<BodyID>,
        rng: &mut R,
    ) -> Result<BodyID, CatalogError> {
        let angle = rng.random_range(0.0..TAU);
        let id = self.add_body(record.info.clone(), parent, angle)?;
        for moon in record.moons.iter() {
            self.add_record(moon, Some(id), rng)?;
        }
        Ok(id)
    }

    /// Adds a body orbiting `parent` (or nothing, for a root) at phase `angle`.
    pub fn add_body(
        &mut self,
        info: BodyInfo,
        parent: Option<BodyID>,
        angle: f64,
    ) -> Result<BodyID, CatalogError> {
        info.validate()?;

        let siblings = match parent {
            Some(p) => &self.bodies[p.0].moons,
            None => &self.roots,
        };
        if siblings.iter().any(|s| self.bodies[s.0].info.name == info.name) {
            return Err(CatalogError::DuplicateName { name: info.name });
        }

        if info.is_stationary() && info.distance > 0.0 {
            log::warn!(
                "{} has period 0 but distance {}; it will never move",
                info.name,
                info.distance
            );
        }

        let id = BodyID(self.bodies.len());
        let mut body = Body::new(id, info, parent, angle);

        for kind in std::iter::once(SurfaceKind::Ground).chain(body.info.shells.iter().copied()) {
            let spin_rate = if body.info.is_stationary() {
                0.0
            } else {
                self.spin_rate * kind.spin_factor()
            };
            let surface_id = SurfaceID(self.surfaces.len());
            self.surfaces.push(Surface {
                id: surface_id,
                owner: id,
                kind,
                radius: body.info.radius * kind.radius_factor(),
                spin_rate,
                spin: 0.0,
            });
            body.surfaces.push(surface_id);
        }

        let anchor = match parent {
            Some(p) => self.world_positions[p.0],
            None => Point3::origin(),
        };
        self.world_positions.push(anchor + body.local_position);

        match parent {
            Some(p) => self.bodies[p.0].moons.push(id),
            None => self.roots.push(id),
        }
        // First one wins, which is the first in depth-first catalog order
        self.names.entry(body.info.name.clone()).or_insert(id);
        self.bodies.push(body);

        Ok(id)
    }

    /// Advances every body by `dt` units of simulated time.
    ///
    /// Parents are always visited before their moons, so each moon composes
    /// its local offset with its parent's position from this same frame.
    pub fn update(&mut self, dt: f64) {
        let mut stack: Vec<BodyID> = self.roots.iter().rev().copied().collect();
        while let Some(id) = stack.pop() {
            let body = &mut self.bodies[id.0];
            body.advance(dt, self.speed_constant);

            let anchor = match body.parent {
                Some(p) => self.world_positions[p.0],
                None => Point3::origin(),
            };
            self.world_positions[id.0] = anchor + body.local_position;

            stack.extend(body.moons.iter().rev());
        }

        for surface in self.surfaces.iter_mut() {
            surface.advance(dt);
        }
    }

    pub fn get_body(&self, id: BodyID) -> &Body {
        &self.bodies[id.0]
    }

    pub fn try_get_body(&self, id: BodyID) -> Option<&Body> {
        self.bodies.get(id.0)
    }

    pub fn bodies(&self) -> impl Iterator<Item = &Body> + '_ {
        self.bodies.iter()
    }

    pub fn get_parent(&self, id: BodyID) -> Option<BodyID> {
        self.bodies[id.0].parent
    }

    pub fn find_body(&self, name: &str) -> Option<BodyID> {
        self.names.get(name).copied()
    }

    pub fn world_position(&self, id: BodyID) -> Point3<f64> {
        self.world_positions[id.0]
    }

    pub fn surfaces(&self) -> impl Iterator<Item = &Surface> + '_ {
        self.surfaces.iter()
    }

    pub fn get_surface(&self, id: SurfaceID) -> &Surface {
        &self.surfaces[id.0]
    }

    pub fn surface_owner(&self, id: SurfaceID) -> BodyID {
        self.surfaces[id.0].owner
    }

    /// Number of ancestors; roots have depth 0.
    pub fn depth(&self, id: BodyID) -> usize {
        let mut depth = 0;
        let mut current = self.get_parent(id);
        while let Some(p) = current {
            depth += 1;
            current = self.get_parent(p);
        }
        depth
    }

    pub fn set_orbit_lines_visible(&mut self, visible: bool) {
        for body in self.bodies.iter_mut() {
            body.orbit_visible = visible;
        }
    }

    pub fn set_moons_visible(&mut self, visible: bool) {
        for body in self.bodies.iter_mut() {
            body.moons_visible = visible;
        }
    }

    /// Shows or hides the moons of a single body. Descendants keep their own
    /// flags, so showing them again restores that subtree as it was.
    pub fn set_body_moons_visible(&mut self, id: BodyID, visible: bool) {
        self.bodies[id.0].moons_visible = visible;
    }

    /// A body is visible when none of its ancestors hide their moons.
    pub fn is_visible(&self, id: BodyID) -> bool {
        let mut current = self.get_parent(id);
        while let Some(p) = current {
            if !self.bodies[p.0].moons_visible {
                return false;
            }
            current = self.get_parent(p);
        }
        true
    }

    pub fn is_orbit_line_visible(&self, id: BodyID) -> bool {
        let body = &self.bodies[id.0];
        body.has_orbit() && body.orbit_visible && self.is_visible(id)
    }
}
