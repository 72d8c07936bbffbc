use super::orrery::{BodyID, Orrery};
use super::sky::{
    ConstellationID, Sky, StarID, CONSTELLATION_STAR_RADIUS, STAR_PICK_RADIUS,
};
use crate::math::geometry::Ray;

/// What a pick landed on. Enough to look the entity back up for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityRef {
    Body(BodyID),
    Star(StarID),
    Constellation {
        id: ConstellationID,
        marker: MarkerRef,
    },
}

/// Which part of a constellation figure was hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MarkerRef {
    /// Index into the constellation's stars.
    Star(usize),
    /// Index into the constellation's drawn lines.
    Line(usize),
}

/// Resolves a ray into at most one entity.
///
/// Categories are tried in a fixed order: bodies, then background stars, then
/// constellation markers. A later category is only considered when every
/// earlier one missed entirely, no matter how far away the earlier hit was.
/// Within a category the nearest hit wins.
#[derive(Debug, Clone)]
pub struct PickResolver {
    line_tolerance: f64,
}

fn nearest<T>(hits: impl Iterator<Item = (f64, T)>) -> Option<T> {
    hits.min_by(|a, b| a.0.total_cmp(&b.0)).map(|(_, x)| x)
}

impl PickResolver {
    pub fn new(line_tolerance: f64) -> Self {
        PickResolver { line_tolerance }
    }

    pub fn pick(&self, ray: &Ray, orrery: &Orrery, sky: &Sky) -> Option<EntityRef> {
        self.pick_body(ray, orrery)
            .map(EntityRef::Body)
            .or_else(|| self.pick_star(ray, sky).map(EntityRef::Star))
            .or_else(|| self.pick_constellation(ray, sky))
    }

    /// Every surface of every visible body is one pool, so hitting a cloud
    /// layer selects the planet underneath.
    pub fn pick_body(&self, ray: &Ray, orrery: &Orrery) -> Option<BodyID> {
        let hits = orrery
            .surfaces()
            .filter(|s| orrery.is_visible(s.owner))
            .filter_map(|s| {
                let center = orrery.world_position(s.owner);
                ray.intersect_sphere(&center, s.radius).map(|t| (t, s.id))
            });
        nearest(hits).map(|surface| orrery.surface_owner(surface))
    }

    pub fn pick_star(&self, ray: &Ray, sky: &Sky) -> Option<StarID> {
        let hits = sky.stars().iter().filter_map(|star| {
            ray.intersect_sphere(&star.position, STAR_PICK_RADIUS)
                .map(|t| (t, star.id))
        });
        nearest(hits)
    }

    pub fn pick_constellation(&self, ray: &Ray, sky: &Sky) -> Option<EntityRef> {
        let mut hits = Vec::new();
        for c in sky.constellations() {
            for (i, p) in c.star_positions.iter().enumerate() {
                if let Some(t) = ray.intersect_sphere(p, CONSTELLATION_STAR_RADIUS) {
                    hits.push((t, (c.id, MarkerRef::Star(i))));
                }
            }
            for (i, (a, b)) in c.lines.iter().enumerate() {
                let (s, gap) = ray.closest_approach_to_segment(a, b);
                if gap <= self.line_tolerance {
                    hits.push((s, (c.id, MarkerRef::Line(i))));
                }
            }
        }
        nearest(hits.into_iter()).map(|(id, marker)| EntityRef::Constellation { id, marker })
    }
}
