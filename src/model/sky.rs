use std::collections::HashMap;

use nalgebra::Point3;

use crate::catalog::{ConstellationRecord, StarRecord};
use crate::math::geometry::celestial_to_cartesian;

pub const STAR_SHELL_RADIUS: f64 = 48_000.0;
pub const STAR_PICK_RADIUS: f64 = 150.0;
pub const CONSTELLATION_SHELL_RADIUS: f64 = 49_000.0;
pub const CONSTELLATION_STAR_RADIUS: f64 = 80.0;

#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct StarID(pub usize);

#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct ConstellationID(pub usize);

#[derive(Debug, Clone)]
pub struct Star {
    pub id: StarID,
    pub record: StarRecord,
    pub position: Point3<f64>,
}

#[derive(Debug, Clone)]
pub struct Constellation {
    pub id: ConstellationID,
    pub record: ConstellationRecord,
    pub star_positions: Vec<Point3<f64>>,
    /// Endpoints of each valid connection, in catalog order.
    pub lines: Vec<(Point3<f64>, Point3<f64>)>,
    pub center: Point3<f64>,
}

/// The fixed background: stars and constellation figures. Nothing here moves.
#[derive(Debug, Clone, Default)]
pub struct Sky {
    stars: Vec<Star>,
    constellations: Vec<Constellation>,
    star_names: HashMap<String, StarID>,
    constellation_names: HashMap<String, ConstellationID>,
}

impl Constellation {
    fn new(id: ConstellationID, record: ConstellationRecord) -> Self {
        let star_positions: Vec<_> = record
            .stars
            .iter()
            .map(|s| celestial_to_cartesian(s.ra_hours, s.dec_degrees, CONSTELLATION_SHELL_RADIUS))
            .collect();

        let mut lines = Vec::with_capacity(record.connections.len());
        for &(a, b) in record.connections.iter() {
            match (star_positions.get(a), star_positions.get(b)) {
                (Some(pa), Some(pb)) => lines.push((*pa, *pb)),
                _ => log::warn!(
                    "{}: skipping connection {}-{}, only {} stars",
                    record.name,
                    a,
                    b,
                    star_positions.len()
                ),
            }
        }

        let center = bounding_box_center(&star_positions);

        Constellation {
            id,
            record,
            star_positions,
            lines,
            center,
        }
    }
}

fn bounding_box_center(points: &[Point3<f64>]) -> Point3<f64> {
    let mut iter = points.iter();
    let first = match iter.next() {
        Some(p) => *p,
        None => return Point3::origin(),
    };
    let (min, max) = iter.fold((first, first), |(min, max), p| {
        (min.coords.inf(&p.coords).into(), max.coords.sup(&p.coords).into())
    });
    Point3::from((min.coords + max.coords) / 2.0)
}

impl Sky {
    pub fn new(stars: Vec<StarRecord>, constellations: Vec<ConstellationRecord>) -> Self {
        let mut sky = Sky::default();

        for record in stars.into_iter() {
            let id = StarID(sky.stars.len());
            let position =
                celestial_to_cartesian(record.ra_hours, record.dec_degrees, STAR_SHELL_RADIUS);
            sky.star_names.entry(record.name.clone()).or_insert(id);
            sky.stars.push(Star {
                id,
                record,
                position,
            });
        }

        for record in constellations.into_iter() {
            let id = ConstellationID(sky.constellations.len());
            sky.constellation_names
                .entry(record.name.clone())
                .or_insert(id);
            sky.constellations.push(Constellation::new(id, record));
        }

        sky
    }

    pub fn stars(&self) -> &[Star] {
        &self.stars
    }

    pub fn constellations(&self) -> &[Constellation] {
        &self.constellations
    }

    pub fn get_star(&self, id: StarID) -> &Star {
        &self.stars[id.0]
    }

    pub fn get_constellation(&self, id: ConstellationID) -> &Constellation {
        &self.constellations[id.0]
    }

    pub fn find_star(&self, name: &str) -> Option<StarID> {
        self.star_names.get(name).copied()
    }

    pub fn find_constellation(&self, name: &str) -> Option<ConstellationID> {
        self.constellation_names.get(name).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::catalog::{major_constellations, major_stars, ConstellationStar, Metadata};

    #[test]
    fn test_builtin_sky() {
        let sky = Sky::new(major_stars(), major_constellations());

        let polaris = sky.get_star(sky.find_star("Polaris").unwrap());
        approx::assert_relative_eq!(
            polaris.position.coords.norm(),
            STAR_SHELL_RADIUS,
            max_relative = 1e-12
        );
        // Nearly on the pole
        assert!(polaris.position.y > 0.99 * STAR_SHELL_RADIUS);

        let orion = sky.get_constellation(sky.find_constellation("Orion").unwrap());
        assert_eq!(orion.star_positions.len(), 7);
        assert_eq!(orion.lines.len(), 9);
        assert!(sky.find_star("Vulcan").is_none());
    }

    #[test]
    fn test_bad_connections_skipped() {
        let star = |name: &str, ra, dec| ConstellationStar {
            name: name.to_owned(),
            ra_hours: ra,
            dec_degrees: dec,
        };
        let record = ConstellationRecord {
            name: "Test".to_owned(),
            stars: vec![star("A", 0.0, 0.0), star("B", 6.0, 0.0)],
            connections: vec![(0, 1), (1, 2), (5, 0)],
            color: Point3::new(1.0, 1.0, 1.0),
            metadata: Metadata::default(),
        };
        let sky = Sky::new(Vec::new(), vec![record]);
        let c = &sky.constellations()[0];

        assert_eq!(c.lines.len(), 1);
        let r = CONSTELLATION_SHELL_RADIUS;
        // A is on +x, B on -z; the box centre is halfway along each axis
        approx::assert_abs_diff_eq!(c.center, Point3::new(r / 2.0, 0.0, -r / 2.0), epsilon = 1e-6);
    }

    #[test]
    fn test_empty_constellation_center() {
        assert_eq!(bounding_box_center(&[]), Point3::origin());
    }
}
