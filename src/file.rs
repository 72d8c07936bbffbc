use std::collections::HashMap;
use std::fs;
use std::path::Path;

use crate::catalog::{parse_hex_color, BodyRecord, Catalog, CatalogError, Metadata};
use crate::model::{BodyInfo, SurfaceKind};

/// Reads a body catalog from a whitespace-separated table.
///
/// The first line is a header. Each following line holds
/// `name radius distance period color parent shells texture [description...]`,
/// where `parent`, `shells` and `texture` may be `-`. Shells are joined with
/// `+`, e.g. `clouds+glow`. A parent must appear before its moons. Blank lines
/// and lines starting with `#` are ignored.
pub fn read_file(path: impl AsRef<Path>) -> Result<Vec<BodyRecord>, CatalogError> {
    let path = path.as_ref();
    let text = fs::read_to_string(path).map_err(|source| CatalogError::Io {
        path: path.to_owned(),
        source,
    })?;
    let records = parse_catalog(&text)?;
    log::info!("Loaded {} top-level bodies from {:?}", records.len(), path);
    Ok(records)
}

/// Reads the bodies from `path` and pairs them with the built-in sky.
pub fn read_catalog(path: impl AsRef<Path>) -> Result<Catalog, CatalogError> {
    read_file(path).map(Catalog::with_builtin_sky)
}

pub fn parse_catalog(text: &str) -> Result<Vec<BodyRecord>, CatalogError> {
    // Flat list in file order, with the index of each entry's parent
    let mut entries: Vec<(Option<BodyRecord>, Option<usize>)> = Vec::new();
    let mut name_to_idx = HashMap::new();

    // Read lines, skipping header
    for (line_idx, line) in text.lines().enumerate().skip(1) {
        let line_no = line_idx + 1;
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let mut fields = line.split_ascii_whitespace();

        macro_rules! next_string {
            ($field:expr) => {
                fields.next().ok_or(CatalogError::MissingField {
                    line: line_no,
                    field: $field,
                })?
            };
        }

        macro_rules! next_f64 {
            ($field:expr) => {{
                let value = next_string!($field);
                value
                    .parse::<f64>()
                    .map_err(|_| CatalogError::InvalidNumber {
                        line: line_no,
                        field: $field,
                        value: value.to_owned(),
                    })?
            }};
        }

        let name = next_string!("name");
        let radius = next_f64!("radius");
        let distance = next_f64!("distance");
        let period = next_f64!("period");

        let color_str = next_string!("color");
        let color = parse_hex_color(color_str).ok_or_else(|| CatalogError::InvalidColor {
            line: line_no,
            value: color_str.to_owned(),
        })?;

        let parent = match next_string!("parent") {
            "-" => None,
            parent => match name_to_idx.get(parent) {
                Some(&idx) => Some(idx),
                None => {
                    return Err(CatalogError::UnknownParent {
                        line: line_no,
                        parent: parent.to_owned(),
                    })
                }
            },
        };

        let shells = match next_string!("shells") {
            "-" => Vec::new(),
            list => list
                .split('+')
                .map(|s| {
                    SurfaceKind::parse(s).ok_or_else(|| CatalogError::UnknownShell {
                        line: line_no,
                        value: s.to_owned(),
                    })
                })
                .collect::<Result<Vec<_>, _>>()?,
        };

        let texture = match next_string!("texture") {
            "-" => None,
            t => Some(t.to_owned()),
        };

        let description: Vec<&str> = fields.collect();
        let description = if description.is_empty() {
            None
        } else {
            Some(description.join(" "))
        };

        let info = BodyInfo {
            name: name.to_owned(),
            radius,
            distance,
            period,
            color,
            texture,
            shells,
            metadata: Metadata {
                description,
                ..Metadata::default()
            },
        };
        info.validate()?;

        // Later definitions shadow earlier ones when used as a parent
        name_to_idx.insert(name, entries.len());
        entries.push((Some(BodyRecord::new(info)), parent));
    }

    // Moons always come after their parent, so walking backwards finishes
    // every subtree before it gets attached.
    let mut roots = Vec::new();
    for idx in (0..entries.len()).rev() {
        let (record, parent) = &mut entries[idx];
        let parent = *parent;
        let record = match record.take() {
            Some(r) => r,
            None => continue,
        };
        match parent {
            Some(p) => {
                if let Some(parent_record) = entries[p].0.as_mut() {
                    parent_record.moons.insert(0, record);
                }
            }
            None => roots.push(record),
        }
    }
    roots.reverse();

    Ok(roots)
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = "name radius distance period color parent shells texture\n";

    #[test]
    fn test_parse_nested() {
        let text = format!(
            "{}{}",
            HEADER,
            "Sun 25 0 0 ffff00 - - textures/sun.png The star.\n\
             # a comment\n\
             \n\
             Earth 2 130 1 0000ff Sun clouds+glow textures/earth.png\n\
             Moon 0.27 5 0.074 888888 Earth - textures/moon.jpg\n\
             Mars 1.06 170 1.88 ff0000 Sun - -\n"
        );
        let records = parse_catalog(&text).unwrap();

        assert_eq!(records.len(), 1);
        let sun = &records[0];
        assert_eq!(sun.info.name, "Sun");
        assert_eq!(sun.info.metadata.description.as_deref(), Some("The star."));

        let names: Vec<_> = sun.moons.iter().map(|r| r.info.name.as_str()).collect();
        assert_eq!(names, ["Earth", "Mars"]);

        let earth = &sun.moons[0];
        assert_eq!(earth.info.shells, vec![SurfaceKind::Clouds, SurfaceKind::Glow]);
        assert_eq!(earth.moons.len(), 1);
        assert_eq!(earth.moons[0].info.texture.as_deref(), Some("textures/moon.jpg"));
        approx::assert_relative_eq!(earth.moons[0].info.period, 0.074);

        assert_eq!(sun.moons[1].info.texture, None);
    }

    #[test]
    fn test_parse_errors() {
        let parse = |body: &str| parse_catalog(&format!("{}{}", HEADER, body));

        assert!(matches!(
            parse("Sun 25 0\n"),
            Err(CatalogError::MissingField { line: 2, field: "period" })
        ));
        assert!(matches!(
            parse("Sun 25 zero 0 ffff00 - - -\n"),
            Err(CatalogError::InvalidNumber { field: "distance", .. })
        ));
        assert!(matches!(
            parse("Sun 25 0 0 yellow - - -\n"),
            Err(CatalogError::InvalidColor { .. })
        ));
        assert!(matches!(
            parse("Moon 1 5 1 ffffff Earth - -\n"),
            Err(CatalogError::UnknownParent { .. })
        ));
        assert!(matches!(
            parse("Saturn 9 400 29 ffd700 - rings -\n"),
            Err(CatalogError::UnknownShell { .. })
        ));
        assert!(matches!(
            parse("Sun -1 0 0 ffff00 - - -\n"),
            Err(CatalogError::OutOfRange { field: "radius", .. })
        ));
    }

    #[test]
    fn test_read_missing_file() {
        assert!(matches!(
            read_file("does-not-exist.txt"),
            Err(CatalogError::Io { .. })
        ));
    }
}
