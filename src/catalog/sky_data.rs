use super::{
    hex_color, ConstellationRecord, ConstellationStar, Link, Metadata, StarRecord,
};

// name, right ascension (h), declination (deg), colour, description
const MAJOR_STARS: &[(&str, f64, f64, u32, &str)] = &[
    ("Sirius", 6.75, -16.72, 0xffffff, "The brightest star in the night sky, a binary of an A-type main-sequence star and a faint white dwarf."),
    ("Canopus", 6.40, -52.70, 0xffffff, "The brightest star in Carina and the second-brightest in the night sky."),
    ("Arcturus", 14.26, 19.18, 0xffd27d, "The brightest star in Bootes and in the northern celestial hemisphere."),
    ("Vega", 18.62, 38.78, 0xa3c2ff, "The brightest star in Lyra, only 25 light-years from the Sun."),
    ("Capella", 5.27, 46.00, 0xfff5f5, "The brightest star in Auriga and the sixth-brightest in the night sky."),
    ("Rigel", 5.24, -8.20, 0xa3c2ff, "A blue supergiant and the brightest star in Orion."),
    ("Procyon", 7.65, 5.22, 0xfff5f5, "The brightest star in Canis Minor."),
    ("Betelgeuse", 5.92, 7.41, 0xff8c00, "A red supergiant in Orion, one of the largest stars visible to the naked eye."),
    ("Altair", 19.85, 8.87, 0xffffff, "The brightest star in Aquila, an A-type main-sequence star."),
    ("Aldebaran", 4.60, 16.51, 0xff8c00, "An orange giant and the brightest star in Taurus."),
    ("Antares", 16.49, -26.43, 0xff4500, "A red supergiant at the heart of Scorpius."),
    ("Spica", 13.42, -11.16, 0xa3c2ff, "The brightest object in Virgo."),
    ("Pollux", 7.76, 28.03, 0xffd27d, "An orange giant, the brightest star in Gemini."),
    ("Fomalhaut", 22.96, -29.62, 0xffffff, "The brightest star in Piscis Austrinus, about 25 light-years away."),
    ("Deneb", 20.69, 45.28, 0xffffff, "A blue-white supergiant in Cygnus and a vertex of the Summer Triangle."),
    ("Regulus", 10.14, 11.97, 0xa3c2ff, "The brightest object in Leo."),
    ("Polaris", 2.53, 89.26, 0xfff5f5, "The North Star, very close to the north celestial pole."),
];

struct ConstellationTable {
    name: &'static str,
    stars: &'static [(&'static str, f64, f64)],
    connections: &'static [(usize, usize)],
    color: u32,
    description: &'static str,
}

const MAJOR_CONSTELLATIONS: &[ConstellationTable] = &[
    ConstellationTable {
        name: "Ursa Major (Big Dipper)",
        stars: &[
            ("Dubhe", 11.062, 61.75),
            ("Merak", 11.03, 56.38),
            ("Phecda", 11.897, 53.69),
            ("Megrez", 12.257, 57.03),
            ("Alioth", 12.9, 55.96),
            ("Mizar", 13.398, 54.92),
            ("Alkaid", 13.792, 49.31),
        ],
        connections: &[(0, 1), (1, 2), (2, 3), (3, 0), (3, 4), (4, 5), (5, 6)],
        color: 0x00ffff,
        description: "Seven bright stars of the Great Bear forming a ladle; Dubhe and Merak point at Polaris.",
    },
    ConstellationTable {
        name: "Ursa Minor (Little Dipper)",
        stars: &[
            ("Polaris", 2.53, 89.26),
            ("Yildun", 17.54, 86.58),
            ("Epsilon UMi", 16.76, 82.03),
            ("Zeta UMi", 15.73, 77.79),
            ("Eta UMi", 16.29, 75.75),
            ("Pherkad", 15.34, 71.83),
            ("Kochab", 14.84, 74.15),
        ],
        connections: &[(0, 1), (1, 2), (2, 3), (3, 4), (4, 5), (5, 6), (6, 2)],
        color: 0x00ff88,
        description: "The Little Bear, whose handle ends at the pole star.",
    },
    ConstellationTable {
        name: "Orion",
        stars: &[
            ("Betelgeuse", 5.92, 7.41),
            ("Rigel", 5.24, -8.20),
            ("Bellatrix", 5.42, 6.35),
            ("Mintaka", 5.53, -0.30),
            ("Alnilam", 5.60, -1.20),
            ("Alnitak", 5.68, -1.94),
            ("Saiph", 5.79, -9.67),
        ],
        connections: &[
            (0, 2),
            (2, 3),
            (3, 4),
            (4, 5),
            (5, 6),
            (6, 1),
            (1, 5),
            (3, 0),
            (0, 5),
        ],
        color: 0xffaa00,
        description: "The Hunter, recognisable by the three belt stars.",
    },
    ConstellationTable {
        name: "Cassiopeia",
        stars: &[
            ("Schedar", 0.67, 56.53),
            ("Caph", 0.15, 59.15),
            ("Gamma Cas", 0.93, 60.72),
            ("Ruchbah", 1.43, 60.23),
            ("Segin", 1.90, 63.67),
        ],
        connections: &[(0, 1), (0, 2), (2, 3), (3, 4)],
        color: 0xff00ff,
        description: "A W-shaped group of five stars opposite the Big Dipper across the pole.",
    },
    ConstellationTable {
        name: "Cygnus (The Swan)",
        stars: &[
            ("Deneb", 20.69, 45.28),
            ("Sadr", 20.37, 40.26),
            ("Gienah", 20.77, 33.97),
            ("Albireo", 19.51, 27.96),
            ("Delta Cyg", 19.75, 45.13),
        ],
        connections: &[(0, 1), (1, 2), (1, 3), (1, 4)],
        color: 0x00ccff,
        description: "The Northern Cross, flying along the Milky Way.",
    },
    ConstellationTable {
        name: "Scorpius",
        stars: &[
            ("Antares", 16.49, -26.43),
            ("Graffias", 16.09, -19.80),
            ("Dschubba", 16.00, -22.62),
            ("Sargas", 17.62, -43.00),
            ("Shaula", 17.56, -37.10),
            ("Wei", 16.84, -25.11),
        ],
        connections: &[(0, 2), (2, 1), (0, 5), (5, 3), (3, 4)],
        color: 0xff4400,
        description: "A zodiac constellation with red Antares at the scorpion's heart.",
    },
    ConstellationTable {
        name: "Crux (Southern Cross)",
        stars: &[
            ("Acrux", 12.44, -63.10),
            ("Mimosa", 12.79, -59.68),
            ("Gacrux", 12.52, -57.11),
            ("Delta Cru", 12.25, -58.75),
        ],
        connections: &[(0, 2), (1, 3)],
        color: 0xffffff,
        description: "The smallest constellation, used to find the south celestial pole.",
    },
    ConstellationTable {
        name: "Leo",
        stars: &[
            ("Regulus", 10.14, 11.97),
            ("Denebola", 11.82, 14.57),
            ("Algieba", 10.33, 19.84),
            ("Zosma", 11.24, 20.52),
        ],
        connections: &[(0, 2), (2, 3), (3, 1), (0, 1)],
        color: 0xffd700,
        description: "The Lion, a zodiac constellation led by Regulus.",
    },
    ConstellationTable {
        name: "Gemini",
        stars: &[
            ("Pollux", 7.76, 28.03),
            ("Castor", 7.58, 31.89),
            ("Alhena", 6.63, 16.39),
        ],
        connections: &[(0, 1), (0, 2)],
        color: 0xffa500,
        description: "The Twins, Castor and Pollux.",
    },
    ConstellationTable {
        name: "Taurus",
        stars: &[
            ("Aldebaran", 4.60, 16.51),
            ("Elnath", 5.43, 28.61),
            ("Alcyone", 3.79, 24.11),
        ],
        connections: &[(0, 1), (0, 2)],
        color: 0xff8c00,
        description: "The Bull, home of the Pleiades and Hyades clusters.",
    },
    ConstellationTable {
        name: "Canis Major",
        stars: &[
            ("Sirius", 6.75, -16.72),
            ("Adhara", 6.98, -28.97),
            ("Wezen", 7.14, -26.39),
        ],
        connections: &[(0, 1), (1, 2)],
        color: 0xffffff,
        description: "The Great Dog, which contains Sirius.",
    },
];

fn wikipedia(title: &str) -> Link {
    Link {
        title: format!("Wikipedia: {}", title),
        url: format!("https://en.wikipedia.org/wiki/{}", title.replace(' ', "_")),
    }
}

/// The bright stars drawn on the background shell.
pub fn major_stars() -> Vec<StarRecord> {
    MAJOR_STARS
        .iter()
        .map(|&(name, ra_hours, dec_degrees, color, description)| StarRecord {
            name: name.to_owned(),
            ra_hours,
            dec_degrees,
            color: hex_color(color),
            metadata: Metadata {
                description: Some(description.to_owned()),
                images: Vec::new(),
                links: vec![wikipedia(name)],
            },
        })
        .collect()
}

pub fn major_constellations() -> Vec<ConstellationRecord> {
    MAJOR_CONSTELLATIONS
        .iter()
        .map(|table| ConstellationRecord {
            name: table.name.to_owned(),
            stars: table
                .stars
                .iter()
                .map(|&(name, ra_hours, dec_degrees)| ConstellationStar {
                    name: name.to_owned(),
                    ra_hours,
                    dec_degrees,
                })
                .collect(),
            connections: table.connections.to_vec(),
            color: hex_color(table.color),
            metadata: Metadata {
                description: Some(table.description.to_owned()),
                images: Vec::new(),
                links: Vec::new(),
            },
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tables_are_consistent() {
        let stars = major_stars();
        assert_eq!(stars.len(), 17);
        for star in stars.iter() {
            assert!((0.0..24.0).contains(&star.ra_hours), "{}", star.name);
            assert!((-90.0..=90.0).contains(&star.dec_degrees), "{}", star.name);
        }

        let constellations = major_constellations();
        assert_eq!(constellations.len(), 11);
        for c in constellations.iter() {
            for &(a, b) in c.connections.iter() {
                assert!(a < c.stars.len() && b < c.stars.len(), "{}", c.name);
            }
        }
    }

    #[test]
    fn test_wikipedia_link() {
        let link = wikipedia("Delta Cyg");
        assert_eq!(link.url, "https://en.wikipedia.org/wiki/Delta_Cyg");
    }
}
