//! Short park names and featured attractions.
//!
//! Convenience only: the table is not authoritative and any raw entity id
//! can be passed to the clients directly.

/// Short name → ThemeParks entity id.
pub const PARK_IDS: &[(&str, &str)] = &[
    // Walt Disney World
    ("magic_kingdom", "75ea578a-adc8-4116-a54d-dccb60765ef9"),
    ("epcot", "47f90d2c-e191-4239-a466-5892ef59a88b"),
    ("hollywood_studios", "288747d1-8b4f-4a64-867e-ea7c9b27bad8"),
    ("animal_kingdom", "1c84a229-8862-4648-9c71-378ddd2c7693"),
    // Disneyland Resort
    ("disneyland", "7340550b-c14d-4def-80bb-acdb51d49a66"),
    ("california_adventure", "832fcd51-ea19-4e77-85c7-75d5843b127c"),
    // Universal Orlando
    ("universal_studios", "eb3f4560-2383-4a36-9152-6b3e5f6ac81c"),
    ("islands_of_adventure", "267615cc-8943-4c2a-ae2c-5da728ca591f"),
    // Universal Hollywood
    ("universal_hollywood", "fe78a026-b91b-470c-b906-9d2266b692da"),
];

/// Headline attractions per park, by short name.
pub const FEATURED_ATTRACTIONS: &[(&str, &[&str])] = &[
    (
        "hollywood_studios",
        &[
            "Tower of Terror",
            "Rock n Roller Coaster",
            "Slinky Dog Dash",
            "Millennium Falcon",
            "Rise of the Resistance",
            "Mickey & Minnie Runaway Railway",
        ],
    ),
    (
        "magic_kingdom",
        &[
            "Space Mountain",
            "Big Thunder Mountain",
            "Splash Mountain",
            "Seven Dwarfs Mine Train",
            "Haunted Mansion",
            "Pirates of the Caribbean",
        ],
    ),
    (
        "disneyland",
        &[
            "Matterhorn Bobsleds",
            "Space Mountain",
            "Big Thunder Mountain",
            "Indiana Jones",
            "Haunted Mansion",
            "Pirates of the Caribbean",
        ],
    ),
];

/// Walt Disney World parks shown in the resort overview, with display names.
pub const RESORT_PARKS: &[(&str, &str)] = &[
    ("magic_kingdom", "Magic Kingdom"),
    ("epcot", "EPCOT"),
    ("hollywood_studios", "Hollywood Studios"),
    ("animal_kingdom", "Animal Kingdom"),
];

fn normalize(name: &str) -> String {
    name.trim().to_lowercase().replace(' ', "_")
}

/// Entity id for a short park name such as `"Magic Kingdom"` or `"epcot"`.
pub fn park_id(name: &str) -> Option<&'static str> {
    let key = normalize(name);
    PARK_IDS
        .iter()
        .find(|(short, _)| *short == key)
        .map(|(_, id)| *id)
}

/// Featured attraction names for a park; empty when none are configured.
pub fn featured_attractions(name: &str) -> &'static [&'static str] {
    let key = normalize(name);
    FEATURED_ATTRACTIONS
        .iter()
        .find(|(short, _)| *short == key)
        .map(|(_, names)| *names)
        .unwrap_or(&[])
}

/// All known short names, in table order.
pub fn known_parks() -> impl Iterator<Item = &'static str> {
    PARK_IDS.iter().map(|(short, _)| *short)
}
