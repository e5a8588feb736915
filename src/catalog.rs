//! Static insect reference data: the five-entry catalog, the day/night
//! appearance pools, and the global appearance cap.

use serde::Serialize;

use crate::daylight::TimeOfDay;

/// How many times a single insect may be presented across the whole session
/// before it becomes ineligible for new assignment.
pub const APPEARANCE_CAP: u32 = 20;

/// Eligible ids while it is day. `stag` and `rhino` appear in both pools.
pub const DAY_POOL: &[&str] = &["ladybug", "butterfly", "rhino", "stag"];

/// Eligible ids while it is night.
pub const NIGHT_POOL: &[&str] = &["firefly", "stag", "rhino"];

/// A catalog entry. Immutable reference data; user-supplied description and
/// image overrides live in session state, not here.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InsectKind {
    pub id: &'static str,
    pub name: &'static str,
    pub emoji: &'static str,
    pub blurb: &'static str,
}

/// The long-form info card shown when an insect appears.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InsectCard {
    pub intro: &'static str,
    pub details: &'static [(&'static str, &'static str)],
}

const CATALOG: &[InsectKind] = &[
    InsectKind {
        id: "ladybug",
        name: "Ladybug",
        emoji: "🐞",
        blurb: "Common in grass and gardens; eats aphids.",
    },
    InsectKind {
        id: "butterfly",
        name: "Butterfly",
        emoji: "🦋",
        blurb: "Active near flowers, flying busily during the day.",
    },
    InsectKind {
        id: "stag",
        name: "Stag Beetle",
        emoji: "🪲",
        blurb: "Gathers around oak sap. Known for its large mandibles.",
    },
    InsectKind {
        id: "rhino",
        name: "Rhinoceros Beetle",
        emoji: "🪲",
        blurb: "A horned beetle, sometimes drawn to lights at night.",
    },
    InsectKind {
        id: "firefly",
        name: "Firefly",
        emoji: "✨",
        blurb: "Glows in the dark; most active on early-summer nights.",
    },
];

const LADYBUG_CARD: InsectCard = InsectCard {
    intro: "A tiny garden hero that keeps pests in check!",
    details: &[
        ("Traits", "Red wing covers with black spots"),
        ("Habitat", "Gardens, farmland, around flowers"),
        ("Active hours", "Day"),
        ("Diet", "Plant pests such as aphids"),
        ("Role", "Crop protection and ecosystem balance"),
    ],
};

const BUTTERFLY_CARD: InsectCard = InsectCard {
    intro: "A colorful traveler dancing on flowers and wind!",
    details: &[
        ("Traits", "Wings in many colors and patterns"),
        ("Growth", "Caterpillar, chrysalis, adult (complete metamorphosis)"),
        ("Habitat", "Flower fields, parks, forest edges"),
        ("Diet", "Nectar (caterpillars eat leaves)"),
        ("Role", "Nature's pollen courier"),
    ],
};

const STAG_CARD: InsectCard = InsectCard {
    intro: "The forest prince with impressive fighting mandibles!",
    details: &[
        ("Traits", "Large mandibles, glossy black body"),
        ("Habitat", "Old-growth forests"),
        ("Active hours", "Mostly night"),
        ("Diet", "Tree sap and fruit juice"),
        ("Growth", "One to two years as a larva inside rotting wood"),
    ],
};

const RHINO_CARD: InsectCard = InsectCard {
    intro: "The strong charmer of the forest, proud of its horn!",
    details: &[
        ("Traits", "A large horn on its head"),
        ("Habitat", "Forests, gardens, rich humus soil"),
        ("Active hours", "Night"),
        ("Diet", "Tree sap and fruit juice"),
        ("Strength", "Can lift over a hundred times its own weight"),
    ],
};

const FIREFLY_CARD: InsectCard = InsectCard {
    intro: "A little star of the night, made by nature itself!",
    details: &[
        ("Traits", "Bioluminescent tip of the abdomen"),
        ("Why it glows", "Finding mates and signalling"),
        ("Habitat", "Clean streams and paddy fields"),
        ("Active hours", "Night"),
        ("Larvae", "Prey on snails and freshwater mollusks"),
    ],
};

/// All five catalog entries, in declaration order.
pub fn all() -> &'static [InsectKind] {
    CATALOG
}

pub fn find(id: &str) -> Option<&'static InsectKind> {
    CATALOG.iter().find(|k| k.id == id)
}

pub fn card(id: &str) -> Option<&'static InsectCard> {
    match id {
        "ladybug" => Some(&LADYBUG_CARD),
        "butterfly" => Some(&BUTTERFLY_CARD),
        "stag" => Some(&STAG_CARD),
        "rhino" => Some(&RHINO_CARD),
        "firefly" => Some(&FIREFLY_CARD),
        _ => None,
    }
}

/// The appearance pool for a time-of-day classification.
pub fn pool(time_of_day: TimeOfDay) -> &'static [&'static str] {
    match time_of_day {
        TimeOfDay::Day => DAY_POOL,
        TimeOfDay::Night => NIGHT_POOL,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_has_exactly_five_entries() {
        assert_eq!(all().len(), 5);
    }

    #[test]
    fn every_pool_member_exists_in_catalog() {
        for id in DAY_POOL.iter().chain(NIGHT_POOL.iter()) {
            assert!(find(id).is_some(), "unknown pool id {id}");
        }
    }

    #[test]
    fn every_entry_has_a_card() {
        for kind in all() {
            assert!(card(kind.id).is_some(), "missing card for {}", kind.id);
        }
    }

    #[test]
    fn pools_follow_time_of_day() {
        assert_eq!(pool(TimeOfDay::Day), DAY_POOL);
        assert_eq!(pool(TimeOfDay::Night), NIGHT_POOL);
    }
}
