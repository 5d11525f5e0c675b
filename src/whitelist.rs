use std::fmt;

use crate::Entity;

/// Kinds of SWAPI record the crate projects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Person,
    Planet,
    PlanetHoth,
    Starship,
    Species,
    Vehicle,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityKind::Person => write!(f, "person"),
            EntityKind::Planet => write!(f, "planet"),
            EntityKind::PlanetHoth => write!(f, "planet (Hoth)"),
            EntityKind::Starship => write!(f, "starship"),
            EntityKind::Species => write!(f, "species"),
            EntityKind::Vehicle => write!(f, "vehicle"),
        }
    }
}

/// The fixed set of keys kept when projecting one kind of record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Whitelist {
    pub kind: EntityKind,
    keys: &'static [&'static str],
}

pub const PERSON: Whitelist = Whitelist {
    kind: EntityKind::Person,
    keys: &[
        "url",
        "name",
        "height",
        "mass",
        "hair_color",
        "skin_color",
        "eye_color",
        "birth_year",
        "gender",
        "homeworld",
        "species",
    ],
};

pub const PLANET: Whitelist = Whitelist {
    kind: EntityKind::Planet,
    keys: &[
        "url",
        "name",
        "rotation_period",
        "orbital_period",
        "diameter",
        "climate",
        "gravity",
        "terrain",
        "surface_water",
        "population",
    ],
};

// Echo Base keeps a few fixture-only fields SWAPI doesn't have.
pub const PLANET_HOTH: Whitelist = Whitelist {
    kind: EntityKind::PlanetHoth,
    keys: &[
        "url",
        "name",
        "system_position",
        "natural_satellites",
        "rotation_period",
        "orbital_period",
        "diameter",
        "climate",
        "gravity",
        "terrain",
        "surface_water",
        "population",
        "indigenous_life_forms",
    ],
};

pub const STARSHIP: Whitelist = Whitelist {
    kind: EntityKind::Starship,
    keys: &[
        "url",
        "starship_class",
        "name",
        "model",
        "manufacturer",
        "length",
        "width",
        "max_atmosphering_speed",
        "hyperdrive_rating",
        "MGLT",
        "crew",
        "passengers",
        "cargo_capacity",
        "consumables",
        "armament",
    ],
};

pub const SPECIES: Whitelist = Whitelist {
    kind: EntityKind::Species,
    keys: &[
        "url",
        "name",
        "classification",
        "designation",
        "average_height",
        "skin_colors",
        "hair_colors",
        "eye_colors",
        "average_lifespan",
        "language",
    ],
};

pub const VEHICLE: Whitelist = Whitelist {
    kind: EntityKind::Vehicle,
    keys: &[
        "url",
        "vehicle_class",
        "name",
        "model",
        "manufacturer",
        "length",
        "max_atmosphering_speed",
        "crew",
        "passengers",
        "cargo_capacity",
        "consumables",
        "armament",
    ],
};

impl Whitelist {
    pub fn keys(&self) -> &'static [&'static str] {
        self.keys
    }

    pub fn contains(&self, key: &str) -> bool {
        self.keys.contains(&key)
    }

    /// Projects `data` down to this whitelist, see [`crate::record::filter_data`].
    pub fn project(&self, data: &Entity) -> Entity {
        crate::record::filter_data(data, self.keys)
    }
}
