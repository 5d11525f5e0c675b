//! Type normalization for projected SWAPI records.
//!
//! The cleaner is pure: related records (`homeworld`, `species`) must already
//! be fetched and cleaned, see [`crate::resolve`] for the I/O half.

use std::collections::HashSet;
use std::str::FromStr;

use serde_json::{Number, Value};
use tracing::debug;

use crate::coerce::{is_unknown, parse_float, parse_int, to_list};
use crate::{Entity, TARGET_CLEAN};

pub const HOMEWORLD_KEY: &str = "homeworld";
pub const SPECIES_KEY: &str = "species";

const FLOAT_KEYS: [&str; 3] = ["gravity", "length", "hyperdrive_rating"];

const INT_KEYS: [&str; 14] = [
    "rotation_period",
    "orbital_period",
    "diameter",
    "surface_water",
    "population",
    "height",
    "mass",
    "average_height",
    "average_lifespan",
    "max_atmosphering_speed",
    "MGLT",
    "crew",
    "passengers",
    "cargo_capacity",
];

const LIST_KEYS: [&str; 7] = [
    "hair_color",
    "skin_color",
    "climate",
    "terrain",
    "hair_colors",
    "skin_colors",
    "eye_colors",
];

/// What to store when a numeric field can't be parsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Fallback {
    /// Keep the original string.
    #[default]
    KeepOriginal,
    /// Store `null`.
    Null,
}

impl FromStr for Fallback {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "keep" | "original" => Ok(Fallback::KeepOriginal),
            "null" => Ok(Fallback::Null),
            other => Err(format!("unknown fallback '{}', expected keep or null", other)),
        }
    }
}

/// Which keys get which conversion.
#[derive(Debug, Clone)]
pub struct CoercionRules {
    pub float_keys: HashSet<&'static str>,
    pub int_keys: HashSet<&'static str>,
    pub list_keys: HashSet<&'static str>,
    pub list_delimiter: &'static str,
    /// Unit tokens removed before a float parse, e.g. "1 standard" gravity.
    pub unit_tokens: Vec<(&'static str, &'static str)>,
    pub fallback: Fallback,
}

impl Default for CoercionRules {
    fn default() -> Self {
        Self {
            float_keys: FLOAT_KEYS.into_iter().collect(),
            int_keys: INT_KEYS.into_iter().collect(),
            list_keys: LIST_KEYS.into_iter().collect(),
            list_delimiter: ", ",
            unit_tokens: vec![("gravity", "standard")],
            fallback: Fallback::KeepOriginal,
        }
    }
}

/// Already cleaned records that stand in for reference fields.
#[derive(Debug, Clone, Default)]
pub struct Related {
    pub homeworld: Option<Entity>,
    pub species: Option<Entity>,
}

#[derive(Debug, Clone, Default)]
pub struct EntityCleaner {
    rules: CoercionRules,
}

impl EntityCleaner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_fallback(mut self, fallback: Fallback) -> Self {
        self.rules.fallback = fallback;
        self
    }

    /// Converts every value of `entity` to its natural type.
    ///
    /// Unknown sentinels become `null` whatever the key. `homeworld` and
    /// `species` are swapped for the records in `related`; without one the
    /// raw value is kept.
    pub fn clean(&self, entity: &Entity, related: &Related) -> Entity {
        let mut cleaned = Entity::new();

        for (key, value) in entity {
            let new_value = match value {
                Value::String(s) if is_unknown(s) => Value::Null,
                _ if self.rules.float_keys.contains(key.as_str()) => self.clean_float(key, value),
                _ if self.rules.int_keys.contains(key.as_str()) => self.clean_int(key, value),
                Value::String(s) if self.rules.list_keys.contains(key.as_str()) => Value::from(
                    to_list(s.trim(), self.rules.list_delimiter),
                ),
                _ if key == HOMEWORLD_KEY => match &related.homeworld {
                    Some(planet) => Value::Object(planet.clone()),
                    None => value.clone(),
                },
                _ if key == SPECIES_KEY => match &related.species {
                    Some(species) => Value::Array(vec![Value::Object(species.clone())]),
                    None => value.clone(),
                },
                _ => value.clone(),
            };
            cleaned.insert(key.clone(), new_value);
        }

        cleaned
    }

    fn clean_float(&self, key: &str, value: &Value) -> Value {
        match value {
            Value::String(raw) => {
                let mut text = raw.clone();
                for (unit_key, token) in &self.rules.unit_tokens {
                    if *unit_key == key {
                        text = text.replace(*token, "").trim().to_string();
                    }
                }
                match parse_float(&text).ok().and_then(Number::from_f64) {
                    Some(n) => Value::Number(n),
                    None => {
                        debug!(target: TARGET_CLEAN, "Keeping unparsed {} value '{}'", key, raw);
                        self.fallback(text)
                    }
                }
            }
            Value::Number(n) => n
                .as_f64()
                .and_then(Number::from_f64)
                .map(Value::Number)
                .unwrap_or_else(|| value.clone()),
            _ => value.clone(),
        }
    }

    fn clean_int(&self, key: &str, value: &Value) -> Value {
        match value {
            Value::String(raw) => match parse_int(raw) {
                Ok(n) => Value::from(n),
                Err(_) => {
                    debug!(target: TARGET_CLEAN, "Keeping unparsed {} value '{}'", key, raw);
                    self.fallback(raw.clone())
                }
            },
            Value::Number(n) if n.is_f64() => match n.as_f64().map(f64::trunc) {
                // i64::MAX as f64 rounds up to 2^63, hence the strict bound
                Some(f) if f >= i64::MIN as f64 && f < i64::MAX as f64 => {
                    Value::from(f as i64)
                }
                _ => {
                    debug!(target: TARGET_CLEAN, "Keeping out of range {} value {}", key, n);
                    value.clone()
                }
            },
            _ => value.clone(),
        }
    }

    fn fallback(&self, original: String) -> Value {
        match self.rules.fallback {
            Fallback::KeepOriginal => Value::String(original),
            Fallback::Null => Value::Null,
        }
    }
}
