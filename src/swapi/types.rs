//! Type definitions for the SWAPI module.

use serde::Deserialize;
use serde_json::Value;
use std::fmt;
use tokio::time::Duration;

pub const DEFAULT_ENDPOINT: &str = "https://swapi.dev/api";
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// SWAPI resource categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    People,
    Planets,
    Species,
    Starships,
    Vehicles,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::People => "people",
            Category::Planets => "planets",
            Category::Species => "species",
            Category::Starships => "starships",
            Category::Vehicles => "vehicles",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Body of a `?search=` query.
#[derive(Debug, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub count: Option<u64>,
    #[serde(default)]
    pub results: Vec<Value>,
}
