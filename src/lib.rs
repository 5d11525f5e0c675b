pub mod cleaner;
pub mod coerce;
pub mod environment;
pub mod error;
pub mod fixtures;
pub mod logging;
pub mod record;
pub mod resolve;
pub mod scenario;
pub mod swapi;
pub mod whitelist;

pub use error::{Error, Result};

pub const TARGET_WEB_REQUEST: &str = "web_request";
pub const TARGET_CLEAN: &str = "clean";

/// An untyped SWAPI record: person, planet, starship and so on.
pub type Entity = serde_json::Map<String, serde_json::Value>;
