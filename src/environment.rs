use std::env;
use std::path::PathBuf;
use std::str::FromStr;

use tokio::time::Duration;
use tracing::warn;

use crate::cleaner::Fallback;
use crate::swapi::{DEFAULT_ENDPOINT, REQUEST_TIMEOUT};

pub const PLANETS_INPUT: &str = "swapi_planets-v1p0.json";
pub const ECHO_BASE_INPUT: &str = "swapi_echo_base-v1p0.json";
pub const PLANETS_OUTPUT: &str = "swapi_planets_uninhabited-v1p1.json";
pub const ECHO_BASE_OUTPUT: &str = "swapi_echo_base-v1p1.json";

/// Retrieves an environment variable, falling back to `default` when it is
/// unset or empty.
pub fn get_env_var(var: &str, default: &str) -> String {
    match env::var(var) {
        Ok(value) if !value.trim().is_empty() => value.trim().to_string(),
        _ => default.to_string(),
    }
}

/// Retrieves an environment variable and parses it, falling back to
/// `default` when it is unset or malformed.
pub fn get_env_var_as<T: FromStr>(var: &str, default: T) -> T {
    match env::var(var) {
        Ok(value) => value.trim().parse().unwrap_or_else(|_| {
            warn!("Ignoring malformed {}='{}'", var, value);
            default
        }),
        Err(_) => default,
    }
}

/// Where to fetch from and which files to read and write.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub endpoint: String,
    pub timeout: Duration,
    pub planets_input: PathBuf,
    pub echo_base_input: PathBuf,
    pub planets_output: PathBuf,
    pub echo_base_output: PathBuf,
    /// What the cleaner stores for numeric fields it can't parse.
    pub unparsed: Fallback,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            timeout: REQUEST_TIMEOUT,
            planets_input: PLANETS_INPUT.into(),
            echo_base_input: ECHO_BASE_INPUT.into(),
            planets_output: PLANETS_OUTPUT.into(),
            echo_base_output: ECHO_BASE_OUTPUT.into(),
            unparsed: Fallback::KeepOriginal,
        }
    }
}

impl Settings {
    pub fn from_env() -> Self {
        let defaults = Settings::default();
        Self {
            endpoint: get_env_var("SWAPI_ENDPOINT", &defaults.endpoint),
            timeout: Duration::from_secs(get_env_var_as(
                "SWAPI_TIMEOUT_SECS",
                defaults.timeout.as_secs(),
            )),
            planets_input: get_env_var("PLANETS_INPUT_PATH", PLANETS_INPUT).into(),
            echo_base_input: get_env_var("ECHO_BASE_INPUT_PATH", ECHO_BASE_INPUT).into(),
            planets_output: get_env_var("PLANETS_OUTPUT_PATH", PLANETS_OUTPUT).into(),
            echo_base_output: get_env_var("ECHO_BASE_OUTPUT_PATH", ECHO_BASE_OUTPUT).into(),
            unparsed: get_env_var_as("UNPARSED_VALUES", defaults.unparsed),
        }
    }
}
