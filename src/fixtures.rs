//! Reading and writing the local JSON documents.

use std::fs;
use std::path::Path;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::info;

use crate::{Error, Result};

/// Reads and decodes the JSON document at `path`.
pub fn read_json<T: DeserializeOwned>(path: impl AsRef<Path>) -> Result<T> {
    let path = path.as_ref();
    let json_data = fs::read_to_string(path).map_err(|source| Error::Io {
        path: path.to_path_buf(),
        source,
    })?;

    serde_json::from_str(&json_data).map_err(|source| Error::Parse {
        context: path.display().to_string(),
        source,
    })
}

/// Writes `data` to `path` with 2-space indentation. Non-ASCII text is
/// written as is, not escaped.
pub fn write_json<T: Serialize + ?Sized>(path: impl AsRef<Path>, data: &T) -> Result<()> {
    let path = path.as_ref();
    let json_data = serde_json::to_string_pretty(data).map_err(|source| Error::Encode {
        context: path.display().to_string(),
        source,
    })?;

    fs::write(path, json_data).map_err(|source| Error::Io {
        path: path.to_path_buf(),
        source,
    })?;

    info!("Wrote {}", path.display());
    Ok(())
}
