//! TOML configuration loading

use serde::de::DeserializeOwned;
use std::path::Path;

use crate::{CoreError, Result};

/// Load a TOML config file, or the type's defaults if the file does not exist.
///
/// A file that exists but cannot be read or parsed is an error.
pub fn load_or_default<T, P>(path: P) -> Result<T>
where
    T: DeserializeOwned + Default,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let text = match std::fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            tracing::info!("No config at {:?}, using defaults", path);
            return Ok(T::default());
        }
        Err(e) => return Err(CoreError::Io(e)),
    };

    toml::from_str(&text).map_err(|e| CoreError::Config {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}
