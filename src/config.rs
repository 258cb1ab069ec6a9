// Configuration files - TOML load/save shared by the shell and input settings

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fmt;
use std::fs;
use std::io;
use std::path::Path;

/// Errors that can occur while reading or writing configuration
#[derive(Debug)]
pub enum ConfigError {
    /// I/O error
    Io(io::Error),

    /// TOML parsing error
    Parse(toml::de::Error),

    /// TOML serialization error
    Serialize(toml::ser::Error),

    /// A key name that does not match any known key code
    InvalidKey(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "I/O error: {}", e),
            ConfigError::Parse(e) => write!(f, "Failed to parse config file: {}", e),
            ConfigError::Serialize(e) => write!(f, "Failed to serialize config: {}", e),
            ConfigError::InvalidKey(key) => write!(f, "Unknown key code: {}", key),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Io(e) => Some(e),
            ConfigError::Parse(e) => Some(e),
            ConfigError::Serialize(e) => Some(e),
            ConfigError::InvalidKey(_) => None,
        }
    }
}

impl From<io::Error> for ConfigError {
    fn from(e: io::Error) -> Self {
        ConfigError::Io(e)
    }
}

impl From<toml::de::Error> for ConfigError {
    fn from(e: toml::de::Error) -> Self {
        ConfigError::Parse(e)
    }
}

impl From<toml::ser::Error> for ConfigError {
    fn from(e: toml::ser::Error) -> Self {
        ConfigError::Serialize(e)
    }
}

/// Read and parse a TOML file
pub fn load_toml<T, P>(path: P) -> Result<T, ConfigError>
where
    T: DeserializeOwned,
    P: AsRef<Path>,
{
    let contents = fs::read_to_string(path.as_ref())?;
    let value = toml::from_str(&contents)?;
    log::debug!("Loaded configuration from {}", path.as_ref().display());
    Ok(value)
}

/// Serialize a value and write it as a TOML file
pub fn save_toml<T, P>(value: &T, path: P) -> Result<(), ConfigError>
where
    T: Serialize,
    P: AsRef<Path>,
{
    let contents = toml::to_string_pretty(value)?;
    fs::write(path, contents)?;
    Ok(())
}

/// Load a TOML file, falling back to `T::default()`
///
/// When loading fails the default is written back to `path` so the user has
/// a file to edit.
pub fn load_toml_or_default<T, P>(path: P) -> T
where
    T: DeserializeOwned + Serialize + Default,
    P: AsRef<Path>,
{
    load_toml(path.as_ref()).unwrap_or_else(|e| {
        log::warn!(
            "Could not load {} ({}), using defaults",
            path.as_ref().display(),
            e
        );
        let value = T::default();
        match save_toml(&value, path.as_ref()) {
            Ok(()) => log::info!("Created default {}", path.as_ref().display()),
            Err(e) => log::warn!("Could not save default config: {}", e),
        }
        value
    })
}
