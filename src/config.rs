use std::path::{
    Path,
    PathBuf,
};

use serde::Deserialize;

use crate::{
    error::ConfigError,
    registry::RegistrationPolicy,
};

// =============================================================================

// Config

#[derive(Clone, Debug, Deserialize, Eq, PartialEq)]
pub struct Config {
    pub storage: StorageConfig,
    #[serde(default)]
    pub registry: RegistryConfig,
}

#[derive(Clone, Debug, Deserialize, Eq, PartialEq)]
pub struct StorageConfig {
    /// Host directory every item path is resolved under. Must already exist.
    pub root: PathBuf,
}

#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq)]
pub struct RegistryConfig {
    #[serde(default)]
    pub policy: RegistrationPolicy,
}

// -----------------------------------------------------------------------------

// Config - Load

impl Config {
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            storage: StorageConfig { root: root.into() },
            registry: RegistryConfig::default(),
        }
    }

    pub fn from_toml_str(toml: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(toml)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let toml = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        Self::from_toml_str(&toml)
    }
}
