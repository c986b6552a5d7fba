//! Configuration with layered resolution using figment.
//!
//! Resolution order (highest priority last):
//! 1. User config: `~/.config/custom-fields/config.toml` (XDG) or platform config dir
//! 2. Project config: `.custom-fields.toml`
//! 3. Environment variables: `CUSTOM_FIELDS_*` (nested keys separated by `__`)
//!
//! Every key is optional.
//!
//! ```toml
//! default_association = "entries_custom_fields"
//!
//! [[types]]
//! name = "Rating"
//! storage = "integer"
//! ```
//!
//! `types` entries extend the built-in type registry, so a field declared
//! with `kind = "Rating"` resolves to an integer attribute.

use std::ops::Deref;
use std::path::{Path, PathBuf};

use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::registry::StorageType;

/// Project config file looked up in the working directory.
pub const PROJECT_CONFIG_FILE: &str = ".custom-fields.toml";

/// Association used when neither the definition nor the config names one.
pub const DEFAULT_ASSOCIATION: &str = "custom_fields";

/// Boxed wrapper for figment::Error to reduce Result size on the stack.
#[derive(Debug)]
pub struct ConfigError(Box<figment::Error>);

impl Deref for ConfigError {
    type Target = figment::Error;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.0.source()
    }
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self(Box::new(err))
    }
}

/// Root configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Association name fields are grouped under when a definition omits it.
    pub default_association: String,
    /// Extra registry entries.
    pub types: Vec<TypeEntry>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_association: DEFAULT_ASSOCIATION.to_string(),
            types: Vec::new(),
        }
    }
}

/// A named type made available to field kinds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeEntry {
    /// Name fields refer to in their `kind` (case-sensitive).
    pub name: String,
    /// How values of this type are stored.
    pub storage: StorageType,
}

impl Config {
    /// Load config with layered resolution (user → project → env).
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&Self::user_config_path(), Path::new(PROJECT_CONFIG_FILE))
    }

    /// Load config from explicit user and project files, then env.
    ///
    /// Missing files are treated as empty.
    pub fn load_from(user_config: &Path, project_config: &Path) -> Result<Self, ConfigError> {
        Figment::new()
            .merge(Toml::file(user_config))
            .merge(Toml::file(project_config))
            .merge(Env::prefixed("CUSTOM_FIELDS_").split("__"))
            .extract()
            .map_err(ConfigError::from)
    }

    /// User config path: ~/.config/custom-fields/config.toml (XDG) or platform config dir.
    fn user_config_path() -> PathBuf {
        if let Some(home) = dirs::home_dir() {
            let xdg_path = home
                .join(".config")
                .join("custom-fields")
                .join("config.toml");
            if xdg_path.exists() {
                return xdg_path;
            }
        }
        dirs::config_dir()
            .map(|p| p.join("custom-fields").join("config.toml"))
            .unwrap_or_default()
    }
}
