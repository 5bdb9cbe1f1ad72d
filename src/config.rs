//! Board configuration.
//!
//! Configuration is read from a TOML document in which every field is
//! optional; missing fields fall back to compiled defaults:
//!
//! ```toml
//! default_color = "#3b82f6"
//!
//! [ordering]
//! tasks = { field = "CreatedOn", direction = "DESC" }
//! projects = { field = "Name", direction = "ASC" }
//! tags = { field = "Name", direction = "ASC" }
//! ```

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::board::{
    domain::{BoardDomainError, HexColor},
    ports::SortKey,
};

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file.
    #[error("failed to read config file {path}: {source}")]
    ReadFile {
        /// Path that was attempted.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// Failed to parse the TOML configuration.
    #[error("failed to parse config file: {0}")]
    ParseToml(#[from] toml::de::Error),

    /// The configured default colour is not a hex colour.
    #[error("invalid default colour: {0}")]
    InvalidColor(#[from] BoardDomainError),
}

/// Top-level TOML file structure.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ConfigFile {
    default_color: Option<String>,
    ordering: OrderingFileConfig,
}

/// `[ordering]` section of the config file.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct OrderingFileConfig {
    tasks: Option<SortKey>,
    projects: Option<SortKey>,
    tags: Option<SortKey>,
}

/// Sort order requested when listing each collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderingConfig {
    /// Task ordering; newest first by default.
    pub tasks: SortKey,
    /// Project ordering; by name by default.
    pub projects: SortKey,
    /// Tag ordering; by name by default.
    pub tags: SortKey,
}

impl Default for OrderingConfig {
    fn default() -> Self {
        Self {
            tasks: SortKey::descending("CreatedOn"),
            projects: SortKey::ascending("Name"),
            tags: SortKey::ascending("Name"),
        }
    }
}

/// Fully resolved board configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BoardConfig {
    /// Colour given to projects and tags stored without a valid colour.
    pub default_color: HexColor,
    /// Collection sort orders.
    pub ordering: OrderingConfig,
}

impl BoardConfig {
    /// Parses configuration from a TOML document.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ParseToml`] for malformed TOML and
    /// [`ConfigError::InvalidColor`] for an invalid default colour.
    pub fn from_toml_str(document: &str) -> Result<Self, ConfigError> {
        let file: ConfigFile = toml::from_str(document)?;
        let defaults = OrderingConfig::default();
        let default_color = file
            .default_color
            .map(HexColor::new)
            .transpose()?
            .unwrap_or_default();

        Ok(Self {
            default_color,
            ordering: OrderingConfig {
                tasks: file.ordering.tasks.unwrap_or(defaults.tasks),
                projects: file.ordering.projects.unwrap_or(defaults.projects),
                tags: file.ordering.tags.unwrap_or(defaults.tags),
            },
        })
    }

    /// Loads configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ReadFile`] when the file cannot be read, or any
    /// error of [`Self::from_toml_str`].
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let file_path = path.as_ref();
        let document =
            std::fs::read_to_string(file_path).map_err(|source| ConfigError::ReadFile {
                path: file_path.to_path_buf(),
                source,
            })?;
        Self::from_toml_str(&document)
    }
}
