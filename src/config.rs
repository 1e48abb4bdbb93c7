//! Optional TOML configuration for `bfb-unpack`.
//!
//! ```toml
//! [unpack]
//! output_dir = "out"
//! prefix = "image_"
//! duplicates = "suffix"
//! only = ["bl2", "bl31"]
//! ```
//!
//! Every key is optional; command-line flags take precedence.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use crate::registry;
use crate::sink::{DuplicatePolicy, ExtractOptions};

/// Errors produced while loading a config file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("unknown image name in `only`: {0}")]
    UnknownImage(String),
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub unpack: UnpackConfig,
}

/// Values given on the command line; each `Some` (or non-empty `only`)
/// replaces the config file value.
#[derive(Debug, Clone, Default)]
pub struct UnpackOverrides {
    pub output_dir: Option<PathBuf>,
    pub prefix: Option<String>,
    pub duplicates: Option<DuplicatePolicy>,
    /// Empty keeps the config file's list.
    pub only: Vec<String>,
}

/// The `[unpack]` table.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UnpackConfig {
    pub output_dir: Option<PathBuf>,
    pub prefix: Option<String>,
    pub duplicates: Option<DuplicatePolicy>,
    #[serde(default)]
    pub only: Vec<String>,
}

impl Config {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&text)
    }

    pub fn from_toml(text: &str) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(text)?;
        check_names(&config.unpack.only)?;
        Ok(config)
    }

    /// Extraction options from this config, falling back to defaults.
    #[must_use]
    pub fn extract_options(&self) -> ExtractOptions {
        let defaults = ExtractOptions::default();
        let u = &self.unpack;
        ExtractOptions {
            output_dir: u.output_dir.clone().unwrap_or(defaults.output_dir),
            prefix: u.prefix.clone().unwrap_or(defaults.prefix),
            duplicates: u.duplicates.unwrap_or(defaults.duplicates),
            only: u.only.clone(),
        }
    }

    /// Extraction options from this config with command-line values on top.
    pub fn extract_options_with(&self, overrides: UnpackOverrides) -> Result<ExtractOptions, ConfigError> {
        let mut options = self.extract_options();
        if let Some(dir) = overrides.output_dir {
            options.output_dir = dir;
        }
        if let Some(prefix) = overrides.prefix {
            options.prefix = prefix;
        }
        if let Some(duplicates) = overrides.duplicates {
            options.duplicates = duplicates;
        }
        if !overrides.only.is_empty() {
            check_names(&overrides.only)?;
            options.only = overrides.only;
        }
        Ok(options)
    }
}

/// Reject names that are not in the image registry.
fn check_names(names: &[String]) -> Result<(), ConfigError> {
    match names.iter().find(|n| registry::image_id(n).is_none()) {
        Some(n) => Err(ConfigError::UnknownImage(n.clone())),
        None => Ok(()),
    }
}
