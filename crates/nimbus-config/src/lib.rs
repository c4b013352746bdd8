//! Configuration file handling for nimbus.
//!
//! The file lives at `<config dir>/nimbus/config.toml` and holds the engine
//! tuning plus a few display settings for the terminal front end. Every
//! field is optional; anything missing falls back to its default.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use log::{debug, warn};
use nimbus_core::EngineConfig;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Name of the configuration file inside the config directory.
pub const CONFIG_FILE: &str = "config.toml";

/// Errors raised while reading or writing the configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("failed to serialize configuration: {0}")]
    Serialize(#[from] toml::ser::Error),
    #[error("no configuration directory available on this platform")]
    NoConfigDir,
}

/// Settings for the terminal front end.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Target frames per second.
    pub fps: u16,
    /// Layout units covered by one terminal cell, horizontally.
    pub cell_width: f32,
    /// Layout units covered by one terminal cell, vertically.
    pub cell_height: f32,
    /// Show the key help line.
    pub show_help: bool,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            fps: 30,
            cell_width: 8.0,
            cell_height: 16.0,
            show_help: true,
        }
    }
}

impl DisplayConfig {
    /// Replace out-of-range values with their defaults.
    fn sanitize(&mut self) {
        let defaults = Self::default();
        if self.fps == 0 {
            warn!("display.fps must be positive, using {}", defaults.fps);
            self.fps = defaults.fps;
        }
        if !(self.cell_width.is_finite() && self.cell_width > 0.0) {
            warn!("display.cell_width must be positive, using {}", defaults.cell_width);
            self.cell_width = defaults.cell_width;
        }
        if !(self.cell_height.is_finite() && self.cell_height > 0.0) {
            warn!("display.cell_height must be positive, using {}", defaults.cell_height);
            self.cell_height = defaults.cell_height;
        }
    }
}

/// The whole configuration file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub engine: EngineConfig,
    pub display: DisplayConfig,
}

impl Config {
    /// Default location of the configuration file.
    pub fn path() -> Result<PathBuf, ConfigError> {
        ProjectDirs::from("", "", "nimbus")
            .map(|dirs| dirs.config_dir().join(CONFIG_FILE))
            .ok_or(ConfigError::NoConfigDir)
    }

    /// Load from the default location. A missing file yields defaults.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(Self::path()?)
    }

    /// Load from `path`. A missing file yields defaults.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                debug!("no config at {}, using defaults", path.display());
                return Ok(Self::default());
            }
            Err(source) => {
                return Err(ConfigError::Io {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };
        let config = Self::parse(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        debug!("loaded config from {}", path.display());
        Ok(config)
    }

    /// Parse a TOML document.
    pub fn parse(text: &str) -> Result<Self, toml::de::Error> {
        let mut config: Self = toml::from_str(text)?;
        config.display.sanitize();
        if let Err(reason) = config.engine.validate() {
            warn!("invalid engine configuration ({reason}), using engine defaults");
            config.engine = EngineConfig {
                seed: config.engine.seed,
                ..EngineConfig::default()
            };
        }
        Ok(config)
    }

    /// Render as pretty TOML.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Save to the default location.
    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(Self::path()?)
    }

    /// Save to `path`, creating parent directories as needed.
    pub fn save_to(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();
        let io_err = |source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        };
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(io_err)?;
        }
        fs::write(path, self.to_toml()?).map_err(io_err)?;
        debug!("saved config to {}", path.display());
        Ok(())
    }
}
