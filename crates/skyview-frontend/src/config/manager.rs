//! Sky viewer settings file
//!
//! Settings live in `<config dir>/skyview/config.ron`. A missing file means
//! first start and yields the defaults; an unreadable or malformed file is
//! reported and also falls back to the defaults, so a bad settings file never
//! keeps the viewers from opening.

use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, info, warn};

use super::AppConfig;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum ConfigError {
    #[error("No sky viewer settings at {0}")]
    Missing(PathBuf),

    #[error("Cannot read sky viewer settings at {path}: {message}")]
    Read { path: PathBuf, message: String },

    #[error("Sky viewer settings at {path} are not valid RON: {message}")]
    Parse { path: PathBuf, message: String },

    #[error("Cannot encode sky viewer settings: {0}")]
    Encode(String),

    #[error("Cannot write sky viewer settings to {path}: {message}")]
    Write { path: PathBuf, message: String },
}

/// Owns the settings of a session and writes them back when they changed
pub struct ConfigManager {
    config: AppConfig,
    path: PathBuf,
    dirty: bool,
}

impl ConfigManager {
    /// Settings from the per-user location
    pub fn new() -> Self {
        Self::with_path(default_path())
    }

    /// Settings from `path`, or the defaults when it cannot be loaded
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let config = match Self::load_from_path(&path) {
            Ok(config) => config,
            Err(ConfigError::Missing(_)) => {
                info!("No settings at {}, starting with defaults", path.display());
                AppConfig::new()
            }
            Err(e) => {
                warn!("{}, starting with defaults", e);
                AppConfig::new()
            }
        };

        Self {
            config,
            path,
            dirty: false,
        }
    }

    pub fn load_from_path(path: &Path) -> Result<AppConfig, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => ConfigError::Missing(path.to_path_buf()),
            _ => ConfigError::Read {
                path: path.to_path_buf(),
                message: e.to_string(),
            },
        })?;
        let config = ron::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        debug!("Loaded settings from {}", path.display());
        Ok(config)
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Settings to edit; they are written on the next [`save`](Self::save)
    pub fn config_mut(&mut self) -> &mut AppConfig {
        self.dirty = true;
        &mut self.config
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write edited settings; a no-op when nothing was edited
    pub fn save(&mut self) -> Result<(), ConfigError> {
        if !self.dirty {
            return Ok(());
        }

        let write_error = |e: io::Error| ConfigError::Write {
            path: self.path.clone(),
            message: e.to_string(),
        };
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(write_error)?;
        }
        let content = ron::ser::to_string_pretty(&self.config, ron::ser::PrettyConfig::default())
            .map_err(|e| ConfigError::Encode(e.to_string()))?;
        std::fs::write(&self.path, content).map_err(write_error)?;

        info!("Saved settings to {}", self.path.display());
        self.dirty = false;
        Ok(())
    }

    /// Back to the defaults; written on the next save
    pub fn reset(&mut self) {
        self.config = AppConfig::new();
        self.dirty = true;
    }
}

impl Default for ConfigManager {
    fn default() -> Self {
        Self::new()
    }
}

fn default_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("skyview")
        .join("config.ron")
}
