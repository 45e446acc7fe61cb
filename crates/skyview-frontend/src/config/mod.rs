//! Application configuration module
//!
//! This module handles application-wide configuration including overlay
//! defaults, the initial sync mode, and workspace layout.

mod manager;

pub use manager::{ConfigError, ConfigManager};

use serde::{Deserialize, Serialize};
use skyview_viewer::ViewerConfig;

use crate::sync_ui::SyncMode;

/// Sync preferences
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct SyncConfig {
    /// Mode selected when the sync controls are created
    #[serde(default)]
    pub initial_mode: SyncMode,
}

/// Workspace layout preferences
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WorkspaceConfig {
    /// Viewer height in pixels
    pub height: u32,
    /// Open a sky viewer when none is given
    pub include_sky: bool,
    /// Open an image viewer when none is given
    pub include_image: bool,
    /// Reuse the current viewers instead of creating new ones
    pub use_current_viewers: bool,
}

impl Default for WorkspaceConfig {
    fn default() -> Self {
        Self {
            height: 500,
            include_sky: true,
            include_image: true,
            use_current_viewers: false,
        }
    }
}

/// Complete application configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct AppConfig {
    /// Configuration format version
    #[serde(default)]
    pub version: u32,
    /// Overlay defaults
    #[serde(default)]
    pub viewer: ViewerConfig,
    /// Sync settings
    #[serde(default)]
    pub sync: SyncConfig,
    /// Workspace settings
    #[serde(default)]
    pub workspace: WorkspaceConfig,
}

impl AppConfig {
    /// Current configuration version
    pub const CURRENT_VERSION: u32 = 1;

    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self {
            version: Self::CURRENT_VERSION,
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_sections_use_defaults() {
        let config: AppConfig = ron::from_str("(version: 1)").unwrap();
        assert_eq!(config.viewer, ViewerConfig::default());
        assert_eq!(config.sync.initial_mode, SyncMode::Off);
        assert_eq!(config.workspace.height, 500);
    }

    #[test]
    fn test_partial_viewer_section() {
        let config: AppConfig =
            ron::from_str(r#"(version: 1, viewer: (default_table_shape: "circle"))"#).unwrap();
        assert_eq!(config.viewer.default_table_shape, "circle");
        assert_eq!(config.viewer.default_catalog_name, "catalog_python");
    }
}
