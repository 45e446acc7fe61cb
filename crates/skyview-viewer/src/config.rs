//! Viewer configuration

use serde::{Deserialize, Serialize};
use skyview_core::DEFAULT_TABLE_SHAPE;

/// Default names and shapes used when adding overlays
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ViewerConfig {
    /// Name given to markers, catalogs and tables added without one
    pub default_catalog_name: String,
    /// Name given to region and STC-S overlays added without one
    pub default_overlay_name: String,
    /// Marker shape for table replays that carry no `shape` option
    pub default_table_shape: String,
    /// Coordinate frame shown by the front end
    pub coo_frame: String,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            default_catalog_name: "catalog_python".to_string(),
            default_overlay_name: "overlay_python".to_string(),
            default_table_shape: DEFAULT_TABLE_SHAPE.to_string(),
            coo_frame: "ICRSd".to_string(),
        }
    }
}
