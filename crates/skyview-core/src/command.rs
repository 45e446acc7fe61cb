//! Messages sent to a viewer widget

use std::sync::Arc;

use serde::Serialize;

use crate::overlay::{Marker, OverlayOptions};
use crate::region::RegionInfo;
use crate::table::SourceTable;

/// A structured command understood by the viewer front end
///
/// Serializes as an object tagged with `event_name`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event_name")]
pub enum ViewerCommand {
    #[serde(rename = "add_marker")]
    AddMarker {
        markers: Vec<Marker>,
        options: OverlayOptions,
    },

    #[serde(rename = "add_catalog_from_URL")]
    AddCatalogFromUrl {
        #[serde(rename = "votable_URL")]
        votable_url: String,
        options: OverlayOptions,
    },

    #[serde(rename = "add_table")]
    AddTable {
        table: Arc<SourceTable>,
        shape: String,
        options: OverlayOptions,
    },

    #[serde(rename = "add_graphic_overlay_from_region")]
    AddGraphicOverlayFromRegion {
        regions_infos: Vec<RegionInfo>,
        options: OverlayOptions,
    },

    #[serde(rename = "add_graphic_overlay_from_stcs")]
    AddGraphicOverlayFromStcs {
        regions_infos: Vec<RegionInfo>,
        options: OverlayOptions,
    },

    #[serde(rename = "remove_overlay")]
    RemoveOverlay { overlay_names: Vec<String> },
}

impl ViewerCommand {
    pub fn event_name(&self) -> &'static str {
        match self {
            ViewerCommand::AddMarker { .. } => "add_marker",
            ViewerCommand::AddCatalogFromUrl { .. } => "add_catalog_from_URL",
            ViewerCommand::AddTable { .. } => "add_table",
            ViewerCommand::AddGraphicOverlayFromRegion { .. } => "add_graphic_overlay_from_region",
            ViewerCommand::AddGraphicOverlayFromStcs { .. } => "add_graphic_overlay_from_stcs",
            ViewerCommand::RemoveOverlay { .. } => "remove_overlay",
        }
    }

    /// Options carried by an add command
    pub fn options(&self) -> Option<&OverlayOptions> {
        match self {
            ViewerCommand::AddMarker { options, .. }
            | ViewerCommand::AddCatalogFromUrl { options, .. }
            | ViewerCommand::AddTable { options, .. }
            | ViewerCommand::AddGraphicOverlayFromRegion { options, .. }
            | ViewerCommand::AddGraphicOverlayFromStcs { options, .. } => Some(options),
            ViewerCommand::RemoveOverlay { .. } => None,
        }
    }

    /// Name of the overlay an add command creates
    pub fn overlay_name(&self) -> Option<&str> {
        self.options().and_then(OverlayOptions::name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_remove_overlay_wire_shape() {
        let command = ViewerCommand::RemoveOverlay {
            overlay_names: vec!["test".to_string(), "test_1".to_string()],
        };
        let value = serde_json::to_value(&command).unwrap();
        assert_eq!(
            value,
            json!({"event_name": "remove_overlay", "overlay_names": ["test", "test_1"]})
        );
    }

    #[test]
    fn test_catalog_wire_shape() {
        let command = ViewerCommand::AddCatalogFromUrl {
            votable_url: "https://example.org/cat.xml".to_string(),
            options: OverlayOptions::new().with("name", "cat"),
        };
        let value = serde_json::to_value(&command).unwrap();
        assert_eq!(value["event_name"], json!("add_catalog_from_URL"));
        assert_eq!(value["votable_URL"], json!("https://example.org/cat.xml"));
        assert_eq!(value["options"]["name"], json!("cat"));
        assert_eq!(command.event_name(), "add_catalog_from_URL");
        assert_eq!(command.overlay_name(), Some("cat"));
    }
}
