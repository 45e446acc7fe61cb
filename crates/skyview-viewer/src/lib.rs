//! Sky Viewer
//!
//! A HiPS viewer that tracks its overlay layers by name:
//! - [`SkyViewer`]: add, update and remove overlays; viewport access
//! - [`overlay`]: the overlay registry and records
//! - [`delayed`]: adds postponed until the widget has rendered

pub mod config;
pub mod delayed;
pub mod overlay;
pub mod viewer;

pub use config::ViewerConfig;
pub use overlay::{
    NameCollision, OverlayError, OverlayInfo, OverlayRecord, OverlayRegistry, OverlayResult,
    OverlayTarget, OverlayTargets,
};
pub use viewer::{SharedSkyViewer, SkyViewer, ViewerWarning, create_shared_viewer};
