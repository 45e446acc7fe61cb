//! Sky Viewer Core Data Structures
//!
//! This crate contains the data model shared by the sky viewer crates:
//! - Angle / SkyCoord: sky positions and angular sizes in degrees
//! - TanWcs / PixelLimits: pixel frames of image viewers
//! - Viewport: center, field of view and rotation of a view
//! - Overlay: kinds, options and retained payloads of named overlay layers
//! - Region / SourceTable: inputs of region and table overlays
//! - ViewerCommand: messages sent to viewer widgets

pub mod angle;
pub mod command;
pub mod coord;
pub mod overlay;
pub mod region;
pub mod table;
pub mod viewport;
pub mod wcs;

pub use angle::*;
pub use command::*;
pub use coord::*;
pub use overlay::*;
pub use region::*;
pub use table::*;
pub use viewport::*;
pub use wcs::*;
