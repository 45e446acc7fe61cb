//! Named overlay layers
//!
//! Every layer drawn by a viewer is tracked as an [`OverlayRecord`] in the
//! viewer's [`OverlayRegistry`]. Names are unique within a registry; a
//! requested name that is already taken is resolved to `name_1`, `name_2`, ...

mod record;
mod registry;

pub use record::{OverlayInfo, OverlayRecord, OverlayTarget, OverlayTargets};
pub use registry::{NameCollision, OverlayRegistry};

use skyview_core::{CoordError, InvalidOverlayKind, OverlayKind, TableError};
use thiserror::Error;

/// Overlay-related errors
#[derive(Debug, Clone, Error, PartialEq)]
pub enum OverlayError {
    #[error(transparent)]
    InvalidKind(#[from] InvalidOverlayKind),

    #[error("Overlay of type '{kind}' cannot carry a '{payload}' payload")]
    PayloadMismatch {
        kind: OverlayKind,
        payload: OverlayKind,
    },

    #[error("Overlay options must contain a name")]
    MissingName,

    #[error("Overlay layer `{0}` is already registered")]
    DuplicateName(String),

    #[error("Overlay layer not found: {0}")]
    NotFound(String),

    #[error("Cannot remove overlay layer `{0}` since this layer does not exist.")]
    UnknownOverlay(String),

    #[error("No options were given, there is nothing to update")]
    EmptyUpdate,

    #[error("Reading region objects requires the `{0}` feature")]
    MissingDependency(&'static str),

    #[error("The table does not contain an `s_region` column, so no footprints can be loaded.")]
    MissingFootprints,

    #[error("Footprint at row {0} is not an STC-S string")]
    InvalidFootprint(usize),

    #[error("Mean table position is not a valid sky position: {0}")]
    InvalidTablePosition(#[from] CoordError),

    #[error("Table error: {0}")]
    Table(#[from] TableError),
}

/// Result type for overlay operations
pub type OverlayResult<T> = Result<T, OverlayError>;
