//! Viewer widget traits
//!
//! These traits describe what the system needs from the rendering widgets.
//! Setters take `&self`: widgets own their interior state and notify
//! observers after the change has been applied.

use std::sync::Arc;

use skyview_core::{Angle, FovXY, PixelLimits, SkyCoord, TanWcs, ViewerCommand};
use uuid::Uuid;

use crate::observer::{Attribute, ChangeCallback, ObserverId};

/// A HiPS sky browser widget
pub trait HipsWidget: Send + Sync {
    /// Stable identity of this widget
    fn id(&self) -> Uuid;

    /// Center of the view
    fn target(&self) -> SkyCoord;

    fn set_target(&self, target: SkyCoord);

    /// Horizontal field of view
    fn fov(&self) -> Angle;

    /// Set the horizontal field of view; the front end rescales both axes
    fn set_fov(&self, fov: Angle);

    /// Per-axis field of view reported by the front end
    ///
    /// `None` until the front end has rendered at least once.
    fn fov_xy(&self) -> Option<FovXY>;

    /// Angle between "up" and north, east of north
    fn rotation(&self) -> Angle;

    fn set_rotation(&self, rotation: Angle);

    /// Whether the front end has rendered and reported its projection
    fn is_rendered(&self) -> bool;

    /// Register a callback for changes of `attributes`
    fn observe(&self, attributes: &[Attribute], callback: ChangeCallback) -> ObserverId;

    /// Unregister a callback; returns false if it was not registered
    fn unobserve(&self, id: ObserverId) -> bool;

    /// Forward a command to the front end
    fn send(&self, command: ViewerCommand);

    /// Ask the host to display this widget
    fn display(&self);
}

/// An image viewer with a pixel frame tied to the sky by a WCS
pub trait ImageWidget: Send + Sync {
    /// Stable identity of this widget
    fn id(&self) -> Uuid;

    /// Pixel box currently displayed
    fn limits(&self) -> PixelLimits;

    fn set_limits(&self, limits: PixelLimits);

    /// WCS of the reference data; `None` before any data is loaded
    fn reference_wcs(&self) -> Option<TanWcs>;

    /// Register a callback for changes of `attributes`
    fn observe(&self, attributes: &[Attribute], callback: ChangeCallback) -> ObserverId;

    /// Unregister a callback; returns false if it was not registered
    fn unobserve(&self, id: ObserverId) -> bool;

    /// Ask the host to display this viewer
    fn show(&self);

    /// Align loaded data by WCS instead of pixels
    fn link_by_wcs(&self);

    /// Orient the view north up, east left
    fn set_north_up_east_left(&self);
}

pub type SharedHipsWidget = Arc<dyn HipsWidget>;
pub type SharedImageWidget = Arc<dyn ImageWidget>;
