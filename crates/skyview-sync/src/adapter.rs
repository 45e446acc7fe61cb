//! The viewer-agnostic sync capability set

use std::sync::Arc;

use skyview_core::{
    Angle, CoordinateFrame, FovXY, PixelLimits, SkyCoord, TanWcs, ViewportError, ViewportState,
    ViewportUpdate, WcsError,
};
use skyview_widget::{ChangeCallback, ObserverId};
use thiserror::Error;
use uuid::Uuid;

/// Error type for sync operations
#[derive(Debug, Clone, Error, PartialEq)]
pub enum SyncError {
    #[error("Cannot sync viewer {0} to itself")]
    SelfSync(Uuid),

    #[error("Image viewer {0} has no reference data with a WCS")]
    NoReferenceWcs(Uuid),

    #[error("No registered sync adapter for viewer id {0}")]
    UnknownViewer(String),

    #[error(transparent)]
    Viewport(#[from] ViewportError),

    #[error(transparent)]
    Projection(#[from] WcsError),
}

/// Result type for sync operations
pub type SyncResult<T> = Result<T, SyncError>;

/// Handle of a registered change callback
pub type CallbackId = ObserverId;

/// Shared adapter handle
pub type SharedSyncAdapter = Arc<dyn ViewerSyncAdapter>;

/// Uniform viewport capabilities over a concrete viewer
///
/// The two viewer kinds disagree on what a field of view is (a shorter-axis
/// angle versus a pixel box), so each adapter converts in [`sync_to`].
///
/// [`sync_to`]: ViewerSyncAdapter::sync_to
pub trait ViewerSyncAdapter: Send + Sync {
    /// Identity of the underlying viewer
    fn viewer_id(&self) -> Uuid;

    fn get_center(&self) -> SyncResult<SkyCoord>;

    /// Field of view along each viewport axis
    fn get_fov(&self) -> SyncResult<FovXY>;

    fn get_rotation(&self) -> SyncResult<Option<Angle>>;

    /// Pixel box of this view expressed in another viewer's WCS
    fn get_limits(&self, wcs: &TanWcs) -> SyncResult<PixelLimits>;

    /// Apply a partial viewport change; `None` fields are left alone
    fn set_viewport(&self, update: &ViewportUpdate) -> SyncResult<()>;

    /// Current viewport; only the sky frame is supported
    fn get_viewport(&self, frame: Option<CoordinateFrame>) -> SyncResult<ViewportState>;

    /// Call `callback` whenever this view changes
    fn add_callback(&self, callback: ChangeCallback) -> CallbackId;

    fn remove_callback(&self, id: CallbackId) -> bool;

    /// Trigger the viewer's own display action
    fn show(&self);

    /// Make this view show what `other` shows
    fn sync_to(&self, other: &dyn ViewerSyncAdapter) -> SyncResult<()>;
}

/// Reject frames other than the sky frame
pub(crate) fn require_sky_frame(frame: Option<CoordinateFrame>) -> SyncResult<()> {
    match frame.unwrap_or_default() {
        CoordinateFrame::Sky => Ok(()),
        CoordinateFrame::Pixel => Err(ViewportError::Unsupported(
            "Only the sky frame is supported for viewport sync".to_string(),
        )
        .into()),
    }
}
