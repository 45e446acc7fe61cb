//! Sync adapter over a HiPS widget

use skyview_core::{
    Angle, CoordinateFrame, FovXY, PixelLimits, SkyCoord, TanWcs, ViewportError, ViewportState,
    ViewportUpdate,
};
use skyview_widget::{Attribute, ChangeCallback, SharedHipsWidget, aid};
use uuid::Uuid;

use crate::adapter::{CallbackId, SyncResult, ViewerSyncAdapter, require_sky_frame};

/// HiPS viewer adapter; viewport access goes through the `aid` API
pub struct HipsSyncAdapter {
    widget: SharedHipsWidget,
}

impl HipsSyncAdapter {
    pub fn new(widget: SharedHipsWidget) -> Self {
        Self { widget }
    }

    pub fn widget(&self) -> &SharedHipsWidget {
        &self.widget
    }

    fn fov_xy(&self) -> SyncResult<FovXY> {
        self.widget.fov_xy().ok_or_else(|| {
            ViewportError::FovUnavailable(format!(
                "HiPS viewer {} has not reported its per-axis fov",
                self.widget.id()
            ))
            .into()
        })
    }
}

impl ViewerSyncAdapter for HipsSyncAdapter {
    fn viewer_id(&self) -> Uuid {
        self.widget.id()
    }

    fn get_center(&self) -> SyncResult<SkyCoord> {
        Ok(self.widget.target())
    }

    fn get_fov(&self) -> SyncResult<FovXY> {
        self.fov_xy()
    }

    fn get_rotation(&self) -> SyncResult<Option<Angle>> {
        Ok(Some(self.widget.rotation()))
    }

    /// The HiPS view is centred on its target, so the corners are found by
    /// offsetting the target by half the fov along each axis.
    fn get_limits(&self, wcs: &TanWcs) -> SyncResult<PixelLimits> {
        let fov_xy = self.fov_xy()?;
        let target = self.widget.target();
        let half_x = fov_xy.x() / 2.0;
        let half_y = fov_xy.y() / 2.0;

        let corners = [
            (half_x, half_y),
            (-half_x, half_y),
            (half_x, -half_y),
            (-half_x, -half_y),
        ]
        .into_iter()
        .map(|(dx, dy)| wcs.world_to_pixel(&target.spherical_offsets_by(dx, dy)))
        .collect::<Result<Vec<_>, _>>()?;

        PixelLimits::from_points(corners).ok_or_else(|| {
            ViewportError::FovUnavailable("no corners were projected".to_string()).into()
        })
    }

    fn set_viewport(&self, update: &ViewportUpdate) -> SyncResult<()> {
        aid::set_viewport(self.widget.as_ref(), update)?;
        Ok(())
    }

    fn get_viewport(&self, frame: Option<CoordinateFrame>) -> SyncResult<ViewportState> {
        require_sky_frame(frame)?;
        Ok(aid::get_viewport(self.widget.as_ref(), frame, None)?)
    }

    fn add_callback(&self, callback: ChangeCallback) -> CallbackId {
        self.widget.observe(&Attribute::VIEWPORT, callback)
    }

    fn remove_callback(&self, id: CallbackId) -> bool {
        self.widget.unobserve(id)
    }

    fn show(&self) {
        self.widget.display();
    }

    fn sync_to(&self, other: &dyn ViewerSyncAdapter) -> SyncResult<()> {
        let viewport = other.get_viewport(Some(CoordinateFrame::Sky))?;
        self.set_viewport(&ViewportUpdate::from(viewport))
    }
}
