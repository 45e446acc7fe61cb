//! Sync adapter over an image viewer

use glam::DVec2;
use skyview_core::{
    Angle, CoordinateFrame, FovXY, PixelLimits, SkyCoord, TanWcs, ViewportState, ViewportUpdate,
};
use skyview_widget::{Attribute, ChangeCallback, SharedImageWidget};
use tracing::warn;
use uuid::Uuid;

use crate::adapter::{CallbackId, SyncError, SyncResult, ViewerSyncAdapter, require_sky_frame};

/// Image viewer adapter
///
/// The view is a pixel box of the reference data; its sky position comes
/// from the reference data's WCS, which also fixes the orientation.
pub struct ImageSyncAdapter {
    widget: SharedImageWidget,
}

impl ImageSyncAdapter {
    pub fn new(widget: SharedImageWidget) -> Self {
        Self { widget }
    }

    pub fn widget(&self) -> &SharedImageWidget {
        &self.widget
    }

    fn wcs(&self) -> SyncResult<TanWcs> {
        self.widget
            .reference_wcs()
            .ok_or(SyncError::NoReferenceWcs(self.widget.id()))
    }
}

/// Sky extent of the edges of a pixel box
fn fov_of(wcs: &TanWcs, limits: &PixelLimits) -> FovXY {
    let lower_left = wcs.pixel_to_world(limits.lower_left());
    let lower_right = wcs.pixel_to_world(limits.lower_right());
    let upper_left = wcs.pixel_to_world(limits.upper_left());

    FovXY::new(
        lower_left.separation(&lower_right),
        lower_left.separation(&upper_left),
    )
}

impl ViewerSyncAdapter for ImageSyncAdapter {
    fn viewer_id(&self) -> Uuid {
        self.widget.id()
    }

    fn get_center(&self) -> SyncResult<SkyCoord> {
        let wcs = self.wcs()?;
        Ok(wcs.pixel_to_world(self.widget.limits().center()))
    }

    fn get_fov(&self) -> SyncResult<FovXY> {
        let wcs = self.wcs()?;
        Ok(fov_of(&wcs, &self.widget.limits()))
    }

    fn get_rotation(&self) -> SyncResult<Option<Angle>> {
        let wcs = self.wcs()?;
        let angle = wcs.y_axis_position_angle(self.widget.limits().center())?;
        Ok(Some(angle))
    }

    fn get_limits(&self, wcs: &TanWcs) -> SyncResult<PixelLimits> {
        let own = self.wcs()?;
        let corners = self
            .widget
            .limits()
            .corners()
            .into_iter()
            .map(|corner| wcs.world_to_pixel(&own.pixel_to_world(corner)))
            .collect::<Result<Vec<DVec2>, _>>()?;

        PixelLimits::from_points(corners).ok_or(SyncError::NoReferenceWcs(self.widget.id()))
    }

    /// Pans to the requested center and zooms so the shorter axis spans the
    /// requested fov. Rotation cannot be changed.
    ///
    /// The limits are written once at the end, so a failed zoom leaves the
    /// view untouched.
    fn set_viewport(&self, update: &ViewportUpdate) -> SyncResult<()> {
        update.validate()?;
        if update.is_empty() {
            return Ok(());
        }

        let wcs = self.wcs()?;
        let mut limits = self.widget.limits();

        if let Some(center) = update.center {
            limits = limits.recentred(wcs.world_to_pixel(&center)?);
        }

        if let Some(fov) = update.fov {
            let current = fov_of(&wcs, &limits);
            limits = limits.scaled_about_center(current.scale_factor_for(fov)?);
        }

        if let Some(rotation) = update.rotation {
            warn!(
                "Image viewer {} keeps the reference orientation, ignoring rotation {}",
                self.widget.id(),
                rotation
            );
        }

        self.widget.set_limits(limits);
        Ok(())
    }

    fn get_viewport(&self, frame: Option<CoordinateFrame>) -> SyncResult<ViewportState> {
        require_sky_frame(frame)?;
        Ok(ViewportState::new(
            self.get_center()?,
            self.get_fov()?.shorter(),
            self.get_rotation()?,
        )?)
    }

    fn add_callback(&self, callback: ChangeCallback) -> CallbackId {
        self.widget.observe(&[Attribute::Limits], callback)
    }

    fn remove_callback(&self, id: CallbackId) -> bool {
        self.widget.unobserve(id)
    }

    fn show(&self) {
        self.widget.show();
        self.widget.link_by_wcs();
        self.widget.set_north_up_east_left();
    }

    fn sync_to(&self, other: &dyn ViewerSyncAdapter) -> SyncResult<()> {
        let wcs = self.wcs()?;
        let limits = other.get_limits(&wcs)?;
        self.widget.set_limits(limits);
        Ok(())
    }
}
