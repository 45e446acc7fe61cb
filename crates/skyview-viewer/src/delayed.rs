//! Overlay adds postponed until the widget has rendered
//!
//! Each function runs the add right away when the widget has already
//! rendered, otherwise once on its first render. Failures cannot reach the
//! caller at that point, so they are logged and recorded as viewer warnings.

use std::sync::Arc;

use skyview_core::{Marker, OverlayOptions, Region, SourceTable, TableShape};
use skyview_widget::DeferredCall;
use tracing::warn;

use crate::overlay::{OverlayRecord, OverlayResult};
use crate::viewer::{SharedSkyViewer, SkyViewer, ViewerWarning};

fn delayed<F>(viewer: &SharedSkyViewer, operation: &'static str, add: F) -> Arc<DeferredCall>
where
    F: FnOnce(&mut SkyViewer) -> OverlayResult<OverlayRecord> + Send + 'static,
{
    // Released before the call may fire
    let widget = Arc::clone(viewer.lock().widget());
    let viewer = Arc::clone(viewer);

    DeferredCall::when_rendered(&widget, move || {
        let mut viewer = viewer.lock();
        if let Err(e) = add(&mut viewer) {
            warn!("Delayed {} failed: {}", operation, e);
            viewer.push_warning(ViewerWarning::DelayedAddFailed {
                operation,
                message: e.to_string(),
            });
        }
    })
}

pub fn delayed_add_markers(
    viewer: &SharedSkyViewer,
    markers: Vec<Marker>,
    options: OverlayOptions,
) -> Arc<DeferredCall> {
    delayed(viewer, "add_markers", move |v| v.add_markers(markers, options))
}

pub fn delayed_add_catalog_from_url(
    viewer: &SharedSkyViewer,
    votable_url: impl Into<String>,
    options: OverlayOptions,
) -> Arc<DeferredCall> {
    let votable_url = votable_url.into();
    delayed(viewer, "add_catalog_from_url", move |v| {
        v.add_catalog_from_url(votable_url, options)
    })
}

pub fn delayed_add_table(
    viewer: &SharedSkyViewer,
    table: impl Into<Arc<SourceTable>>,
    shape: TableShape,
    options: OverlayOptions,
) -> Arc<DeferredCall> {
    let table = table.into();
    delayed(viewer, "add_table", move |v| {
        v.add_table(table, shape, options)
    })
}

pub fn delayed_add_graphic_overlay_from_stcs(
    viewer: &SharedSkyViewer,
    stc_strings: Vec<String>,
    options: OverlayOptions,
) -> Arc<DeferredCall> {
    delayed(viewer, "add_graphic_overlay_from_stcs", move |v| {
        v.add_graphic_overlay_from_stcs(stc_strings, options)
    })
}

pub fn delayed_add_graphic_overlay_from_region(
    viewer: &SharedSkyViewer,
    regions: Vec<Region>,
    options: OverlayOptions,
) -> Arc<DeferredCall> {
    delayed(viewer, "add_graphic_overlay_from_region", move |v| {
        v.add_graphic_overlay_from_region(regions, options)
    })
}
