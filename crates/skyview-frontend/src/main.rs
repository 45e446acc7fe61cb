//! Sky viewer entry point
//!
//! Runs a session on headless viewers: opens the workspace, applies the
//! configured sync mode, then pans the sky viewer and reports what the image
//! viewer shows.

use std::sync::Arc;

use glam::DVec2;
use skyview_core::{
    Angle, FovXY, Marker, OverlayOptions, PixelLimits, SkyCoord, TanWcs, ViewportUpdate,
};
use skyview_frontend::{AppContext, ConfigManager, SyncMode, Workspace, WorkspaceOptions, logging};
use skyview_widget::{
    HeadlessHipsWidget, HeadlessImageWidget, ImageWidget, SharedHipsWidget, SharedImageWidget,
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    logging::init("skyview_frontend=debug,skyview_sync=debug,skyview_viewer=debug");

    tracing::info!("Starting skyview");

    let mut config = ConfigManager::new();
    let app_config = config.config().clone();

    let crab = SkyCoord::new(83.633, 22.0145)?;
    // 2048 x 2048 pixels at 1 arcsec per pixel
    let wcs = TanWcs::north_up(crab, DVec2::new(1024.0, 1024.0), Angle::from_arcsec(1.0))?;

    let mut context = AppContext::new(Box::new(move || -> SharedHipsWidget {
        Arc::new(HeadlessHipsWidget::new(crab, FovXY { x: 1.5, y: 1.0 }))
    }))
    .with_viewer_config(app_config.viewer.clone())
    .with_image_backend(Box::new(move || -> SharedImageWidget {
        Arc::new(HeadlessImageWidget::new(
            Some(wcs),
            PixelLimits::new(0.0, 2048.0, 0.0, 2048.0),
        ))
    }));

    let workspace = Workspace::open(
        &mut context,
        WorkspaceOptions::from_config(&app_config.workspace),
    )?;

    let viewer = context.current_viewer();
    viewer.lock().add_markers(
        vec![Marker::new("83.633 22.0145", "M1", "Crab Nebula")],
        OverlayOptions::new().with("name", "crab"),
    )?;

    if let Some(mut sync_ui) = workspace.sync_ui() {
        let mode = match app_config.sync.initial_mode {
            SyncMode::Off => SyncMode::FollowSky,
            mode => mode,
        };
        sync_ui.set_mode(mode)?;

        viewer.lock().set_viewport(
            &ViewportUpdate::new()
                .with_center(SkyCoord::new(83.7, 22.05)?)
                .with_fov(0.25),
        )?;

        if let Some(image) = workspace.image_viewers().next() {
            let limits = image.limits();
            tracing::info!(
                "Image viewer shows x {:.1}..{:.1}, y {:.1}..{:.1}",
                limits.x_min,
                limits.x_max,
                limits.y_min,
                limits.y_max
            );
        }

        sync_ui.set_mode(SyncMode::Off)?;
    }

    config.save()?;
    context.shutdown();
    Ok(())
}
