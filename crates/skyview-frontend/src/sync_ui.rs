//! Sync mode toggle between the sky viewer and the image viewer

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use skyview_sync::{
    HipsSyncAdapter, ImageSyncAdapter, SharedSyncAdapter, SyncManager, SyncResult,
};
use skyview_widget::{SharedHipsWidget, SharedImageWidget};
use tracing::{info, warn};

/// Which viewer leads
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum SyncMode {
    /// No syncing
    #[default]
    Off,
    /// The sky viewer follows the image viewer
    FollowImage,
    /// The image viewer follows the sky viewer
    FollowSky,
}

impl SyncMode {
    pub const ALL: [SyncMode; 3] = [SyncMode::Off, SyncMode::FollowImage, SyncMode::FollowSky];

    pub fn name(&self) -> &'static str {
        match self {
            SyncMode::Off => "None",
            SyncMode::FollowImage => "Image",
            SyncMode::FollowSky => "Sky",
        }
    }

    /// Longer description shown next to the mode selector
    pub fn tooltip(&self) -> &'static str {
        match self {
            SyncMode::Off => "No Syncing",
            SyncMode::FollowImage => "Sync to the image viewer",
            SyncMode::FollowSky => "Sync to the sky viewer",
        }
    }
}

/// Sync controls for one sky viewer and one image viewer
pub struct SyncUi {
    sky: SharedSyncAdapter,
    image: SharedSyncAdapter,
    manager: SyncManager,
    mode: SyncMode,
}

impl SyncUi {
    pub fn new(sky: SharedSyncAdapter, image: SharedSyncAdapter) -> Self {
        Self {
            sky,
            image,
            manager: SyncManager::new(),
            mode: SyncMode::Off,
        }
    }

    pub fn from_widgets(sky: SharedHipsWidget, image: SharedImageWidget) -> Self {
        Self::new(
            Arc::new(HipsSyncAdapter::new(sky)),
            Arc::new(ImageSyncAdapter::new(image)),
        )
    }

    pub fn mode(&self) -> SyncMode {
        self.mode
    }

    pub fn manager(&self) -> &SyncManager {
        &self.manager
    }

    /// Switch mode. When the new pair cannot be started, syncing is off.
    pub fn set_mode(&mut self, mode: SyncMode) -> SyncResult<()> {
        let result = match mode {
            SyncMode::Off => {
                self.manager.stop_real_time_sync();
                Ok(())
            }
            SyncMode::FollowImage => self
                .manager
                .start_real_time_sync(Arc::clone(&self.image), Arc::clone(&self.sky)),
            SyncMode::FollowSky => self
                .manager
                .start_real_time_sync(Arc::clone(&self.sky), Arc::clone(&self.image)),
        };

        match result {
            Ok(()) => {
                info!("Sync mode set to {}: {}", mode.name(), mode.tooltip());
                self.mode = mode;
                Ok(())
            }
            Err(e) => {
                warn!("Could not switch sync mode to {}: {}", mode.name(), e);
                self.manager.stop_real_time_sync();
                self.mode = SyncMode::Off;
                Err(e)
            }
        }
    }

    /// Show the image viewer, then the sky viewer
    pub fn display(&self) {
        self.image.show();
        self.sky.show();
    }
}
