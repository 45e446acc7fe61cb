//! Side-by-side workspace of sky and image viewers

use std::sync::Arc;

use skyview_viewer::SharedSkyViewer;
use skyview_widget::{ImageWidget, SharedImageWidget};
use thiserror::Error;
use tracing::{info, warn};

use crate::config::WorkspaceConfig;
use crate::context::AppContext;
use crate::sync_ui::SyncUi;

/// Workspace error types
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum WorkspaceError {
    #[error("No viewers to show in the workspace")]
    NoViewers,
}

pub type WorkspaceResult<T> = Result<T, WorkspaceError>;

/// A viewer placed in the workspace
#[derive(Clone)]
pub enum WorkspaceViewer {
    Sky(SharedSkyViewer),
    Image(SharedImageWidget),
}

impl WorkspaceViewer {
    pub fn is_sky(&self) -> bool {
        matches!(self, WorkspaceViewer::Sky(_))
    }

    pub fn is_image(&self) -> bool {
        matches!(self, WorkspaceViewer::Image(_))
    }

    fn display(&self) {
        match self {
            WorkspaceViewer::Sky(viewer) => viewer.lock().display(),
            WorkspaceViewer::Image(widget) => widget.show(),
        }
    }
}

/// Options for [`Workspace::open`]
#[derive(Clone)]
pub struct WorkspaceOptions {
    /// Viewers to show
    pub viewers: Vec<WorkspaceViewer>,
    /// Add a sky viewer when `viewers` has none
    pub include_sky: bool,
    /// Add an image viewer when `viewers` has none
    pub include_image: bool,
    /// Reuse the current viewers of the context instead of creating new ones
    pub use_current_viewers: bool,
    pub title: String,
    /// Viewer height in pixels
    pub height: u32,
}

impl Default for WorkspaceOptions {
    fn default() -> Self {
        Self::from_config(&WorkspaceConfig::default())
    }
}

impl WorkspaceOptions {
    pub fn from_config(config: &WorkspaceConfig) -> Self {
        Self {
            viewers: Vec::new(),
            include_sky: config.include_sky,
            include_image: config.include_image,
            use_current_viewers: config.use_current_viewers,
            title: "skyview".to_string(),
            height: config.height,
        }
    }

    pub fn with_viewer(mut self, viewer: WorkspaceViewer) -> Self {
        self.viewers.push(viewer);
        self
    }
}

/// The viewers shown together
pub struct Workspace {
    title: String,
    height: u32,
    viewers: Vec<WorkspaceViewer>,
}

impl Workspace {
    /// Collect the requested viewers, creating missing ones through `context`,
    /// and display them.
    ///
    /// A missing image backend only drops the image viewer.
    pub fn open(context: &mut AppContext, options: WorkspaceOptions) -> WorkspaceResult<Self> {
        let WorkspaceOptions {
            mut viewers,
            include_sky,
            include_image,
            use_current_viewers,
            title,
            height,
        } = options;

        if include_sky && !viewers.iter().any(WorkspaceViewer::is_sky) {
            let viewer = match context.existing_viewer() {
                Some(viewer) if use_current_viewers => viewer,
                _ => context.new_viewer(),
            };
            viewers.push(WorkspaceViewer::Sky(viewer));
        }

        if include_image && !viewers.iter().any(WorkspaceViewer::is_image) {
            if !context.has_image_backend() {
                warn!("No image viewer backend is available, opening the workspace without one");
            } else {
                let widget = match context.current_image_viewer() {
                    Some(widget) if use_current_viewers => Some(widget),
                    _ => context.new_image_viewer(),
                };
                viewers.extend(widget.map(WorkspaceViewer::Image));
            }
        }

        if viewers.is_empty() {
            return Err(WorkspaceError::NoViewers);
        }

        for viewer in &viewers {
            viewer.display();
        }
        info!("Opened workspace '{}' with {} viewers", title, viewers.len());

        Ok(Self {
            title,
            height,
            viewers,
        })
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn resize(&mut self, height: u32) {
        self.height = height;
    }

    pub fn viewers(&self) -> &[WorkspaceViewer] {
        &self.viewers
    }

    pub fn sky_viewers(&self) -> impl Iterator<Item = &SharedSkyViewer> {
        self.viewers.iter().filter_map(|v| match v {
            WorkspaceViewer::Sky(viewer) => Some(viewer),
            WorkspaceViewer::Image(_) => None,
        })
    }

    pub fn image_viewers(&self) -> impl Iterator<Item = &SharedImageWidget> {
        self.viewers.iter().filter_map(|v| match v {
            WorkspaceViewer::Image(widget) => Some(widget),
            WorkspaceViewer::Sky(_) => None,
        })
    }

    /// Sync controls over the first sky and the first image viewer
    pub fn sync_ui(&self) -> Option<SyncUi> {
        let sky = Arc::clone(self.sky_viewers().next()?.lock().widget());
        let image = Arc::clone(self.image_viewers().next()?);
        Some(SyncUi::from_widgets(sky, image))
    }
}
