//! Application context: the viewers created during a session
//!
//! The most recently registered viewer of each kind is the current one.

use std::sync::Arc;

use parking_lot::Mutex;
use skyview_viewer::{SharedSkyViewer, SkyViewer, ViewerConfig, create_shared_viewer};
use skyview_widget::{HipsWidget, ImageWidget, SharedHipsWidget, SharedImageWidget};
use tracing::info;

/// Creates the widget behind a new sky viewer
pub type HipsWidgetFactory = Box<dyn Fn() -> SharedHipsWidget + Send + Sync>;

/// Creates a new image viewer; absent when no image backend is available
pub type ImageWidgetFactory = Box<dyn Fn() -> SharedImageWidget + Send + Sync>;

/// Shared application context type
pub type SharedAppContext = Arc<Mutex<AppContext>>;

pub struct AppContext {
    viewer_config: ViewerConfig,
    hips_factory: HipsWidgetFactory,
    image_factory: Option<ImageWidgetFactory>,
    viewers: Vec<SharedSkyViewer>,
    image_viewers: Vec<SharedImageWidget>,
}

impl AppContext {
    pub fn new(hips_factory: HipsWidgetFactory) -> Self {
        Self {
            viewer_config: ViewerConfig::default(),
            hips_factory,
            image_factory: None,
            viewers: Vec::new(),
            image_viewers: Vec::new(),
        }
    }

    /// Overlay defaults applied to viewers created by this context
    pub fn with_viewer_config(mut self, config: ViewerConfig) -> Self {
        self.viewer_config = config;
        self
    }

    pub fn with_image_backend(mut self, factory: ImageWidgetFactory) -> Self {
        self.image_factory = Some(factory);
        self
    }

    pub fn has_image_backend(&self) -> bool {
        self.image_factory.is_some()
    }

    /// Make `viewer` the current sky viewer
    pub fn register_viewer(&mut self, viewer: SharedSkyViewer) {
        self.viewers.retain(|v| !Arc::ptr_eq(v, &viewer));
        self.viewers.push(viewer);
    }

    /// Make `widget` the current image viewer
    pub fn register_image_viewer(&mut self, widget: SharedImageWidget) {
        self.image_viewers.retain(|w| !Arc::ptr_eq(w, &widget));
        self.image_viewers.push(widget);
    }

    /// Current sky viewer, if one exists
    pub fn existing_viewer(&self) -> Option<SharedSkyViewer> {
        self.viewers.last().cloned()
    }

    /// Current sky viewer, creating and registering one when none exists
    pub fn current_viewer(&mut self) -> SharedSkyViewer {
        match self.existing_viewer() {
            Some(viewer) => viewer,
            None => self.new_viewer(),
        }
    }

    /// Create a sky viewer and make it current
    pub fn new_viewer(&mut self) -> SharedSkyViewer {
        let widget = (self.hips_factory)();
        info!("Created sky viewer {}", widget.id());
        let viewer = create_shared_viewer(SkyViewer::with_config(
            widget,
            self.viewer_config.clone(),
        ));
        self.register_viewer(Arc::clone(&viewer));
        viewer
    }

    pub fn current_image_viewer(&self) -> Option<SharedImageWidget> {
        self.image_viewers.last().cloned()
    }

    /// Create an image viewer and make it current; `None` without an image backend
    pub fn new_image_viewer(&mut self) -> Option<SharedImageWidget> {
        let widget = (self.image_factory.as_ref()?)();
        info!("Created image viewer {}", widget.id());
        self.register_image_viewer(Arc::clone(&widget));
        Some(widget)
    }

    pub fn viewers(&self) -> &[SharedSkyViewer] {
        &self.viewers
    }

    pub fn image_viewers(&self) -> &[SharedImageWidget] {
        &self.image_viewers
    }

    /// Forget every viewer
    pub fn shutdown(&mut self) {
        info!(
            "Shutting down {} sky and {} image viewers",
            self.viewers.len(),
            self.image_viewers.len()
        );
        self.viewers.clear();
        self.image_viewers.clear();
    }
}

/// Create a new shared application context
pub fn create_shared_context(context: AppContext) -> SharedAppContext {
    Arc::new(Mutex::new(context))
}

#[cfg(test)]
mod tests {
    use super::*;
    use skyview_core::{FovXY, PixelLimits, SkyCoord};
    use skyview_widget::{HeadlessHipsWidget, HeadlessImageWidget};

    fn hips_factory() -> HipsWidgetFactory {
        Box::new(|| -> SharedHipsWidget {
            Arc::new(HeadlessHipsWidget::new(
                SkyCoord::new(0.0, 0.0).unwrap(),
                FovXY { x: 60.0, y: 40.0 },
            ))
        })
    }

    fn image_factory() -> ImageWidgetFactory {
        Box::new(|| -> SharedImageWidget {
            Arc::new(HeadlessImageWidget::new(
                None,
                PixelLimits::new(0.0, 100.0, 0.0, 100.0),
            ))
        })
    }

    #[test]
    fn test_current_viewer_is_created_once() {
        let mut context = AppContext::new(hips_factory());
        assert!(context.existing_viewer().is_none());

        let first = context.current_viewer();
        let second = context.current_viewer();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(context.viewers().len(), 1);
    }

    #[test]
    fn test_latest_registered_is_current() {
        let mut context = AppContext::new(hips_factory());
        let first = context.new_viewer();
        let second = context.new_viewer();
        assert!(Arc::ptr_eq(&context.current_viewer(), &second));

        context.register_viewer(Arc::clone(&first));
        assert!(Arc::ptr_eq(&context.current_viewer(), &first));
        assert_eq!(context.viewers().len(), 2);
    }

    #[test]
    fn test_created_viewers_use_config() {
        let config = ViewerConfig {
            default_catalog_name: "cat".to_string(),
            ..ViewerConfig::default()
        };
        let mut context = AppContext::new(hips_factory()).with_viewer_config(config);
        let viewer = context.current_viewer();
        assert_eq!(viewer.lock().config().default_catalog_name, "cat");
    }

    #[test]
    fn test_image_viewers_need_backend() {
        let mut context = AppContext::new(hips_factory());
        assert!(context.new_image_viewer().is_none());
        assert!(context.current_image_viewer().is_none());

        let mut context = AppContext::new(hips_factory()).with_image_backend(image_factory());
        let image = context.new_image_viewer().unwrap();
        assert!(Arc::ptr_eq(&context.current_image_viewer().unwrap(), &image));
    }

    #[test]
    fn test_shutdown_clears() {
        let mut context = AppContext::new(hips_factory()).with_image_backend(image_factory());
        context.current_viewer();
        context.new_image_viewer();
        context.shutdown();
        assert!(context.existing_viewer().is_none());
        assert!(context.current_image_viewer().is_none());
    }
}
