//! Headless widgets
//!
//! In-memory stand-ins for the front-end widgets. They keep the same state a
//! real front end reports back, record every command they receive, and
//! notify observers only when a value actually changes.

use parking_lot::Mutex;
use skyview_core::{Angle, FovXY, PixelLimits, SkyCoord, TanWcs, ViewerCommand};
use tracing::debug;
use uuid::Uuid;

use crate::observer::{Attribute, AttributeChange, ChangeCallback, ObserverId, ObserverSet, dispatch};
use crate::widget::{HipsWidget, ImageWidget};

struct HipsState {
    target: SkyCoord,
    fov: Angle,
    fov_xy: Option<FovXY>,
    /// Height over width, used to rescale `fov_xy` when `fov` changes
    aspect: f64,
    rotation: Angle,
    rendered: bool,
    sent: Vec<ViewerCommand>,
    overlays: Vec<String>,
    display_count: usize,
}

/// In-memory HiPS widget
pub struct HeadlessHipsWidget {
    id: Uuid,
    state: Mutex<HipsState>,
    observers: Mutex<ObserverSet>,
}

impl HeadlessHipsWidget {
    /// A rendered widget showing `fov_xy` around `target`
    pub fn new(target: SkyCoord, fov_xy: FovXY) -> Self {
        Self::with_state(HipsState {
            target,
            fov: fov_xy.x(),
            fov_xy: Some(fov_xy),
            aspect: fov_xy.aspect(),
            rotation: Angle::ZERO,
            rendered: true,
            sent: Vec::new(),
            overlays: Vec::new(),
            display_count: 0,
        })
    }

    /// A widget that has not been rendered yet: no `fov_xy`, no projection
    pub fn unrendered(target: SkyCoord, fov: Angle) -> Self {
        Self::with_state(HipsState {
            target,
            fov,
            fov_xy: None,
            aspect: 1.0,
            rotation: Angle::ZERO,
            rendered: false,
            sent: Vec::new(),
            overlays: Vec::new(),
            display_count: 0,
        })
    }

    fn with_state(state: HipsState) -> Self {
        Self {
            id: Uuid::new_v4(),
            state: Mutex::new(state),
            observers: Mutex::new(ObserverSet::new()),
        }
    }

    /// Simulate the first render of the front end
    pub fn mark_rendered(&self, fov_xy: FovXY) {
        {
            let mut state = self.state.lock();
            state.fov = fov_xy.x();
            state.fov_xy = Some(fov_xy);
            state.aspect = fov_xy.aspect();
            state.rendered = true;
        }
        self.notify(Attribute::Fov);
        self.notify(Attribute::Wcs);
    }

    /// Simulate a front-end resize reporting new per-axis fov
    pub fn set_fov_xy(&self, fov_xy: FovXY) {
        let changed = {
            let mut state = self.state.lock();
            let changed = state.fov_xy != Some(fov_xy);
            state.fov = fov_xy.x();
            state.fov_xy = Some(fov_xy);
            state.aspect = fov_xy.aspect();
            changed
        };
        if changed {
            self.notify(Attribute::Fov);
        }
    }

    /// Every command received, oldest first
    pub fn sent_commands(&self) -> Vec<ViewerCommand> {
        self.state.lock().sent.clone()
    }

    pub fn last_command(&self) -> Option<ViewerCommand> {
        self.state.lock().sent.last().cloned()
    }

    pub fn clear_commands(&self) {
        self.state.lock().sent.clear();
    }

    /// Overlay layers currently drawn by the front end
    pub fn overlay_names(&self) -> Vec<String> {
        self.state.lock().overlays.clone()
    }

    pub fn display_count(&self) -> usize {
        self.state.lock().display_count
    }

    pub fn observer_count(&self) -> usize {
        self.observers.lock().len()
    }

    fn notify(&self, attribute: Attribute) {
        let callbacks = self.observers.lock().callbacks_for(attribute);
        let change = AttributeChange {
            viewer_id: self.id,
            attribute,
        };
        dispatch(&callbacks, &change);
    }
}

impl HipsWidget for HeadlessHipsWidget {
    fn id(&self) -> Uuid {
        self.id
    }

    fn target(&self) -> SkyCoord {
        self.state.lock().target
    }

    fn set_target(&self, target: SkyCoord) {
        let changed = {
            let mut state = self.state.lock();
            let changed = state.target != target;
            state.target = target;
            changed
        };
        if changed {
            self.notify(Attribute::Target);
        }
    }

    fn fov(&self) -> Angle {
        self.state.lock().fov
    }

    fn set_fov(&self, fov: Angle) {
        let changed = {
            let mut state = self.state.lock();
            let changed = state.fov != fov;
            state.fov = fov;
            let aspect = state.aspect;
            if let Some(fov_xy) = state.fov_xy.as_mut() {
                fov_xy.x = fov.degrees();
                fov_xy.y = fov.degrees() * aspect;
            }
            changed
        };
        if changed {
            self.notify(Attribute::Fov);
        }
    }

    fn fov_xy(&self) -> Option<FovXY> {
        self.state.lock().fov_xy
    }

    fn rotation(&self) -> Angle {
        self.state.lock().rotation
    }

    fn set_rotation(&self, rotation: Angle) {
        let changed = {
            let mut state = self.state.lock();
            let changed = state.rotation != rotation;
            state.rotation = rotation;
            changed
        };
        if changed {
            self.notify(Attribute::Rotation);
        }
    }

    fn is_rendered(&self) -> bool {
        self.state.lock().rendered
    }

    fn observe(&self, attributes: &[Attribute], callback: ChangeCallback) -> ObserverId {
        self.observers.lock().observe(attributes, callback)
    }

    fn unobserve(&self, id: ObserverId) -> bool {
        self.observers.lock().unobserve(id)
    }

    fn send(&self, command: ViewerCommand) {
        debug!("Headless widget {} received {}", self.id, command.event_name());
        let mut state = self.state.lock();
        match &command {
            ViewerCommand::RemoveOverlay { overlay_names } => {
                state.overlays.retain(|name| !overlay_names.contains(name));
            }
            other => {
                if let Some(name) = other.overlay_name() {
                    state.overlays.push(name.to_string());
                }
            }
        }
        state.sent.push(command);
    }

    fn display(&self) {
        self.state.lock().display_count += 1;
    }
}

struct ImageState {
    limits: PixelLimits,
    wcs: Option<TanWcs>,
    shown: bool,
    linked_by_wcs: bool,
    north_up_east_left: bool,
}

/// In-memory image viewer
pub struct HeadlessImageWidget {
    id: Uuid,
    state: Mutex<ImageState>,
    observers: Mutex<ObserverSet>,
}

impl HeadlessImageWidget {
    pub fn new(wcs: Option<TanWcs>, limits: PixelLimits) -> Self {
        Self {
            id: Uuid::new_v4(),
            state: Mutex::new(ImageState {
                limits,
                wcs,
                shown: false,
                linked_by_wcs: false,
                north_up_east_left: false,
            }),
            observers: Mutex::new(ObserverSet::new()),
        }
    }

    /// Replace the reference data's WCS
    pub fn load_wcs(&self, wcs: TanWcs) {
        self.state.lock().wcs = Some(wcs);
    }

    pub fn is_shown(&self) -> bool {
        self.state.lock().shown
    }

    pub fn is_linked_by_wcs(&self) -> bool {
        self.state.lock().linked_by_wcs
    }

    pub fn is_north_up_east_left(&self) -> bool {
        self.state.lock().north_up_east_left
    }

    pub fn observer_count(&self) -> usize {
        self.observers.lock().len()
    }
}

impl ImageWidget for HeadlessImageWidget {
    fn id(&self) -> Uuid {
        self.id
    }

    fn limits(&self) -> PixelLimits {
        self.state.lock().limits
    }

    fn set_limits(&self, limits: PixelLimits) {
        let changed = {
            let mut state = self.state.lock();
            let changed = state.limits != limits;
            state.limits = limits;
            changed
        };
        if changed {
            let callbacks = self.observers.lock().callbacks_for(Attribute::Limits);
            let change = AttributeChange {
                viewer_id: self.id,
                attribute: Attribute::Limits,
            };
            dispatch(&callbacks, &change);
        }
    }

    fn reference_wcs(&self) -> Option<TanWcs> {
        self.state.lock().wcs
    }

    fn observe(&self, attributes: &[Attribute], callback: ChangeCallback) -> ObserverId {
        self.observers.lock().observe(attributes, callback)
    }

    fn unobserve(&self, id: ObserverId) -> bool {
        self.observers.lock().unobserve(id)
    }

    fn show(&self) {
        self.state.lock().shown = true;
    }

    fn link_by_wcs(&self) {
        self.state.lock().linked_by_wcs = true;
    }

    fn set_north_up_east_left(&self) {
        self.state.lock().north_up_east_left = true;
    }
}
