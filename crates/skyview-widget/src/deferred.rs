//! One-shot calls delayed until a widget has rendered

use std::fmt;
use std::mem;
use std::sync::{Arc, Weak};

use parking_lot::Mutex;
use tracing::debug;

use crate::observer::{Attribute, ObserverId};
use crate::widget::{HipsWidget, SharedHipsWidget};

type Action = Box<dyn FnOnce() + Send>;

enum DeferredState {
    Pending {
        observer: Option<ObserverId>,
        action: Action,
    },
    Fired,
}

/// A call that runs at most once, as soon as its widget has rendered
///
/// While pending, exactly one listener on the widget's projection attribute
/// is registered. The first notification that finds the widget rendered
/// unregisters it and runs the action; later notifications are ignored.
pub struct DeferredCall {
    state: Mutex<DeferredState>,
    widget: Weak<dyn HipsWidget>,
}

impl DeferredCall {
    /// Run `action` now if `widget` has rendered, otherwise on first render
    pub fn when_rendered<F>(widget: &SharedHipsWidget, action: F) -> Arc<Self>
    where
        F: FnOnce() + Send + 'static,
    {
        let call = Arc::new(Self {
            state: Mutex::new(DeferredState::Pending {
                observer: None,
                action: Box::new(action),
            }),
            widget: Arc::downgrade(widget),
        });

        if widget.is_rendered() {
            call.fire();
            return call;
        }

        // The listener keeps the call alive until it fires
        let pending = Arc::clone(&call);
        let id = widget.observe(
            &[Attribute::Wcs],
            Arc::new(move |_change| pending.on_change()),
        );

        let attached = match &mut *call.state.lock() {
            DeferredState::Pending { observer, .. } => {
                *observer = Some(id);
                true
            }
            DeferredState::Fired => false,
        };
        if !attached {
            // Fired during registration
            widget.unobserve(id);
        }

        debug!("Deferred call waiting for widget {} to render", widget.id());
        call
    }

    fn on_change(&self) {
        let rendered = self
            .widget
            .upgrade()
            .is_some_and(|widget| widget.is_rendered());
        if rendered {
            self.fire();
        }
    }

    fn fire(&self) {
        let previous = mem::replace(&mut *self.state.lock(), DeferredState::Fired);
        if let DeferredState::Pending { observer, action } = previous {
            if let (Some(id), Some(widget)) = (observer, self.widget.upgrade()) {
                widget.unobserve(id);
            }
            action();
        }
    }

    pub fn is_fired(&self) -> bool {
        matches!(*self.state.lock(), DeferredState::Fired)
    }

    pub fn is_pending(&self) -> bool {
        !self.is_fired()
    }
}

impl fmt::Debug for DeferredCall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DeferredCall")
            .field("fired", &self.is_fired())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::headless::HeadlessHipsWidget;
    use skyview_core::{Angle, FovXY, SkyCoord};
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn counter() -> (Arc<AtomicUsize>, impl FnOnce() + Send + 'static) {
        let count = Arc::new(AtomicUsize::new(0));
        let inner = Arc::clone(&count);
        (count, move || {
            inner.fetch_add(1, Ordering::SeqCst);
        })
    }

    #[test]
    fn test_runs_immediately_when_rendered() {
        let widget = Arc::new(HeadlessHipsWidget::new(
            SkyCoord::new(0.0, 0.0).unwrap(),
            FovXY { x: 10.0, y: 10.0 },
        ));
        let shared: SharedHipsWidget = widget.clone();
        let (count, action) = counter();

        let call = DeferredCall::when_rendered(&shared, action);

        assert!(call.is_fired());
        assert_eq!(count.load(Ordering::SeqCst), 1);
        assert_eq!(widget.observer_count(), 0);
    }

    #[test]
    fn test_fires_once_on_first_render() {
        let widget = Arc::new(HeadlessHipsWidget::unrendered(
            SkyCoord::new(0.0, 0.0).unwrap(),
            Angle::from_degrees(10.0),
        ));
        let shared: SharedHipsWidget = widget.clone();
        let (count, action) = counter();

        let call = DeferredCall::when_rendered(&shared, action);
        assert!(call.is_pending());
        assert_eq!(widget.observer_count(), 1);
        assert_eq!(count.load(Ordering::SeqCst), 0);

        widget.mark_rendered(FovXY { x: 10.0, y: 5.0 });
        assert!(call.is_fired());
        assert_eq!(count.load(Ordering::SeqCst), 1);
        assert_eq!(widget.observer_count(), 0);

        // later churn is ignored
        widget.mark_rendered(FovXY { x: 20.0, y: 10.0 });
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_other_attributes_do_not_fire() {
        let widget = Arc::new(HeadlessHipsWidget::unrendered(
            SkyCoord::new(0.0, 0.0).unwrap(),
            Angle::from_degrees(10.0),
        ));
        let shared: SharedHipsWidget = widget.clone();
        let (count, action) = counter();

        let call = DeferredCall::when_rendered(&shared, action);
        widget.set_target(SkyCoord::new(5.0, 5.0).unwrap());
        widget.set_fov(Angle::from_degrees(3.0));

        assert!(call.is_pending());
        assert_eq!(count.load(Ordering::SeqCst), 0);
    }
}
