//! Real-time sync session between two viewers

use std::sync::Arc;

use skyview_widget::AttributeChange;
use tracing::{debug, info, warn};

use crate::adapter::{CallbackId, SharedSyncAdapter, SyncError, SyncResult};

struct Session {
    source: SharedSyncAdapter,
    destination: SharedSyncAdapter,
    callback: CallbackId,
}

/// Keeps one destination viewer following one source viewer
///
/// At most one pair is active; starting a new pair stops the previous one.
/// The session is stopped when the manager is dropped.
#[derive(Default)]
pub struct SyncManager {
    session: Option<Session>,
}

impl SyncManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sync `destination` to `source` now and after every change of `source`
    pub fn start_real_time_sync(
        &mut self,
        source: SharedSyncAdapter,
        destination: SharedSyncAdapter,
    ) -> SyncResult<()> {
        if source.viewer_id() == destination.viewer_id() {
            return Err(SyncError::SelfSync(source.viewer_id()));
        }

        self.stop_real_time_sync();
        destination.sync_to(source.as_ref())?;

        // The callback lives in the source's observer set
        let weak_source = Arc::downgrade(&source);
        let target = Arc::clone(&destination);
        let callback = source.add_callback(Arc::new(move |change: &AttributeChange| {
            let Some(source) = weak_source.upgrade() else {
                return;
            };
            debug!(
                "Propagating {} change of viewer {} to viewer {}",
                change.attribute,
                change.viewer_id,
                target.viewer_id()
            );
            if let Err(e) = target.sync_to(source.as_ref()) {
                warn!(
                    "Failed to sync viewer {} to viewer {}: {}",
                    target.viewer_id(),
                    change.viewer_id,
                    e
                );
            }
        }));

        info!(
            "Started real-time sync of viewer {} to viewer {}",
            destination.viewer_id(),
            source.viewer_id()
        );
        self.session = Some(Session {
            source,
            destination,
            callback,
        });
        Ok(())
    }

    /// Unregister from the current source; does nothing when not syncing
    pub fn stop_real_time_sync(&mut self) {
        if let Some(session) = self.session.take() {
            session.source.remove_callback(session.callback);
            info!(
                "Stopped real-time sync of viewer {} to viewer {}",
                session.destination.viewer_id(),
                session.source.viewer_id()
            );
        }
    }

    pub fn source(&self) -> Option<&SharedSyncAdapter> {
        self.session.as_ref().map(|s| &s.source)
    }

    pub fn destination(&self) -> Option<&SharedSyncAdapter> {
        self.session.as_ref().map(|s| &s.destination)
    }

    pub fn is_active(&self) -> bool {
        self.session.is_some()
    }
}

impl Drop for SyncManager {
    fn drop(&mut self) {
        self.stop_real_time_sync();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapter::ViewerSyncAdapter;
    use crate::hips::HipsSyncAdapter;
    use approx::assert_relative_eq;
    use parking_lot::Mutex;
    use skyview_core::{
        Angle, CoordinateFrame, FovXY, PixelLimits, SkyCoord, TanWcs, ViewportError,
        ViewportState, ViewportUpdate,
    };
    use skyview_widget::{
        Attribute, ChangeCallback, HeadlessHipsWidget, HipsWidget, ObserverSet, SharedHipsWidget,
        observer,
    };
    use uuid::Uuid;

    /// Adapter that records the viewers it was synced to
    struct FakeAdapter {
        id: Uuid,
        observers: Mutex<ObserverSet>,
        synced_to: Mutex<Vec<Uuid>>,
        fail: bool,
    }

    impl FakeAdapter {
        fn with_failure(fail: bool) -> Arc<Self> {
            Arc::new(Self {
                id: Uuid::new_v4(),
                observers: Mutex::new(ObserverSet::new()),
                synced_to: Mutex::new(Vec::new()),
                fail,
            })
        }

        fn new() -> Arc<Self> {
            Self::with_failure(false)
        }

        fn failing() -> Arc<Self> {
            Self::with_failure(true)
        }

        /// Simulate a view change
        fn fire(&self) {
            let callbacks = self.observers.lock().callbacks_for(Attribute::Target);
            observer::dispatch(
                &callbacks,
                &AttributeChange {
                    viewer_id: self.id,
                    attribute: Attribute::Target,
                },
            );
        }

        fn sync_count(&self) -> usize {
            self.synced_to.lock().len()
        }

        fn callback_count(&self) -> usize {
            self.observers.lock().len()
        }
    }

    impl ViewerSyncAdapter for FakeAdapter {
        fn viewer_id(&self) -> Uuid {
            self.id
        }

        fn get_center(&self) -> SyncResult<SkyCoord> {
            Ok(SkyCoord::new(0.0, 0.0).unwrap())
        }

        fn get_fov(&self) -> SyncResult<FovXY> {
            Ok(FovXY { x: 1.0, y: 1.0 })
        }

        fn get_rotation(&self) -> SyncResult<Option<Angle>> {
            Ok(None)
        }

        fn get_limits(&self, _wcs: &TanWcs) -> SyncResult<PixelLimits> {
            Ok(PixelLimits::new(0.0, 1.0, 0.0, 1.0))
        }

        fn set_viewport(&self, _update: &ViewportUpdate) -> SyncResult<()> {
            Ok(())
        }

        fn get_viewport(&self, _frame: Option<CoordinateFrame>) -> SyncResult<ViewportState> {
            Ok(ViewportState::new(self.get_center()?, Angle::from_degrees(1.0), None)?)
        }

        fn add_callback(&self, callback: ChangeCallback) -> CallbackId {
            self.observers.lock().observe(&[Attribute::Target], callback)
        }

        fn remove_callback(&self, id: CallbackId) -> bool {
            self.observers.lock().unobserve(id)
        }

        fn show(&self) {}

        fn sync_to(&self, other: &dyn ViewerSyncAdapter) -> SyncResult<()> {
            if self.fail {
                return Err(ViewportError::Unsupported("fake failure".to_string()).into());
            }
            self.synced_to.lock().push(other.viewer_id());
            Ok(())
        }
    }

    #[test]
    fn test_start_syncs_once_then_on_every_change() {
        let source = FakeAdapter::new();
        let destination = FakeAdapter::new();
        let mut manager = SyncManager::new();

        manager
            .start_real_time_sync(source.clone(), destination.clone())
            .unwrap();
        assert!(manager.is_active());
        assert_eq!(destination.sync_count(), 1);

        source.fire();
        source.fire();
        assert_eq!(destination.sync_count(), 3);
        assert!(destination.synced_to.lock().iter().all(|id| *id == source.id));
    }

    #[test]
    fn test_stop_is_idempotent() {
        let source = FakeAdapter::new();
        let destination = FakeAdapter::new();
        let mut manager = SyncManager::new();

        manager.stop_real_time_sync();
        manager
            .start_real_time_sync(source.clone(), destination.clone())
            .unwrap();
        assert_eq!(source.callback_count(), 1);

        manager.stop_real_time_sync();
        manager.stop_real_time_sync();
        assert!(!manager.is_active());
        assert!(manager.source().is_none());
        assert!(manager.destination().is_none());
        assert_eq!(source.callback_count(), 0);

        source.fire();
        assert_eq!(destination.sync_count(), 1);
    }

    #[test]
    fn test_new_start_supersedes_old_pair() {
        let first = FakeAdapter::new();
        let second = FakeAdapter::new();
        let destination = FakeAdapter::new();
        let mut manager = SyncManager::new();

        manager
            .start_real_time_sync(first.clone(), destination.clone())
            .unwrap();
        manager
            .start_real_time_sync(second.clone(), destination.clone())
            .unwrap();

        assert_eq!(first.callback_count(), 0);
        assert_eq!(second.callback_count(), 1);
        assert_eq!(manager.source().unwrap().viewer_id(), second.id);

        first.fire();
        assert_eq!(destination.sync_count(), 2);
    }

    #[test]
    fn test_self_sync_is_rejected() {
        let viewer = FakeAdapter::new();
        let mut manager = SyncManager::new();

        let result = manager.start_real_time_sync(viewer.clone(), viewer.clone());
        assert_eq!(result, Err(SyncError::SelfSync(viewer.id)));
        assert!(!manager.is_active());
        assert_eq!(viewer.callback_count(), 0);
    }

    #[test]
    fn test_failed_initial_sync_leaves_no_session() {
        let source = FakeAdapter::new();
        let destination = FakeAdapter::failing();
        let mut manager = SyncManager::new();

        assert!(
            manager
                .start_real_time_sync(source.clone(), destination)
                .is_err()
        );
        assert!(!manager.is_active());
        assert_eq!(source.callback_count(), 0);
    }

    #[test]
    fn test_drop_unregisters() {
        let source = FakeAdapter::new();
        {
            let mut manager = SyncManager::new();
            manager
                .start_real_time_sync(source.clone(), FakeAdapter::new())
                .unwrap();
            assert_eq!(source.callback_count(), 1);
        }
        assert_eq!(source.callback_count(), 0);
    }

    #[test]
    fn test_hips_destination_follows_hips_source() {
        let source_widget = Arc::new(HeadlessHipsWidget::new(
            SkyCoord::new(10.0, 10.0).unwrap(),
            FovXY { x: 60.0, y: 40.0 },
        ));
        let dest_widget = Arc::new(HeadlessHipsWidget::new(
            SkyCoord::new(0.0, 0.0).unwrap(),
            FovXY { x: 20.0, y: 20.0 },
        ));
        let source_shared: SharedHipsWidget = source_widget.clone();
        let dest_shared: SharedHipsWidget = dest_widget.clone();
        let mut manager = SyncManager::new();

        manager
            .start_real_time_sync(
                Arc::new(HipsSyncAdapter::new(source_shared)),
                Arc::new(HipsSyncAdapter::new(dest_shared)),
            )
            .unwrap();
        assert_eq!(dest_widget.target(), SkyCoord::new(10.0, 10.0).unwrap());
        assert_relative_eq!(dest_widget.fov().degrees(), 40.0, epsilon = 1e-9);

        source_widget.set_target(SkyCoord::new(83.633, 22.0145).unwrap());
        assert_eq!(dest_widget.target(), SkyCoord::new(83.633, 22.0145).unwrap());

        source_widget.set_fov(Angle::from_degrees(90.0));
        assert_relative_eq!(dest_widget.fov().degrees(), 60.0, epsilon = 1e-9);

        manager.stop_real_time_sync();
        source_widget.set_target(SkyCoord::new(1.0, 1.0).unwrap());
        assert_eq!(dest_widget.target(), SkyCoord::new(83.633, 22.0145).unwrap());
    }
}
