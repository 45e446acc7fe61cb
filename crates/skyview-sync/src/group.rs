//! One-shot synchronization across a set of named viewers

use tracing::debug;

use crate::adapter::{SharedSyncAdapter, SyncError, SyncResult};

/// Adapters keyed by viewer id, in registration order
#[derive(Default)]
pub struct SyncGroup {
    adapters: Vec<(String, SharedSyncAdapter)>,
}

impl SyncGroup {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `adapter` under `id`, replacing any adapter already there
    pub fn register_viewer(&mut self, id: impl Into<String>, adapter: SharedSyncAdapter) {
        let id = id.into();
        if let Some(entry) = self.adapters.iter_mut().find(|(name, _)| *name == id) {
            entry.1 = adapter;
        } else {
            self.adapters.push((id, adapter));
        }
    }

    pub fn unregister_viewer(&mut self, id: &str) -> Option<SharedSyncAdapter> {
        let pos = self.adapters.iter().position(|(name, _)| name == id)?;
        Some(self.adapters.remove(pos).1)
    }

    pub fn get_adapter(&self, id: &str) -> SyncResult<&SharedSyncAdapter> {
        self.adapters
            .iter()
            .find(|(name, _)| name == id)
            .map(|(_, adapter)| adapter)
            .ok_or_else(|| SyncError::UnknownViewer(id.to_string()))
    }

    pub fn viewer_ids(&self) -> Vec<&str> {
        self.adapters.iter().map(|(name, _)| name.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.adapters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.adapters.is_empty()
    }

    /// Bring every other viewer to the view of viewer `id`
    pub fn sync_to(&self, id: &str) -> SyncResult<()> {
        let reference = self.get_adapter(id)?;
        for (name, adapter) in self.adapters.iter().filter(|(name, _)| name != id) {
            debug!("Syncing viewer {} to viewer {}", name, id);
            adapter.sync_to(reference.as_ref())?;
        }
        Ok(())
    }
}
