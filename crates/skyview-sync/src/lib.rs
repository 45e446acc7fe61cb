//! Viewport Synchronization
//!
//! Keeps a HiPS sky viewer and an image viewer looking at the same patch of
//! sky. Both viewer kinds are wrapped in a [`ViewerSyncAdapter`], which hides
//! the difference between an angular field of view and a pixel box.
//!
//! - [`SyncManager`] - one destination following one source in real time
//! - [`SyncGroup`] - one-shot sync of many viewers to one of them

pub mod adapter;
pub mod group;
pub mod hips;
pub mod image;
pub mod manager;

pub use adapter::{CallbackId, SharedSyncAdapter, SyncError, SyncResult, ViewerSyncAdapter};
pub use group::SyncGroup;
pub use hips::HipsSyncAdapter;
pub use image::ImageSyncAdapter;
pub use manager::SyncManager;
