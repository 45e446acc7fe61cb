//! Sky Viewer Frontend
//!
//! Session-level pieces around the viewers: configuration, the context that
//! tracks the current viewers, the workspace that shows them together, and
//! the sync mode controls.

pub mod config;
pub mod context;
pub mod logging;
pub mod sync_ui;
pub mod workspace;

pub use config::{AppConfig, ConfigError, ConfigManager, SyncConfig, WorkspaceConfig};
pub use context::{AppContext, SharedAppContext, create_shared_context};
pub use sync_ui::{SyncMode, SyncUi};
pub use workspace::{Workspace, WorkspaceError, WorkspaceOptions, WorkspaceViewer};
