//! Shared application state

use std::sync::Arc;

use vidgate_core::Config;
use vidgate_db::VideoRepository;
use vidgate_processing::CommandRunner;
use vidgate_storage::{AssetStore, ObjectPublisher};

/// Per-process state handed to every handler. All collaborators sit behind
/// traits so tests can swap in fakes without a database, an object store,
/// or real media tools.
pub struct AppState {
    pub config: Config,
    pub videos: Arc<dyn VideoRepository>,
    pub object_store: Arc<dyn ObjectPublisher>,
    pub assets: AssetStore,
    pub runner: Arc<dyn CommandRunner>,
}
