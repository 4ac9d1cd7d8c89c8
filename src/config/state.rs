// Application state module
// Immutable per-process state shared with every connection

use super::types::Config;
use crate::capture::CaptureStore;

/// Application state
pub struct AppState {
    pub config: Config,
    pub store: CaptureStore,
}

impl AppState {
    pub fn new(config: &Config) -> Self {
        Self {
            config: config.clone(),
            store: CaptureStore::from_config(&config.storage),
        }
    }

    /// Whether access logging is enabled
    pub const fn access_log(&self) -> bool {
        self.config.logging.access_log
    }
}
