// Application state module
// Shared by every connection task; immutable once the server has started

use crate::config::LoggingConfig;
use crate::routing::Router;

/// Application state
#[derive(Debug)]
pub struct AppState {
    pub router: Router,
    pub logging: LoggingConfig,
}

impl AppState {
    pub const fn new(router: Router, logging: LoggingConfig) -> Self {
        Self { router, logging }
    }
}
