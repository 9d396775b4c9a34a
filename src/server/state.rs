//! Application state shared across HTTP handlers

use crate::config::Config;
use crate::core::batch::BatchOrchestrator;
use std::sync::Arc;

/// HTTP server state shared across handlers
///
/// Only immutable configuration and the orchestrator live here; client
/// handles for the generation service and the store are constructed per
/// unit of work, never shared across workers.
#[derive(Clone)]
pub struct AppState {
    /// Service configuration (shared read-only)
    pub config: Arc<Config>,
    /// Batch orchestrator
    pub orchestrator: Arc<BatchOrchestrator>,
}

impl AppState {
    /// Create a new AppState with shared resources
    pub fn new(config: Config) -> Self {
        let config = Arc::new(config);
        let orchestrator = Arc::new(BatchOrchestrator::new(config.clone()));
        Self {
            config,
            orchestrator,
        }
    }

    /// Get service configuration
    pub fn config(&self) -> &Config {
        &self.config
    }
}
