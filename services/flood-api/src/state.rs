//! Application state for the flood API.

use std::sync::Arc;

use metrics_exporter_prometheus::PrometheusHandle;
use storage::SnapshotStore;

use crate::config::FloodConfig;

/// Shared application state.
pub struct AppState {
    /// Currently published datasets.
    pub store: Arc<SnapshotStore>,

    pub config: Arc<FloodConfig>,

    /// Renders `/metrics`; absent when no recorder is installed.
    pub prometheus: Option<PrometheusHandle>,
}

impl AppState {
    pub fn new(config: Arc<FloodConfig>, store: Arc<SnapshotStore>) -> Self {
        Self {
            store,
            config,
            prometheus: None,
        }
    }

    pub fn with_prometheus(mut self, handle: PrometheusHandle) -> Self {
        self.prometheus = Some(handle);
        self
    }
}
