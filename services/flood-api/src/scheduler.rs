//! Dataset refresh: once at startup, then daily at a fixed UTC time.
//!
//! Each cycle fetches the three datasets as independent tasks. A dataset
//! that fails to fetch or parse keeps its previously published version;
//! the others are published as soon as they are ready.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Instant;

use anyhow::Result;
use chrono::{DateTime, Duration as ChronoDuration, NaiveTime, Utc};
use flood_common::{DatasetKind, FloodError, FloodResult, GridSpec};
use metrics::{counter, gauge, histogram};
use storage::{parse_dataset, DatasetSource, SnapshotStore};
use tokio::sync::broadcast;
use tracing::{error, info, instrument, warn};

use crate::config::FloodConfig;

/// Result of refreshing one dataset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RefreshOutcome {
    Published { rows: usize, version: u64 },
    Failed(String),
}

/// Per-dataset results of one refresh cycle.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RefreshReport {
    pub outcomes: BTreeMap<DatasetKind, RefreshOutcome>,
}

impl RefreshReport {
    pub fn outcome(&self, kind: DatasetKind) -> Option<&RefreshOutcome> {
        self.outcomes.get(&kind)
    }

    pub fn failures(&self) -> usize {
        self.outcomes
            .values()
            .filter(|o| matches!(o, RefreshOutcome::Failed(_)))
            .count()
    }

    pub fn all_published(&self) -> bool {
        self.failures() == 0 && self.outcomes.len() == DatasetKind::ALL.len()
    }
}

/// Background producer of dataset snapshots.
pub struct RefreshScheduler {
    source: Arc<dyn DatasetSource>,
    store: Arc<SnapshotStore>,
    config: Arc<FloodConfig>,
}

impl RefreshScheduler {
    pub fn new(
        source: Arc<dyn DatasetSource>,
        store: Arc<SnapshotStore>,
        config: Arc<FloodConfig>,
    ) -> Self {
        Self {
            source,
            store,
            config,
        }
    }

    /// Fetch, parse and publish every dataset.
    pub async fn refresh_all(&self) -> RefreshReport {
        let started = Instant::now();

        let tasks = DatasetKind::ALL.map(|kind| {
            let source = Arc::clone(&self.source);
            let store = Arc::clone(&self.store);
            let path = self.config.datasets.get(kind).path.clone();
            let grid = self.config.grid_for(kind);
            tokio::spawn(refresh_dataset(source, store, kind, path, grid))
        });
        let results = futures::future::join_all(tasks).await;

        let mut report = RefreshReport::default();
        for (kind, result) in DatasetKind::ALL.into_iter().zip(results) {
            let outcome = match result {
                Ok(Ok((rows, version))) => {
                    gauge!("flood_dataset_rows", "dataset" => kind.name()).set(rows as f64);
                    RefreshOutcome::Published { rows, version }
                }
                Ok(Err(e)) => {
                    error!(dataset = %kind, error = %e, "Dataset refresh failed, keeping previous version");
                    RefreshOutcome::Failed(e.to_string())
                }
                Err(e) => {
                    error!(dataset = %kind, error = %e, "Dataset refresh task aborted, keeping previous version");
                    RefreshOutcome::Failed(format!("refresh task aborted: {}", e))
                }
            };

            let status = match outcome {
                RefreshOutcome::Published { .. } => "success",
                RefreshOutcome::Failed(_) => "failure",
            };
            counter!("flood_refresh_total", "dataset" => kind.name(), "status" => status).increment(1);
            report.outcomes.insert(kind, outcome);
        }

        let elapsed = started.elapsed();
        histogram!("flood_refresh_duration_seconds").record(elapsed.as_secs_f64());
        info!(
            failures = report.failures(),
            version = self.store.version(),
            elapsed_ms = elapsed.as_millis() as u64,
            "Refresh cycle complete"
        );

        report
    }

    /// Refresh daily at the configured time until `shutdown` fires.
    pub async fn run_forever(&self, mut shutdown: broadcast::Receiver<()>) -> Result<()> {
        let at = self.config.refresh.trigger_time()?;

        loop {
            let now = Utc::now();
            let next = next_trigger(now, at);
            let wait = (next - now).to_std().unwrap_or_default();
            info!(next = %next, "Next dataset refresh scheduled");

            tokio::select! {
                _ = shutdown.recv() => {
                    info!("Shutting down refresh scheduler");
                    break;
                }
                _ = tokio::time::sleep(wait) => {
                    let report = self.refresh_all().await;
                    if report.failures() > 0 {
                        warn!(failures = report.failures(), "Scheduled refresh incomplete");
                    }
                }
            }
        }

        Ok(())
    }
}

#[instrument(skip(source, store, kind, grid), fields(dataset = %kind))]
async fn refresh_dataset(
    source: Arc<dyn DatasetSource>,
    store: Arc<SnapshotStore>,
    kind: DatasetKind,
    path: String,
    grid: GridSpec,
) -> FloodResult<(usize, u64)> {
    let raw = source
        .fetch(&path)
        .await
        .map_err(|e| FloodError::FetchFailure {
            dataset: kind.to_string(),
            message: e.to_string(),
        })?;

    let dataset = tokio::task::spawn_blocking(move || parse_dataset(kind, grid, &raw))
        .await
        .map_err(|e| FloodError::InternalError(format!("parse task failed: {}", e)))?
        .map_err(|e| FloodError::FetchFailure {
            dataset: kind.to_string(),
            message: e.to_string(),
        })?;

    let rows = dataset.len();
    let version = store.publish(dataset, Utc::now());
    Ok((rows, version))
}

/// First occurrence of `at` strictly after `now`.
pub fn next_trigger(now: DateTime<Utc>, at: NaiveTime) -> DateTime<Utc> {
    let today = now.date_naive().and_time(at).and_utc();
    if today > now {
        today
    } else {
        today + ChronoDuration::days(1)
    }
}
