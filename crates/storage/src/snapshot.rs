//! Versioned, immutable snapshot of the published datasets.
//!
//! Readers load the current snapshot without locking and keep the
//! `Arc<Dataset>` they captured for as long as they need it; a publish
//! never disturbs an in-flight reader. Each publish replaces exactly one
//! dataset and bumps the snapshot version.

use std::collections::HashMap;
use std::sync::Arc;

use arc_swap::ArcSwap;
use chrono::{DateTime, Utc};
use flood_common::DatasetKind;
use flood_query::Dataset;
use tracing::info;

/// A published dataset and when it was fetched.
#[derive(Debug, Clone)]
pub struct DatasetEntry {
    pub dataset: Arc<Dataset>,
    pub fetched_at: DateTime<Utc>,
}

/// One immutable view of all published datasets.
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    pub version: u64,
    datasets: HashMap<DatasetKind, DatasetEntry>,
}

impl Snapshot {
    pub fn entry(&self, kind: DatasetKind) -> Option<&DatasetEntry> {
        self.datasets.get(&kind)
    }

    pub fn dataset(&self, kind: DatasetKind) -> Option<&Arc<Dataset>> {
        self.datasets.get(&kind).map(|entry| &entry.dataset)
    }

    /// True once every dataset kind has been published at least once.
    pub fn is_complete(&self) -> bool {
        DatasetKind::ALL.iter().all(|kind| self.datasets.contains_key(kind))
    }
}

/// Holder of the current [`Snapshot`].
#[derive(Debug)]
pub struct SnapshotStore {
    current: ArcSwap<Snapshot>,
}

impl Default for SnapshotStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SnapshotStore {
    /// Empty store at version 0.
    pub fn new() -> Self {
        Self {
            current: ArcSwap::from_pointee(Snapshot::default()),
        }
    }

    pub fn current(&self) -> Arc<Snapshot> {
        self.current.load_full()
    }

    /// Latest published dataset of `kind`, if any.
    pub fn get(&self, kind: DatasetKind) -> Option<Arc<Dataset>> {
        self.current.load().dataset(kind).cloned()
    }

    pub fn fetched_at(&self, kind: DatasetKind) -> Option<DateTime<Utc>> {
        self.current.load().entry(kind).map(|entry| entry.fetched_at)
    }

    pub fn version(&self) -> u64 {
        self.current.load().version
    }

    pub fn is_ready(&self) -> bool {
        self.current.load().is_complete()
    }

    /// Replace the dataset of its kind, leaving the others untouched.
    ///
    /// Returns the version of the new snapshot.
    pub fn publish(&self, dataset: Dataset, fetched_at: DateTime<Utc>) -> u64 {
        let kind = dataset.kind();
        let rows = dataset.len();
        let entry = DatasetEntry {
            dataset: Arc::new(dataset),
            fetched_at,
        };

        let previous = self.current.rcu(|current| {
            let mut next = Snapshot::clone(current);
            next.version = current.version + 1;
            next.datasets.insert(kind, entry.clone());
            next
        });
        let version = previous.version + 1;

        info!(dataset = %kind, rows, version, "Published dataset");
        version
    }
}
