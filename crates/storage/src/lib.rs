//! Storage layer for the flood forecast services.
//!
//! Provides:
//! - Object storage (local filesystem, MinIO/S3, in-memory) as a [`DatasetSource`]
//! - Row loading from newline-delimited JSON with WKT cell geometries
//! - The [`SnapshotStore`] holding the currently published datasets

pub mod loader;
pub mod object_store;
pub mod snapshot;
pub mod wkt;

pub use self::object_store::{DatasetSource, ObjectStorage, ObjectStorageConfig, S3Config};
pub use loader::parse_dataset;
pub use snapshot::{DatasetEntry, Snapshot, SnapshotStore};
pub use wkt::WktError;
