//! Object storage access for raw dataset files.

use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use object_store::{
    aws::AmazonS3Builder, local::LocalFileSystem, memory::InMemory, path::Path, ObjectStore,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use flood_common::{FloodError, FloodResult};

/// Anything that can hand out the raw bytes of a dataset by path.
#[async_trait]
pub trait DatasetSource: Send + Sync {
    async fn fetch(&self, path: &str) -> FloodResult<Bytes>;
}

/// Storage backend selection.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "backend", rename_all = "lowercase")]
pub enum ObjectStorageConfig {
    /// Directory on the local filesystem.
    Local { root: PathBuf },
    /// S3-compatible bucket (AWS, MinIO).
    S3(S3Config),
    /// Process-local store, empty at start.
    Memory,
}

impl Default for ObjectStorageConfig {
    fn default() -> Self {
        ObjectStorageConfig::Local {
            root: PathBuf::from("data"),
        }
    }
}

/// Connection settings for an S3-compatible bucket.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct S3Config {
    /// S3/MinIO endpoint URL
    pub endpoint: String,
    pub bucket: String,
    pub access_key_id: String,
    pub secret_access_key: String,
    /// AWS region (use "us-east-1" for MinIO)
    pub region: String,
    /// Allow HTTP (for local MinIO)
    pub allow_http: bool,
}

impl Default for S3Config {
    fn default() -> Self {
        Self {
            endpoint: "http://minio:9000".to_string(),
            bucket: "flood-data".to_string(),
            access_key_id: "minioadmin".to_string(),
            secret_access_key: "minioadmin".to_string(),
            region: "us-east-1".to_string(),
            allow_http: true,
        }
    }
}

/// Object storage client for dataset files.
#[derive(Clone)]
pub struct ObjectStorage {
    store: Arc<dyn ObjectStore>,
    /// Bucket name or root directory, for logging.
    location: String,
}

impl ObjectStorage {
    /// Create a client for the configured backend.
    pub fn new(config: &ObjectStorageConfig) -> FloodResult<Self> {
        match config {
            ObjectStorageConfig::Local { root } => Self::local(root.clone()),
            ObjectStorageConfig::S3(s3) => Self::s3(s3),
            ObjectStorageConfig::Memory => Ok(Self::in_memory()),
        }
    }

    pub fn local(root: PathBuf) -> FloodResult<Self> {
        let store = LocalFileSystem::new_with_prefix(&root).map_err(|e| {
            FloodError::StorageError(format!(
                "Failed to open local store at {}: {}",
                root.display(),
                e
            ))
        })?;

        Ok(Self {
            store: Arc::new(store),
            location: root.display().to_string(),
        })
    }

    pub fn s3(config: &S3Config) -> FloodResult<Self> {
        let mut builder = AmazonS3Builder::new()
            .with_endpoint(&config.endpoint)
            .with_bucket_name(&config.bucket)
            .with_access_key_id(&config.access_key_id)
            .with_secret_access_key(&config.secret_access_key)
            .with_region(&config.region);

        if config.allow_http {
            builder = builder.with_allow_http(true);
        }

        let store = builder
            .build()
            .map_err(|e| FloodError::StorageError(format!("Failed to create S3 client: {}", e)))?;

        Ok(Self {
            store: Arc::new(store),
            location: config.bucket.clone(),
        })
    }

    pub fn in_memory() -> Self {
        Self {
            store: Arc::new(InMemory::new()),
            location: "memory".to_string(),
        }
    }

    /// Write bytes to a path.
    #[instrument(skip(self, data), fields(location = %self.location, path = %path))]
    pub async fn put(&self, path: &str, data: Bytes) -> FloodResult<()> {
        let object = Path::from(path);
        debug!(size = data.len(), "Writing object");

        self.store
            .put(&object, data.into())
            .await
            .map_err(|e| FloodError::StorageError(format!("Failed to write {}: {}", path, e)))?;

        Ok(())
    }

    /// Read bytes from a path.
    #[instrument(skip(self), fields(location = %self.location, path = %path))]
    pub async fn get(&self, path: &str) -> FloodResult<Bytes> {
        let object = Path::from(path);

        let result = self
            .store
            .get(&object)
            .await
            .map_err(|e| FloodError::StorageError(format!("Failed to read {}: {}", path, e)))?;

        let bytes = result
            .bytes()
            .await
            .map_err(|e| FloodError::StorageError(format!("Failed to read bytes: {}", e)))?;

        debug!(size = bytes.len(), "Read object");
        Ok(bytes)
    }
}

#[async_trait]
impl DatasetSource for ObjectStorage {
    async fn fetch(&self, path: &str) -> FloodResult<Bytes> {
        self.get(path).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_in_memory_round_trip() {
        let storage = ObjectStorage::in_memory();
        storage
            .put("summary.ndjson", Bytes::from_static(b"{}\n"))
            .await
            .unwrap();

        assert_eq!(storage.fetch("summary.ndjson").await.unwrap(), Bytes::from_static(b"{}\n"));
    }

    #[tokio::test]
    async fn test_missing_object_is_storage_error() {
        let storage = ObjectStorage::in_memory();
        let result = storage.fetch("nope.ndjson").await;
        assert!(matches!(result, Err(FloodError::StorageError(_))));
    }

    #[tokio::test]
    async fn test_local_backend_reads_files() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("threshold.ndjson"), b"row\n").unwrap();

        let config = ObjectStorageConfig::Local {
            root: dir.path().to_path_buf(),
        };
        let storage = ObjectStorage::new(&config).unwrap();

        assert_eq!(storage.fetch("threshold.ndjson").await.unwrap().as_ref(), b"row\n");
    }

    #[test]
    fn test_config_from_yaml_shape() {
        let config: ObjectStorageConfig =
            serde_json::from_str(r#"{"backend": "s3", "bucket": "glofas"}"#).unwrap();

        match config {
            ObjectStorageConfig::S3(s3) => {
                assert_eq!(s3.bucket, "glofas");
                assert_eq!(s3.region, "us-east-1");
            }
            other => panic!("unexpected backend: {:?}", other),
        }
    }
}
