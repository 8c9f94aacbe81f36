//! Service configuration loading and types.
//!
//! Configuration comes from a YAML file; every key has a default so a
//! missing file yields the built-in GloFAS setup. A few environment
//! variables override the file:
//!
//! | Variable               | Overrides                          |
//! |------------------------|------------------------------------|
//! | `FLOOD_REGION`         | region, `min_lat,max_lat,min_lon,max_lon` |
//! | `FLOOD_SUMMARY_PATH`   | `datasets.summary.path`            |
//! | `FLOOD_DETAILED_PATH`  | `datasets.detailed.path`           |
//! | `FLOOD_THRESHOLD_PATH` | `datasets.threshold.path`          |
//! | `FLOOD_STORAGE_ROOT`   | local storage root directory       |

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::NaiveTime;
use flood_common::{BoundingBox, DatasetKind, GridSpec};
use serde::{Deserialize, Serialize};
use storage::ObjectStorageConfig;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct FloodConfig {
    /// Queries outside this region are rejected.
    pub region: BoundingBox,
    /// Grid shared by all datasets unless a dataset overrides it.
    pub grid: GridSpec,
    pub storage: ObjectStorageConfig,
    pub datasets: DatasetsConfig,
    pub refresh: RefreshConfig,
}

impl Default for FloodConfig {
    fn default() -> Self {
        Self {
            region: BoundingBox::new(-12.0, 24.0, 21.0, 52.0),
            grid: GridSpec::default(),
            storage: ObjectStorageConfig::default(),
            datasets: DatasetsConfig::default(),
            refresh: RefreshConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DatasetsConfig {
    pub summary: DatasetConfig,
    pub detailed: DatasetConfig,
    pub threshold: DatasetConfig,
}

impl Default for DatasetsConfig {
    fn default() -> Self {
        Self {
            summary: DatasetConfig::new("summary.ndjson"),
            detailed: DatasetConfig::new("detailed.ndjson"),
            threshold: DatasetConfig::new("threshold.ndjson"),
        }
    }
}

impl DatasetsConfig {
    pub fn get(&self, kind: DatasetKind) -> &DatasetConfig {
        match kind {
            DatasetKind::Summary => &self.summary,
            DatasetKind::Detailed => &self.detailed,
            DatasetKind::Threshold => &self.threshold,
        }
    }

    fn get_mut(&mut self, kind: DatasetKind) -> &mut DatasetConfig {
        match kind {
            DatasetKind::Summary => &mut self.summary,
            DatasetKind::Detailed => &mut self.detailed,
            DatasetKind::Threshold => &mut self.threshold,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DatasetConfig {
    /// Object path within the configured storage.
    pub path: String,
    /// Overrides the shared grid for this dataset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grid: Option<GridSpec>,
}

impl DatasetConfig {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            grid: None,
        }
    }
}

/// Daily refresh trigger, in UTC.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RefreshConfig {
    pub hour_utc: u32,
    pub minute: u32,
}

impl Default for RefreshConfig {
    fn default() -> Self {
        Self {
            hour_utc: 12,
            minute: 0,
        }
    }
}

impl RefreshConfig {
    pub fn trigger_time(&self) -> Result<NaiveTime> {
        NaiveTime::from_hms_opt(self.hour_utc, self.minute, 0).with_context(|| {
            format!(
                "Invalid refresh time {:02}:{:02}",
                self.hour_utc, self.minute
            )
        })
    }
}

impl FloodConfig {
    /// Load from `path`, then apply environment overrides.
    pub fn load(path: &Path) -> Result<Self> {
        Self::load_with_env(path, |key| std::env::var(key).ok())
    }

    /// Load with an explicit environment lookup.
    pub fn load_with_env(path: &Path, env: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = if path.exists() {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read: {:?}", path))?;
            serde_yaml::from_str(&content)
                .with_context(|| format!("Failed to parse config: {:?}", path))?
        } else {
            tracing::warn!("Config file {:?} does not exist, using defaults", path);
            Self::default()
        };

        config.apply_env(env)?;
        config.validate()?;
        Ok(config)
    }

    fn apply_env(&mut self, env: impl Fn(&str) -> Option<String>) -> Result<()> {
        if let Some(region) = env("FLOOD_REGION") {
            self.region = BoundingBox::from_csv_string(&region)
                .with_context(|| format!("Invalid FLOOD_REGION '{}'", region))?;
        }

        for (kind, key) in [
            (DatasetKind::Summary, "FLOOD_SUMMARY_PATH"),
            (DatasetKind::Detailed, "FLOOD_DETAILED_PATH"),
            (DatasetKind::Threshold, "FLOOD_THRESHOLD_PATH"),
        ] {
            if let Some(path) = env(key) {
                self.datasets.get_mut(kind).path = path;
            }
        }

        if let Some(root) = env("FLOOD_STORAGE_ROOT") {
            self.storage = ObjectStorageConfig::Local {
                root: PathBuf::from(root),
            };
        }

        Ok(())
    }

    fn validate(&self) -> Result<()> {
        self.region.validate().context("Invalid region")?;

        for kind in DatasetKind::ALL {
            self.grid_for(kind)
                .validate()
                .with_context(|| format!("Invalid {} grid", kind))?;
        }

        self.refresh.trigger_time()?;
        Ok(())
    }

    /// Grid of `kind`, falling back to the shared grid.
    pub fn grid_for(&self, kind: DatasetKind) -> GridSpec {
        self.datasets.get(kind).grid.unwrap_or(self.grid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let config = FloodConfig::load_with_env(Path::new("/nonexistent/flood.yaml"), no_env).unwrap();

        assert_eq!(config, FloodConfig::default());
        assert_eq!(config.region, BoundingBox::new(-12.0, 24.0, 21.0, 52.0));
        assert_eq!(config.refresh.trigger_time().unwrap(), NaiveTime::from_hms_opt(12, 0, 0).unwrap());
    }

    #[test]
    fn test_partial_yaml() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "datasets:\n  detailed:\n    path: glofas/detailed.ndjson\n    grid:\n      resolution: 0.1\n      precision: 2\nrefresh:\n  hour_utc: 6"
        )
        .unwrap();

        let config = FloodConfig::load_with_env(file.path(), no_env).unwrap();

        assert_eq!(config.datasets.detailed.path, "glofas/detailed.ndjson");
        assert_eq!(config.datasets.summary.path, "summary.ndjson");
        assert_eq!(config.grid_for(DatasetKind::Detailed), GridSpec::new(0.1, 2));
        assert_eq!(config.grid_for(DatasetKind::Summary), GridSpec::default());
        assert_eq!(config.refresh.hour_utc, 6);
        assert_eq!(config.refresh.minute, 0);
    }

    #[test]
    fn test_env_overrides() {
        let env: HashMap<&str, &str> = HashMap::from([
            ("FLOOD_REGION", "0,10,20,30"),
            ("FLOOD_SUMMARY_PATH", "s3/summary.ndjson"),
            ("FLOOD_STORAGE_ROOT", "/srv/flood"),
        ]);
        let lookup = |key: &str| env.get(key).map(|v| v.to_string());

        let config = FloodConfig::load_with_env(Path::new("/nonexistent.yaml"), lookup).unwrap();

        assert_eq!(config.region, BoundingBox::new(0.0, 10.0, 20.0, 30.0));
        assert_eq!(config.datasets.summary.path, "s3/summary.ndjson");
        assert_eq!(
            config.storage,
            ObjectStorageConfig::Local {
                root: PathBuf::from("/srv/flood")
            }
        );
    }

    #[test]
    fn test_invalid_values_rejected() {
        let lookup = |key: &str| (key == "FLOOD_REGION").then(|| "10,0,20,30".to_string());
        tokio_test::assert_err!(FloodConfig::load_with_env(Path::new("/nonexistent.yaml"), lookup));

        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "refresh:\n  hour_utc: 25").unwrap();
        tokio_test::assert_err!(FloodConfig::load_with_env(file.path(), no_env));

        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "grid:\n  resolution: 0.0\n  precision: 3").unwrap();
        tokio_test::assert_err!(FloodConfig::load_with_env(file.path(), no_env));
    }

    #[test]
    fn test_coarse_dataset_precision_rejected() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "datasets:\n  summary:\n    path: summary.ndjson\n    grid:\n      resolution: 0.1\n      precision: 1"
        )
        .unwrap();
        tokio_test::assert_err!(FloodConfig::load_with_env(file.path(), no_env));

        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "datasets:\n  summary:\n    path: summary.ndjson\n    grid:\n      resolution: 0.1\n      precision: 2"
        )
        .unwrap();
        tokio_test::assert_ok!(FloodConfig::load_with_env(file.path(), no_env));
    }
}
