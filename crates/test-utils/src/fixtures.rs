//! Common test fixtures for flood forecast tests.
//!
//! This module provides pre-defined datasets that represent the scenarios
//! the query services must handle.

use crate::generators::{detailed_grid_ndjson, summary_grid_ndjson, threshold_grid_ndjson};

/// Region of interest bounds as (min_lat, max_lat, min_lon, max_lon).
pub mod region {
    /// East Africa GloFAS coverage.
    pub const GLOFAS: (f64, f64, f64, f64) = (-12.0, 24.0, 21.0, 52.0);
}

/// The single-cell forecast series.
pub mod series {
    /// South-west corner of the only populated cell.
    pub const CELL_MIN_LAT: f64 = 6.2;
    pub const CELL_MIN_LON: f64 = 39.05;

    /// A point in the unpopulated cell directly east.
    pub const EMPTY_NEIGHBOR: (f64, f64) = (6.2, 39.1);

    pub const ISSUED_ON: &str = "2023-11-07";
    pub const STEPS: u32 = 30;

    /// Inclusive window covering steps 22 to 24.
    pub const WINDOW_START: &str = "2023-11-29";
    pub const WINDOW_END: &str = "2023-12-01";
    pub const WINDOW_ROWS: usize = 3;
}

/// Summary, detailed and threshold grids share this block.
pub mod block {
    pub const MIN_LAT: f64 = 6.0;
    pub const MIN_LON: f64 = 39.0;
    pub const ROWS: usize = 10;
    pub const COLS: usize = 10;
}

/// 30-step detailed series for the single cell at (6.2, 39.05).
pub fn detailed_fixture() -> String {
    detailed_grid_ndjson(
        series::CELL_MIN_LAT,
        series::CELL_MIN_LON,
        1,
        1,
        series::STEPS,
        series::ISSUED_ON,
    )
}

/// Fully populated 10x10 summary grid.
pub fn summary_fixture() -> String {
    summary_grid_ndjson(block::MIN_LAT, block::MIN_LON, block::ROWS, block::COLS, series::ISSUED_ON)
}

/// Fully populated 10x10 threshold grid.
pub fn threshold_fixture() -> String {
    threshold_grid_ndjson(block::MIN_LAT, block::MIN_LON, block::ROWS, block::COLS)
}

/// Minimal service configuration pointing at the fixture files in a local store.
pub fn service_config_yaml(storage_root: &str) -> String {
    format!(
        r#"region:
  min_lat: -12.0
  max_lat: 24.0
  min_lon: 21.0
  max_lon: 52.0
storage:
  backend: local
  root: {storage_root}
datasets:
  summary:
    path: summary.ndjson
  detailed:
    path: detailed.ndjson
  threshold:
    path: threshold.ndjson
refresh:
  hour_utc: 12
  minute: 0
"#
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detailed_fixture_rows() {
        assert_eq!(detailed_fixture().lines().count(), series::STEPS as usize);
    }

    #[test]
    fn test_grid_fixtures_fully_populated() {
        assert_eq!(summary_fixture().lines().count(), block::ROWS * block::COLS);
        assert_eq!(threshold_fixture().lines().count(), block::ROWS * block::COLS);
    }
}
