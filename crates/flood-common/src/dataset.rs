//! Dataset identifiers and their attribute schemas.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Column holding the boundary geometry text in raw rows.
pub const GEOMETRY_COLUMN: &str = "wkt";

/// Column holding the forecast step ordinal.
pub const STEP_COLUMN: &str = "step";

const SUMMARY_PROPERTIES: &[&str] = &[
    "peak_step",
    "peak_day",
    "peak_timing",
    "max_median_dis",
    "min_median_dis",
    "control_dis",
    "max_max_dis",
    "min_min_dis",
    "tendency",
    "max_p_above_20y",
    "max_p_above_5y",
    "max_p_above_2y",
    "intensity",
];

const DETAILED_PROPERTIES: &[&str] = &[
    "issued_on",
    "valid_for",
    "step",
    "p_above_2y",
    "p_above_5y",
    "p_above_20y",
    "min_dis",
    "Q1_dis",
    "median_dis",
    "Q3_dis",
    "max_dis",
];

const THRESHOLD_PROPERTIES: &[&str] = &["threshold_2y", "threshold_5y", "threshold_20y"];

/// Peak timing codes: black border, grayed color, gray border.
pub const PEAK_TIMING_CODES: &[&str] = &["BB", "GC", "GB"];

/// Tendency codes: upward triangle, downward triangle, circle.
pub const TENDENCY_CODES: &[&str] = &["U", "D", "C"];

/// Intensity codes: purple, red, yellow, grey.
pub const INTENSITY_CODES: &[&str] = &["P", "R", "Y", "G"];

/// The three independently refreshed forecast datasets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DatasetKind {
    /// 30-day summary forecast, one row per cell.
    Summary,
    /// Daily forecast series, one row per cell and step.
    Detailed,
    /// Return period thresholds, one row per cell.
    Threshold,
}

impl DatasetKind {
    pub const ALL: [DatasetKind; 3] = [
        DatasetKind::Summary,
        DatasetKind::Detailed,
        DatasetKind::Threshold,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            DatasetKind::Summary => "summary",
            DatasetKind::Detailed => "detailed",
            DatasetKind::Threshold => "threshold",
        }
    }

    /// Columns emitted as feature properties.
    pub fn properties(&self) -> &'static [&'static str] {
        match self {
            DatasetKind::Summary => SUMMARY_PROPERTIES,
            DatasetKind::Detailed => DETAILED_PROPERTIES,
            DatasetKind::Threshold => THRESHOLD_PROPERTIES,
        }
    }

    /// Columns whose raw timestamp-like values are normalized to calendar dates.
    pub fn date_columns(&self) -> &'static [&'static str] {
        match self {
            DatasetKind::Summary => &["issued_on", "peak_day"],
            DatasetKind::Detailed => &["issued_on", "valid_for"],
            DatasetKind::Threshold => &[],
        }
    }

    /// Column used for date-range filtering, if the dataset is a time series.
    pub fn valid_date_column(&self) -> Option<&'static str> {
        match self {
            DatasetKind::Detailed => Some("valid_for"),
            _ => None,
        }
    }

    /// Enumerated columns and their allowed codes.
    pub fn enum_columns(&self) -> &'static [(&'static str, &'static [&'static str])] {
        match self {
            DatasetKind::Summary => &[
                ("peak_timing", PEAK_TIMING_CODES),
                ("tendency", TENDENCY_CODES),
                ("intensity", INTENSITY_CODES),
            ],
            _ => &[],
        }
    }

    /// Sort order applied to the queried cell set before encoding.
    pub fn primary_sort(&self) -> Option<&'static [&'static str]> {
        match self {
            DatasetKind::Detailed => Some(&["latitude", "longitude", "step"]),
            _ => None,
        }
    }

    /// Sort order applied to the neighboring cell set before encoding.
    pub fn neighbor_sort(&self) -> Option<&'static [&'static str]> {
        match self {
            DatasetKind::Summary => Some(&["latitude", "longitude"]),
            DatasetKind::Detailed => Some(&["latitude", "longitude", "step"]),
            DatasetKind::Threshold => None,
        }
    }

    pub fn accepts_date_range(&self) -> bool {
        self.valid_date_column().is_some()
    }

    pub fn supports_neighbors(&self) -> bool {
        !matches!(self, DatasetKind::Threshold)
    }
}

impl fmt::Display for DatasetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for DatasetKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "summary" => Ok(DatasetKind::Summary),
            "detailed" => Ok(DatasetKind::Detailed),
            "threshold" => Ok(DatasetKind::Threshold),
            other => Err(format!("unknown dataset: {}", other)),
        }
    }
}
