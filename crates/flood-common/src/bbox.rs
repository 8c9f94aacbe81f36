//! Bounding box types and operations.

use serde::{Deserialize, Serialize};

use crate::error::{FloodError, FloodResult};

/// A geographic bounding box in degrees.
///
/// Field order follows the query parameters: latitude bounds first,
/// then longitude bounds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lon: f64,
    pub max_lon: f64,
}

impl BoundingBox {
    /// Create a new bounding box from its latitude and longitude bounds.
    pub fn new(min_lat: f64, max_lat: f64, min_lon: f64, max_lon: f64) -> Self {
        Self {
            min_lat,
            max_lat,
            min_lon,
            max_lon,
        }
    }

    /// Parse a comma-separated string: "min_lat,max_lat,min_lon,max_lon"
    pub fn from_csv_string(s: &str) -> Result<Self, BboxParseError> {
        let parts: Vec<&str> = s.split(',').map(str::trim).collect();
        if parts.len() != 4 {
            return Err(BboxParseError::InvalidFormat(s.to_string()));
        }

        let parse = |part: &str| {
            part.parse::<f64>()
                .map_err(|_| BboxParseError::InvalidNumber(part.to_string()))
        };

        Ok(Self {
            min_lat: parse(parts[0])?,
            max_lat: parse(parts[1])?,
            min_lon: parse(parts[2])?,
            max_lon: parse(parts[3])?,
        })
    }

    /// Reject boxes that are empty or inverted on either axis.
    pub fn validate(&self) -> FloodResult<()> {
        if !(self.min_lat < self.max_lat) {
            return Err(FloodError::InvalidRange(format!(
                "min_lat ({}) must be smaller than max_lat ({})",
                self.min_lat, self.max_lat
            )));
        }
        if !(self.min_lon < self.max_lon) {
            return Err(FloodError::InvalidRange(format!(
                "min_lon ({}) must be smaller than max_lon ({})",
                self.min_lon, self.max_lon
            )));
        }
        Ok(())
    }

    /// Point membership with min-inclusive, max-exclusive bounds on both axes.
    pub fn contains_point(&self, lat: f64, lon: f64) -> bool {
        self.min_lat <= lat && lat < self.max_lat && self.min_lon <= lon && lon < self.max_lon
    }

    /// Box containment; touching edges count as inside.
    pub fn contains(&self, other: &BoundingBox) -> bool {
        self.min_lat <= other.min_lat
            && other.max_lat <= self.max_lat
            && self.min_lon <= other.min_lon
            && other.max_lon <= self.max_lon
    }

    /// Center of the box as (lat, lon).
    pub fn center(&self) -> (f64, f64) {
        (
            (self.min_lat + self.max_lat) / 2.0,
            (self.min_lon + self.max_lon) / 2.0,
        )
    }
}

#[derive(Debug, thiserror::Error)]
pub enum BboxParseError {
    #[error("Invalid bounding box format: {0}. Expected 'min_lat,max_lat,min_lon,max_lon'")]
    InvalidFormat(String),

    #[error("Invalid number in bounding box: {0}")]
    InvalidNumber(String),
}
