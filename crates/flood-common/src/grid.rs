//! Grid cell resolution for regular lat/lon forecast grids.
//!
//! Cell arithmetic is done in exact decimal rather than binary floating
//! point: in `f64`, `39.05 / 0.05` is `780.999...`, so `floor` puts a point
//! sitting on a cell edge into the cell to its west.

use std::str::FromStr;

use geo::{LineString, Polygon};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use crate::bbox::BoundingBox;
use crate::error::{FloodError, FloodResult};

/// Precision used for the exact (unbuffered) bounding-box query polygon.
pub const BBOX_PRECISION: u32 = 9;

/// Resolution and rounding precision of a dataset's regular grid.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GridSpec {
    /// Cell edge length in degrees.
    pub resolution: f64,
    /// Decimal places kept when rounding cell bounds.
    pub precision: u32,
}

impl Default for GridSpec {
    /// GloFAS grid: 0.05 degree cells, bounds kept to 3 decimals.
    fn default() -> Self {
        Self {
            resolution: 0.05,
            precision: 3,
        }
    }
}

impl GridSpec {
    pub fn new(resolution: f64, precision: u32) -> Self {
        Self {
            resolution,
            precision,
        }
    }

    /// Reject grids whose cell center cannot be held at `precision`.
    ///
    /// The probe polygon sits half a cell in from each edge; if rounding moves
    /// it, it lands on shared cell edges and matches several cells.
    pub fn validate(&self) -> FloodResult<()> {
        let resolution = to_decimal(self.resolution, "resolution")?;
        if resolution <= Decimal::ZERO {
            return Err(FloodError::InvalidInput(format!(
                "resolution must be positive, got {}",
                resolution
            )));
        }

        let half = resolution / Decimal::from(2);
        if round(half, self.precision) != half {
            return Err(FloodError::InvalidInput(format!(
                "precision {} cannot represent half of resolution {}",
                self.precision, resolution
            )));
        }

        Ok(())
    }

    /// Bounds of the cell containing (lat, lon).
    pub fn cell_bounds(&self, lat: f64, lon: f64) -> FloodResult<BoundingBox> {
        resolve_cell_bounds(lat, lon, self.resolution, self.precision)
    }

    /// Degenerate polygon at the center of the cell.
    ///
    /// Shrinking a cell-sized box by half a cell on every side leaves a single
    /// point, which intersects only the owning cell.
    pub fn probe_polygon(&self, cell: &BoundingBox) -> FloodResult<Polygon<f64>> {
        build_polygon(cell, -self.resolution / 2.0, self.precision)
    }

    /// Box of twice the cell size around the cell center.
    ///
    /// Touches the owning cell and all 8-connected neighbors.
    pub fn neighborhood_polygon(&self, cell: &BoundingBox) -> FloodResult<Polygon<f64>> {
        build_polygon(cell, self.resolution / 2.0, self.precision)
    }
}

/// Find the bounds of the grid cell containing (lat, lon).
///
/// A point on a cell edge belongs to the cell to its north (latitude) or
/// east (longitude): each axis is min-inclusive, max-exclusive. For a
/// resolution of 0.05, (-5.8, 37.75) resolves to latitude -5.8..-5.75 and
/// longitude 37.75..37.8, while (-5.81, 37.7501) resolves to latitude
/// -5.85..-5.8 and longitude 37.75..37.8.
///
/// Bounds are rounded half away from zero to `precision` decimals.
pub fn resolve_cell_bounds(
    lat: f64,
    lon: f64,
    resolution: f64,
    precision: u32,
) -> FloodResult<BoundingBox> {
    let resolution = to_decimal(resolution, "resolution")?;
    if resolution <= Decimal::ZERO {
        return Err(FloodError::InvalidInput(format!(
            "resolution must be positive, got {}",
            resolution
        )));
    }

    let (min_lat, max_lat) = axis_bounds(to_decimal(lat, "latitude")?, resolution, precision)?;
    let (min_lon, max_lon) = axis_bounds(to_decimal(lon, "longitude")?, resolution, precision)?;

    Ok(BoundingBox::new(min_lat, max_lat, min_lon, max_lon))
}

/// Build the closed ring `[bottom_left, top_left, top_right, bottom_right, bottom_left]`
/// from `bounds`, pushed outward by `buffer` on every side.
///
/// A negative buffer shrinks the box. Coordinates are (lon, lat) and rounded to
/// `precision` decimals.
pub fn build_polygon(bounds: &BoundingBox, buffer: f64, precision: u32) -> FloodResult<Polygon<f64>> {
    let buffer = to_decimal(buffer, "buffer")?;

    let shift = |value: f64, name: &str, outward: Decimal| -> FloodResult<f64> {
        let value = to_decimal(value, name)?;
        let moved = value.checked_add(outward).ok_or_else(|| {
            FloodError::InvalidInput(format!("{} {} overflows when buffered", name, value))
        })?;
        Ok(to_f64(round(moved, precision)))
    };

    let min_lon = shift(bounds.min_lon, "min_lon", -buffer)?;
    let min_lat = shift(bounds.min_lat, "min_lat", -buffer)?;
    let max_lon = shift(bounds.max_lon, "max_lon", buffer)?;
    let max_lat = shift(bounds.max_lat, "max_lat", buffer)?;

    let ring = LineString::from(vec![
        (min_lon, min_lat),
        (min_lon, max_lat),
        (max_lon, max_lat),
        (max_lon, min_lat),
        (min_lon, min_lat),
    ]);

    Ok(Polygon::new(ring, vec![]))
}

fn axis_bounds(value: Decimal, resolution: Decimal, precision: u32) -> FloodResult<(f64, f64)> {
    let overflow = || FloodError::InvalidInput(format!("coordinate {} is out of range", value));

    let index = value.checked_div(resolution).ok_or_else(overflow)?.floor();
    let min = index.checked_mul(resolution).ok_or_else(overflow)?;
    let max = min.checked_add(resolution).ok_or_else(overflow)?;

    Ok((to_f64(round(min, precision)), to_f64(round(max, precision))))
}

fn round(value: Decimal, precision: u32) -> Decimal {
    value.round_dp_with_strategy(precision, RoundingStrategy::MidpointAwayFromZero)
}

/// Convert through the shortest decimal representation of the float, so
/// `0.05` becomes exactly `0.05` rather than its binary expansion.
fn to_decimal(value: f64, name: &str) -> FloodResult<Decimal> {
    if !value.is_finite() {
        return Err(FloodError::InvalidInput(format!(
            "{} must be a finite number, got {}",
            name, value
        )));
    }

    Decimal::from_str(&value.to_string()).map_err(|e| {
        FloodError::InvalidInput(format!("{} {} is not representable: {}", name, value, e))
    })
}

/// Decimal display is plain digits, which parses back to the nearest f64.
fn to_f64(value: Decimal) -> f64 {
    value.normalize().to_string().parse().unwrap_or(f64::NAN)
}
