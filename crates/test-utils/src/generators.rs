//! Synthetic dataset generators.
//!
//! Every generator returns newline-delimited JSON with one object per row
//! and the cell polygon in the `wkt` column, the same layout the services
//! load from object storage. Values follow simple patterns so tests can
//! verify them by position.

use chrono::{Duration, NaiveDate};
use serde_json::{json, Map, Value};

/// Cell edge length used by all generators.
pub const RESOLUTION: f64 = 0.05;

/// WKT polygon for the cell whose south-west corner is (min_lat, min_lon).
///
/// The ring runs bottom-left, top-left, top-right, bottom-right, bottom-left
/// in (lon, lat) order.
pub fn cell_wkt(min_lat: f64, min_lon: f64, resolution: f64) -> String {
    let (s, w) = (min_lat, min_lon);
    let (n, e) = (min_lat + resolution, min_lon + resolution);
    format!(
        "POLYGON (({w:.3} {s:.3}, {w:.3} {n:.3}, {e:.3} {n:.3}, {e:.3} {s:.3}, {w:.3} {s:.3}))"
    )
}

/// One row object: geometry, cell center and the given attributes.
fn row(min_lat: f64, min_lon: f64, attributes: Value) -> String {
    let mut object = Map::new();
    object.insert("wkt".to_string(), json!(cell_wkt(min_lat, min_lon, RESOLUTION)));
    object.insert("latitude".to_string(), json!(round3(min_lat + RESOLUTION / 2.0)));
    object.insert("longitude".to_string(), json!(round3(min_lon + RESOLUTION / 2.0)));
    if let Value::Object(attributes) = attributes {
        object.extend(attributes);
    }
    Value::Object(object).to_string()
}

fn round3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}

/// South-west corners of a `rows` x `cols` block starting at (min_lat, min_lon).
fn corners(min_lat: f64, min_lon: f64, rows: usize, cols: usize) -> Vec<(usize, usize, f64, f64)> {
    let mut out = Vec::with_capacity(rows * cols);
    for i in 0..rows {
        for j in 0..cols {
            let lat = round3(min_lat + i as f64 * RESOLUTION);
            let lon = round3(min_lon + j as f64 * RESOLUTION);
            out.push((i, j, lat, lon));
        }
    }
    out
}

fn join_lines(lines: Vec<String>) -> String {
    let mut text = lines.join("\n");
    text.push('\n');
    text
}

/// Fully populated summary grid.
///
/// `peak_step` is `i * cols + j + 1` so each cell is identifiable; enum
/// columns cycle through their codes.
pub fn summary_grid_ndjson(min_lat: f64, min_lon: f64, rows: usize, cols: usize, issued_on: &str) -> String {
    const TIMINGS: [&str; 3] = ["BB", "GC", "GB"];
    const TENDENCIES: [&str; 3] = ["U", "D", "C"];
    const INTENSITIES: [&str; 4] = ["P", "R", "Y", "G"];

    let issued = parse_date(issued_on);
    let lines = corners(min_lat, min_lon, rows, cols)
        .into_iter()
        .map(|(i, j, lat, lon)| {
            let n = i * cols + j;
            let peak_step = n as i64 % 30 + 1;
            row(
                lat,
                lon,
                json!({
                    "issued_on": issued_on,
                    "peak_step": peak_step,
                    "peak_day": (issued + Duration::days(peak_step)).to_string(),
                    "peak_timing": TIMINGS[n % TIMINGS.len()],
                    "max_median_dis": 100.0 + n as f64,
                    "min_median_dis": 10.0 + n as f64,
                    "control_dis": 50.0 + n as f64,
                    "max_max_dis": 200.0 + n as f64,
                    "min_min_dis": 1.0 + n as f64,
                    "tendency": TENDENCIES[n % TENDENCIES.len()],
                    "max_p_above_20y": 0.1,
                    "max_p_above_5y": 0.3,
                    "max_p_above_2y": 0.6,
                    "intensity": INTENSITIES[n % INTENSITIES.len()],
                }),
            )
        })
        .collect();
    join_lines(lines)
}

/// Daily series of `steps` rows for every cell of a block.
///
/// Step `k` (1-based) is valid for `issued_on + k days`.
pub fn detailed_grid_ndjson(
    min_lat: f64,
    min_lon: f64,
    rows: usize,
    cols: usize,
    steps: u32,
    issued_on: &str,
) -> String {
    let issued = parse_date(issued_on);
    let mut lines = Vec::new();
    for (_, _, lat, lon) in corners(min_lat, min_lon, rows, cols) {
        for step in 1..=steps {
            let valid_for = issued + Duration::days(step as i64);
            let median = 10.0 * step as f64;
            lines.push(row(
                lat,
                lon,
                json!({
                    "issued_on": format!("{}T00:00:00", issued_on),
                    "valid_for": format!("{}T00:00:00", valid_for),
                    "step": step,
                    "p_above_2y": 0.5,
                    "p_above_5y": 0.2,
                    "p_above_20y": 0.05,
                    "min_dis": median - 5.0,
                    "Q1_dis": median - 2.0,
                    "median_dis": median,
                    "Q3_dis": median + 2.0,
                    "max_dis": median + 5.0,
                }),
            ));
        }
    }
    join_lines(lines)
}

/// Fully populated return-period threshold grid.
pub fn threshold_grid_ndjson(min_lat: f64, min_lon: f64, rows: usize, cols: usize) -> String {
    let lines = corners(min_lat, min_lon, rows, cols)
        .into_iter()
        .map(|(i, j, lat, lon)| {
            let n = (i * cols + j) as f64;
            row(
                lat,
                lon,
                json!({
                    "threshold_2y": 100.0 + n,
                    "threshold_5y": 200.0 + n,
                    "threshold_20y": 400.0 + n,
                }),
            )
        })
        .collect();
    join_lines(lines)
}

fn parse_date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").expect("generator dates are YYYY-MM-DD")
}
