//! Well-known text encoding of cell polygons.
//!
//! Accepts `POLYGON ((lon lat, lon lat, ...), (...))`. Keywords are case
//! insensitive; coordinates beyond the first two (Z, M) are ignored.

use geo::{Coord, LineString, Polygon};
use thiserror::Error;

/// Errors that can occur when parsing WKT geometry.
#[derive(Debug, Error, PartialEq)]
pub enum WktError {
    #[error("Unsupported geometry type: {0}")]
    UnsupportedType(String),

    #[error("Invalid WKT format: {0}")]
    InvalidFormat(String),

    #[error("Invalid coordinate value: {0}")]
    InvalidCoordinate(String),

    /// First and last points of a ring differ, or the ring is too short.
    #[error("Ring {0} is not closed")]
    UnclosedRing(usize),
}

/// Parse a WKT `POLYGON` into a geo polygon.
pub fn parse_polygon(wkt: &str) -> Result<Polygon<f64>, WktError> {
    let wkt = wkt.trim();
    let start = wkt
        .find('(')
        .ok_or_else(|| WktError::InvalidFormat("Missing opening parenthesis".to_string()))?;

    let keyword = wkt[..start].trim();
    if !keyword.eq_ignore_ascii_case("POLYGON") {
        return Err(WktError::UnsupportedType(keyword.to_string()));
    }

    let end = wkt
        .rfind(')')
        .ok_or_else(|| WktError::InvalidFormat("Missing closing parenthesis".to_string()))?;
    if end <= start || !wkt[end + 1..].trim().is_empty() {
        return Err(WktError::InvalidFormat("Unbalanced parentheses".to_string()));
    }

    let mut rings = split_rings(&wkt[start + 1..end])?
        .into_iter()
        .enumerate()
        .map(|(i, ring)| parse_ring(i, ring))
        .collect::<Result<Vec<_>, _>>()?;

    if rings.is_empty() {
        return Err(WktError::InvalidFormat("POLYGON must have an exterior ring".to_string()));
    }

    let exterior = rings.remove(0);
    Ok(Polygon::new(exterior, rings))
}

/// Split `(a b, c d), (e f, ...)` into the text inside each ring.
fn split_rings(inner: &str) -> Result<Vec<&str>, WktError> {
    let mut rings = Vec::new();
    let mut depth = 0usize;
    let mut ring_start = 0usize;

    for (i, ch) in inner.char_indices() {
        match ch {
            '(' => {
                if depth > 0 {
                    return Err(WktError::InvalidFormat("Nested ring".to_string()));
                }
                depth = 1;
                ring_start = i + 1;
            }
            ')' => {
                if depth == 0 {
                    return Err(WktError::InvalidFormat("Unbalanced parentheses".to_string()));
                }
                depth = 0;
                rings.push(&inner[ring_start..i]);
            }
            ',' if depth == 0 => {}
            c if depth == 0 && !c.is_whitespace() => {
                return Err(WktError::InvalidFormat(format!(
                    "Unexpected '{}' between rings",
                    c
                )));
            }
            _ => {}
        }
    }

    if depth != 0 {
        return Err(WktError::InvalidFormat("Unterminated ring".to_string()));
    }

    Ok(rings)
}

fn parse_ring(index: usize, text: &str) -> Result<LineString<f64>, WktError> {
    let coords = text
        .split(',')
        .map(|point| {
            let parts: Vec<&str> = point.split_whitespace().collect();
            if parts.len() < 2 {
                return Err(WktError::InvalidFormat(format!(
                    "Expected 'lon lat', got '{}'",
                    point.trim()
                )));
            }
            let x: f64 = parts[0]
                .parse()
                .map_err(|_| WktError::InvalidCoordinate(parts[0].to_string()))?;
            let y: f64 = parts[1]
                .parse()
                .map_err(|_| WktError::InvalidCoordinate(parts[1].to_string()))?;
            Ok(Coord { x, y })
        })
        .collect::<Result<Vec<_>, _>>()?;

    if coords.len() < 4 || coords.first() != coords.last() {
        return Err(WktError::UnclosedRing(index));
    }

    Ok(LineString::new(coords))
}
