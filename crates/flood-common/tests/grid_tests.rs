//! Comprehensive tests for grid cell resolution.

use flood_common::bbox::BoundingBox;
use flood_common::grid::{build_polygon, resolve_cell_bounds, GridSpec, BBOX_PRECISION};

// ============================================================================
// resolve_cell_bounds tests
// ============================================================================

#[test]
fn test_resolution_is_deterministic() {
    let first = resolve_cell_bounds(-1.375532, 33.575897, 0.05, 3).unwrap();
    for _ in 0..10 {
        assert_eq!(resolve_cell_bounds(-1.375532, 33.575897, 0.05, 3).unwrap(), first);
    }
}

#[test]
fn test_resolution_is_idempotent() {
    // Resolving the lower-left corner of a cell returns the same cell.
    let cell = resolve_cell_bounds(-1.375532, 33.575897, 0.05, 3).unwrap();
    let again = resolve_cell_bounds(cell.min_lat, cell.min_lon, 0.05, 3).unwrap();
    assert_eq!(cell, again);
}

#[test]
fn test_every_edge_in_a_band_belongs_to_the_north_east_cell() {
    // Sweep cell edges where binary floating point division misplaces points.
    for k in -200i32..200 {
        let edge: f64 = format!("{:.2}", k as f64 * 0.05).parse().unwrap();
        let cell = resolve_cell_bounds(edge, edge, 0.05, 3).unwrap();
        assert_eq!(cell.min_lat, edge, "latitude edge {}", edge);
        assert_eq!(cell.min_lon, edge, "longitude edge {}", edge);
    }
}

#[test]
fn test_point_just_below_edge_belongs_to_the_south_west_cell() {
    let cell = resolve_cell_bounds(6.1999, 39.0499, 0.05, 3).unwrap();
    assert_eq!(cell, BoundingBox::new(6.15, 6.2, 39.0, 39.05));
}

#[test]
fn test_cell_width_equals_resolution() {
    let cell = resolve_cell_bounds(16.97, 51.96, 0.05, 3).unwrap();
    assert_eq!(cell, BoundingBox::new(16.95, 17.0, 51.95, 52.0));
}

#[test]
fn test_coarser_resolution() {
    let cell = resolve_cell_bounds(-0.3, 10.7, 0.25, 2).unwrap();
    assert_eq!(cell, BoundingBox::new(-0.5, -0.25, 10.5, 10.75));
}

#[test]
fn test_rounding_half_away_from_zero() {
    // 0.0125 cells rounded to 3 decimals: 0.0125 -> 0.013, -0.0125 -> -0.013
    let cell = resolve_cell_bounds(0.013, -0.001, 0.0125, 3).unwrap();
    assert_eq!(cell.min_lat, 0.013);
    assert_eq!(cell.max_lat, 0.025);
    assert_eq!(cell.min_lon, -0.013);
    assert_eq!(cell.max_lon, 0.0);
}

// ============================================================================
// build_polygon tests
// ============================================================================

#[test]
fn test_unbuffered_polygon_ring_order() {
    let bounds = BoundingBox::new(6.225, 6.25, 39.0, 40.0);
    let polygon = build_polygon(&bounds, 0.0, BBOX_PRECISION).unwrap();

    let coords: Vec<(f64, f64)> = polygon.exterior().coords().map(|c| (c.x, c.y)).collect();
    assert_eq!(
        coords,
        vec![
            (39.0, 6.225),
            (39.0, 6.25),
            (40.0, 6.25),
            (40.0, 6.225),
            (39.0, 6.225),
        ]
    );
}

#[test]
fn test_ring_is_closed() {
    let grid = GridSpec::default();
    let cell = grid.cell_bounds(-5.81, 37.7501).unwrap();

    for polygon in [
        grid.probe_polygon(&cell).unwrap(),
        grid.neighborhood_polygon(&cell).unwrap(),
        build_polygon(&cell, 0.0, grid.precision).unwrap(),
    ] {
        let coords: Vec<_> = polygon.exterior().coords().collect();
        assert_eq!(coords.len(), 5);
        assert_eq!(coords.first(), coords.last());
    }
}

#[test]
fn test_probe_is_cell_center_for_negative_cells() {
    let grid = GridSpec::default();
    let cell = grid.cell_bounds(-5.81, 37.7501).unwrap();
    let probe = grid.probe_polygon(&cell).unwrap();

    for coord in probe.exterior().coords() {
        assert_eq!((coord.x, coord.y), (37.775, -5.825));
    }
}
