//! Query engine tests over synthetic grids.

use chrono::{Duration, NaiveDate};
use flood_common::grid::build_polygon;
use flood_common::{BoundingBox, DatasetKind, DateRange, FloodError, GridSpec};
use flood_query::{
    execute, query_bounding_box, query_point, sort_cells, AttributeValue, Cell, Dataset, Query,
};

// ============================================================================
// Helpers
// ============================================================================

fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

/// Cell containing (lat, lon) with its center as latitude/longitude attributes.
fn cell(row: usize, lat: f64, lon: f64) -> Cell {
    let bounds = GridSpec::default().cell_bounds(lat, lon).unwrap();
    let (center_lat, center_lon) = bounds.center();
    Cell::new(row, build_polygon(&bounds, 0.0, 3).unwrap())
        .with_attribute("latitude", AttributeValue::Float(center_lat))
        .with_attribute("longitude", AttributeValue::Float(center_lon))
}

/// Fully populated `rows` x `cols` grid whose south-west cell starts at (6.0, 39.0).
fn full_grid(rows: usize, cols: usize) -> Dataset {
    let mut cells = Vec::new();
    for i in 0..rows {
        for j in 0..cols {
            let lat = 6.0 + i as f64 * 0.05 + 0.025;
            let lon = 39.0 + j as f64 * 0.05 + 0.025;
            cells.push(cell(cells.len(), lat, lon));
        }
    }
    Dataset::new(DatasetKind::Summary, GridSpec::default(), cells)
}

/// 30 daily steps for the single cell at (6.2, 39.05), issued 2023-11-07.
fn detailed_series() -> Dataset {
    let issued = date("2023-11-07");
    let cells = (1..=30u32)
        .map(|step| {
            let valid = issued + Duration::days(step as i64);
            cell(step as usize - 1, 6.2, 39.05)
                .with_attribute("issued_on", AttributeValue::Date(issued))
                .with_attribute("valid_for", AttributeValue::Date(valid))
                .with_attribute("step", AttributeValue::Int(step as i64))
                .with_valid_date(valid)
                .with_step(step)
        })
        .collect();
    Dataset::new(DatasetKind::Detailed, GridSpec::default(), cells)
}

fn rows(cells: &[&Cell]) -> Vec<usize> {
    cells.iter().map(|c| c.row).collect()
}

// ============================================================================
// Point queries
// ============================================================================

#[test]
fn test_series_fixture_returns_every_step() {
    let dataset = detailed_series();
    let result = query_point(&dataset, 6.2, 39.05, false, None).unwrap();

    assert_eq!(result.primary.len(), 30);

    let steps: Vec<u32> = result.primary.iter().filter_map(|c| c.step).collect();
    assert!(steps.windows(2).all(|w| w[0] < w[1]));

    let first = &result.primary[0];
    for cell in &result.primary {
        assert_eq!(cell.geometry, first.geometry);
        assert_eq!(cell.attribute("issued_on"), first.attribute("issued_on"));
    }
}

#[test]
fn test_adjacent_east_cell_is_empty() {
    let dataset = detailed_series();
    let result = query_point(&dataset, 6.2, 39.1, false, None).unwrap();
    assert!(result.primary.is_empty());
}

#[test]
fn test_date_range_selects_three_steps() {
    let dataset = detailed_series();
    let range = DateRange::new(Some(date("2023-11-29")), Some(date("2023-12-01"))).unwrap();

    let result = query_point(&dataset, 6.2, 39.05, false, Some(&range)).unwrap();

    let steps: Vec<u32> = result.primary.iter().filter_map(|c| c.step).collect();
    assert_eq!(steps, vec![22, 23, 24]);
}

#[test]
fn test_open_ended_date_range() {
    let dataset = detailed_series();
    let range = DateRange::new(Some(date("2023-12-05")), None).unwrap();

    let result = query_point(&dataset, 6.2, 39.05, false, Some(&range)).unwrap();
    assert_eq!(result.primary.len(), 3);
}

#[test]
fn test_at_most_one_primary_cell_on_full_grid() {
    let dataset = full_grid(10, 10);

    for i in 0..40 {
        for j in 0..40 {
            let lat = 6.05 + i as f64 * 0.01;
            let lon = 39.05 + j as f64 * 0.01;
            let result = query_point(&dataset, lat, lon, false, None).unwrap();
            assert_eq!(result.primary.len(), 1, "point ({}, {})", lat, lon);
        }
    }
}

#[test]
fn test_edge_point_belongs_to_north_east_cell() {
    let dataset = full_grid(10, 10);
    let result = query_point(&dataset, 6.2, 39.05, false, None).unwrap();

    assert_eq!(result.primary.len(), 1);
    assert_eq!(
        result.primary[0].attribute("latitude"),
        Some(&AttributeValue::Float(6.225))
    );
    assert_eq!(
        result.primary[0].attribute("longitude"),
        Some(&AttributeValue::Float(39.075))
    );
}

#[test]
fn test_interior_cell_has_eight_neighbors() {
    let dataset = full_grid(10, 10);
    let result = query_point(&dataset, 6.21, 39.06, true, None).unwrap();

    assert_eq!(result.primary.len(), 1);
    let neighbors = result.neighbors.unwrap();
    assert_eq!(neighbors.len(), 8);
    assert!(!neighbors.iter().any(|n| n.row == result.primary[0].row));
}

#[test]
fn test_corner_cell_has_three_neighbors() {
    let dataset = full_grid(10, 10);
    let result = query_point(&dataset, 6.01, 39.01, true, None).unwrap();

    assert_eq!(result.primary.len(), 1);
    assert_eq!(result.neighbors.unwrap().len(), 3);
}

#[test]
fn test_neighbors_only_for_point_outside_data() {
    // The cell just west of the grid is unpopulated, its eastern neighbors are not.
    let dataset = full_grid(10, 10);
    let result = query_point(&dataset, 6.21, 38.97, true, None).unwrap();

    assert!(result.primary.is_empty());
    assert_eq!(result.neighbors.unwrap().len(), 3);
}

#[test]
fn test_neighbors_sorted_by_position() {
    let dataset = full_grid(5, 5);
    let result = query_point(&dataset, 6.11, 39.11, true, None).unwrap();

    let mut neighbors = result.neighbors.unwrap();
    sort_cells(&mut neighbors, &["latitude", "longitude"]);

    let coords: Vec<(f64, f64)> = neighbors
        .iter()
        .map(|c| {
            (
                c.attribute("latitude").and_then(AttributeValue::as_f64).unwrap(),
                c.attribute("longitude").and_then(AttributeValue::as_f64).unwrap(),
            )
        })
        .collect();

    let mut expected = coords.clone();
    expected.sort_by(|a, b| a.partial_cmp(b).unwrap());
    assert_eq!(coords, expected);
}

// ============================================================================
// Bounding box queries
// ============================================================================

#[test]
fn test_bbox_returns_touching_cells_without_neighbors() {
    let dataset = full_grid(10, 10);
    let bounds = BoundingBox::new(6.2, 6.25, 39.05, 39.1);

    let result = query_bounding_box(&dataset, &bounds, None).unwrap();

    // The owning cell plus the eight cells sharing an edge or corner with it.
    assert_eq!(result.primary.len(), 9);
    assert!(result.neighbors.is_none());
}

#[test]
fn test_bbox_inside_one_cell() {
    let dataset = full_grid(10, 10);
    let bounds = BoundingBox::new(6.21, 6.24, 39.06, 39.09);

    let result = query_bounding_box(&dataset, &bounds, None).unwrap();
    assert_eq!(result.primary.len(), 1);
}

#[test]
fn test_degenerate_bbox_is_not_an_error() {
    let dataset = full_grid(10, 10);

    let point = BoundingBox::new(6.21, 6.21, 39.06, 39.06);
    let result = query_bounding_box(&dataset, &point, None).unwrap();
    assert_eq!(result.primary.len(), 1);

    let line = BoundingBox::new(6.21, 6.21, 39.06, 39.16);
    let result = query_bounding_box(&dataset, &line, None).unwrap();
    assert_eq!(result.primary.len(), 3);
}

#[test]
fn test_inverted_bbox_is_rejected() {
    let dataset = full_grid(10, 10);

    let inverted_lat = BoundingBox::new(6.25, 6.2, 39.05, 39.1);
    assert!(matches!(
        query_bounding_box(&dataset, &inverted_lat, None),
        Err(FloodError::InvalidRange(_))
    ));

    let inverted_lon = BoundingBox::new(6.2, 6.25, 39.1, 39.05);
    assert!(matches!(
        execute(&dataset, &Query::bounding_box(inverted_lon)),
        Err(FloodError::InvalidRange(_))
    ));
}

#[test]
fn test_bbox_results_in_row_order() {
    let dataset = full_grid(10, 10);
    let bounds = BoundingBox::new(6.0, 6.5, 39.0, 39.5);

    let result = query_bounding_box(&dataset, &bounds, None).unwrap();
    let found = rows(&result.primary);

    assert_eq!(found.len(), 100);
    assert!(found.windows(2).all(|w| w[0] < w[1]));
}

#[test]
fn test_bbox_with_date_range() {
    let dataset = detailed_series();
    let bounds = BoundingBox::new(6.0, 7.0, 39.0, 40.0);
    let range = DateRange::new(Some(date("2023-11-29")), Some(date("2023-11-29"))).unwrap();

    let result = query_bounding_box(&dataset, &bounds, Some(&range)).unwrap();
    assert_eq!(rows(&result.primary), vec![21]);
}

// ============================================================================
// Query dispatch
// ============================================================================

#[test]
fn test_execute_dispatches_on_variant() {
    let dataset = full_grid(3, 3);

    let point = Query::point(6.06, 39.06).with_neighbors(true);
    let result = execute(&dataset, &point).unwrap();
    assert_eq!(result.primary.len(), 1);
    assert_eq!(result.neighbors.map(|n| n.len()), Some(8));

    let bbox = Query::bounding_box(BoundingBox::new(6.0, 6.15, 39.0, 39.15));
    let result = execute(&dataset, &bbox).unwrap();
    assert_eq!(result.primary.len(), 9);
    assert!(result.neighbors.is_none());
}

#[test]
fn test_rows_without_valid_date_excluded_by_bounded_range() {
    let dataset = full_grid(2, 2);
    let range = DateRange::new(Some(date("2023-11-29")), None).unwrap();

    let query = Query::point(6.01, 39.01).with_date_range(Some(range));
    assert!(execute(&dataset, &query).unwrap().primary.is_empty());

    let query = Query::point(6.01, 39.01).with_date_range(Some(DateRange::default()));
    assert_eq!(execute(&dataset, &query).unwrap().primary.len(), 1);
}
