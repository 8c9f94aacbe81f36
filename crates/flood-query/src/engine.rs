//! Point and bounding-box queries over a dataset.

use flood_common::grid::{build_polygon, BBOX_PRECISION};
use flood_common::{BoundingBox, DateRange, FloodError, FloodResult};
use tracing::debug;

use crate::cell::Cell;
use crate::dataset::Dataset;
use crate::query::Query;

/// Cells matched by a query.
///
/// Point queries always carry `neighbors` (empty when neighbors were not
/// requested); bounding-box queries never do.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryResult<'a> {
    pub primary: Vec<&'a Cell>,
    pub neighbors: Option<Vec<&'a Cell>>,
}

impl<'a> QueryResult<'a> {
    pub fn is_empty(&self) -> bool {
        self.primary.is_empty() && self.neighbors.as_ref().map_or(true, Vec::is_empty)
    }
}

/// Run a query against `dataset`.
pub fn execute<'a>(dataset: &'a Dataset, query: &Query) -> FloodResult<QueryResult<'a>> {
    match query {
        Query::Point {
            lat,
            lon,
            include_neighbors,
            date_range,
        } => query_point(dataset, *lat, *lon, *include_neighbors, date_range.as_ref()),
        Query::BoundingBox { bounds, date_range } => {
            query_bounding_box(dataset, bounds, date_range.as_ref())
        }
    }
}

/// Find the cell containing (lat, lon) and, optionally, its 8-connected
/// neighbors.
///
/// The queried cell is matched with a probe at the cell center, so at most
/// one cell per step is primary on a regular grid. Neighbors are every other
/// cell touching a box of twice the cell size around that center.
pub fn query_point<'a>(
    dataset: &'a Dataset,
    lat: f64,
    lon: f64,
    include_neighbors: bool,
    date_range: Option<&DateRange>,
) -> FloodResult<QueryResult<'a>> {
    let grid = dataset.grid();
    let cell = grid.cell_bounds(lat, lon)?;
    let probe = grid.probe_polygon(&cell)?;
    let probe_hits = dataset.intersecting_positions(&probe);

    if !include_neighbors {
        let primary = select(dataset, &probe_hits, date_range);
        debug!(
            dataset = %dataset.kind(),
            lat, lon,
            primary = primary.len(),
            "Point query"
        );
        return Ok(QueryResult {
            primary,
            neighbors: Some(Vec::new()),
        });
    }

    let neighborhood = grid.neighborhood_polygon(&cell)?;
    let candidates = dataset.intersecting_positions(&neighborhood);

    let (primary_hits, neighbor_hits): (Vec<usize>, Vec<usize>) = candidates
        .into_iter()
        .partition(|position| probe_hits.binary_search(position).is_ok());

    let primary = select(dataset, &primary_hits, date_range);
    let neighbors = select(dataset, &neighbor_hits, date_range);

    debug!(
        dataset = %dataset.kind(),
        lat, lon,
        primary = primary.len(),
        neighbors = neighbors.len(),
        "Point query with neighbors"
    );

    Ok(QueryResult {
        primary,
        neighbors: Some(neighbors),
    })
}

/// Find every cell intersecting the box. Cells touching the box edge match.
///
/// A zero-area box is a valid query and matches the cells it touches. An
/// inverted box is rejected before any spatial lookup.
pub fn query_bounding_box<'a>(
    dataset: &'a Dataset,
    bounds: &BoundingBox,
    date_range: Option<&DateRange>,
) -> FloodResult<QueryResult<'a>> {
    if !(bounds.min_lat <= bounds.max_lat && bounds.min_lon <= bounds.max_lon) {
        return Err(FloodError::InvalidRange(format!(
            "Bounding box is inverted: lat {}..{}, lon {}..{}",
            bounds.min_lat, bounds.max_lat, bounds.min_lon, bounds.max_lon
        )));
    }

    let polygon = build_polygon(bounds, 0.0, BBOX_PRECISION)?;
    let hits = dataset.intersecting_positions(&polygon);
    let primary = select(dataset, &hits, date_range);

    debug!(
        dataset = %dataset.kind(),
        min_lat = bounds.min_lat,
        max_lat = bounds.max_lat,
        min_lon = bounds.min_lon,
        max_lon = bounds.max_lon,
        primary = primary.len(),
        "Bounding box query"
    );

    Ok(QueryResult {
        primary,
        neighbors: None,
    })
}

fn select<'a>(
    dataset: &'a Dataset,
    positions: &[usize],
    date_range: Option<&DateRange>,
) -> Vec<&'a Cell> {
    positions
        .iter()
        .filter_map(|&position| dataset.cells().get(position))
        .filter(|cell| within(cell, date_range))
        .collect()
}

/// Rows without a validity date never match a bounded range.
fn within(cell: &Cell, date_range: Option<&DateRange>) -> bool {
    match date_range {
        None => true,
        Some(range) if range.is_unbounded() => true,
        Some(range) => cell.valid_date.is_some_and(|date| range.contains(date)),
    }
}
