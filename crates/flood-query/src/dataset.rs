//! Immutable, indexed collection of cells.

use flood_common::{DatasetKind, GridSpec};
use geo::Polygon;

use crate::cell::Cell;
use crate::index::SpatialIndex;

/// All rows of one dataset sharing a grid and attribute schema.
///
/// A dataset is built once per refresh and never mutated; readers share it
/// behind an `Arc`.
#[derive(Debug)]
pub struct Dataset {
    kind: DatasetKind,
    grid: GridSpec,
    cells: Vec<Cell>,
    index: SpatialIndex,
}

impl Dataset {
    pub fn new(kind: DatasetKind, grid: GridSpec, cells: Vec<Cell>) -> Self {
        let index = SpatialIndex::build(&cells);
        Self {
            kind,
            grid,
            cells,
            index,
        }
    }

    pub fn empty(kind: DatasetKind, grid: GridSpec) -> Self {
        Self::new(kind, grid, Vec::new())
    }

    pub fn kind(&self) -> DatasetKind {
        self.kind
    }

    pub fn grid(&self) -> &GridSpec {
        &self.grid
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Cells whose geometry intersects `polygon`, in row order.
    pub fn intersects(&self, polygon: &Polygon<f64>) -> Vec<&Cell> {
        self.index
            .intersects(&self.cells, polygon)
            .into_iter()
            .filter_map(|position| self.cells.get(position))
            .collect()
    }

    /// Row positions whose geometry intersects `polygon`, ascending.
    pub(crate) fn intersecting_positions(&self, polygon: &Polygon<f64>) -> Vec<usize> {
        self.index.intersects(&self.cells, polygon)
    }
}
