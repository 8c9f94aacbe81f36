//! R-tree spatial index over cell geometries.

use std::fmt;

use geo::{BoundingRect, Intersects, Line, Point, Polygon, Rect};
use rstar::{RTree, RTreeObject, AABB};

use crate::cell::Cell;

/// Envelope of one cell, keyed by its position in the dataset.
#[derive(Debug, Clone)]
struct CellEnvelope {
    position: usize,
    aabb: AABB<[f64; 2]>,
}

impl RTreeObject for CellEnvelope {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        self.aabb
    }
}

/// Polygon-intersection index over a fixed set of cells.
///
/// The index stores cell envelopes only; exact geometry checks run against
/// the cells passed to [`SpatialIndex::intersects`], which must be the same
/// slice the index was built from.
pub struct SpatialIndex {
    tree: RTree<CellEnvelope>,
}

impl fmt::Debug for SpatialIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SpatialIndex")
            .field("size", &self.tree.size())
            .finish()
    }
}

impl SpatialIndex {
    /// Bulk-load the index. Cells with an empty ring are never matched.
    pub fn build(cells: &[Cell]) -> Self {
        let items: Vec<CellEnvelope> = cells
            .iter()
            .enumerate()
            .filter_map(|(position, cell)| {
                cell.envelope().map(|rect| CellEnvelope {
                    position,
                    aabb: AABB::from_corners(
                        [rect.min().x, rect.min().y],
                        [rect.max().x, rect.max().y],
                    ),
                })
            })
            .collect();

        Self {
            tree: RTree::bulk_load(items),
        }
    }

    pub fn len(&self) -> usize {
        self.tree.size()
    }

    pub fn is_empty(&self) -> bool {
        self.tree.size() == 0
    }

    /// Positions of all cells whose geometry intersects `polygon`, ascending.
    ///
    /// Intersection is closed: cells that only touch the polygon along an edge
    /// or at a corner match.
    pub fn intersects(&self, cells: &[Cell], polygon: &Polygon<f64>) -> Vec<usize> {
        let Some(shape) = QueryShape::from_polygon(polygon) else {
            return Vec::new();
        };

        let envelope = shape.envelope();
        let mut positions: Vec<usize> = self
            .tree
            .locate_in_envelope_intersecting(&envelope)
            .filter(|item| {
                cells
                    .get(item.position)
                    .is_some_and(|cell| shape.intersects(&cell.geometry))
            })
            .map(|item| item.position)
            .collect();

        positions.sort_unstable();
        positions
    }
}

/// Query polygon reduced to its actual dimension.
///
/// Buffered probes collapse to a point (or a line for boxes that are flat on
/// one axis); testing those as points and lines avoids relying on
/// zero-area polygon predicates.
#[derive(Debug)]
enum QueryShape {
    Point(Point<f64>),
    Line(Line<f64>),
    Area(Polygon<f64>, Rect<f64>),
}

impl QueryShape {
    fn from_polygon(polygon: &Polygon<f64>) -> Option<Self> {
        let rect = polygon.bounding_rect()?;

        let shape = match (rect.width() == 0.0, rect.height() == 0.0) {
            (true, true) => QueryShape::Point(Point::from(rect.min())),
            (true, false) | (false, true) => QueryShape::Line(Line::new(rect.min(), rect.max())),
            (false, false) => QueryShape::Area(polygon.clone(), rect),
        };
        Some(shape)
    }

    fn envelope(&self) -> AABB<[f64; 2]> {
        match self {
            QueryShape::Point(p) => AABB::from_point([p.x(), p.y()]),
            QueryShape::Line(l) => AABB::from_corners([l.start.x, l.start.y], [l.end.x, l.end.y]),
            QueryShape::Area(_, r) => AABB::from_corners([r.min().x, r.min().y], [r.max().x, r.max().y]),
        }
    }

    fn intersects(&self, geometry: &Polygon<f64>) -> bool {
        match self {
            QueryShape::Point(p) => geometry.intersects(p),
            QueryShape::Line(l) => geometry.intersects(l),
            QueryShape::Area(polygon, _) => geometry.intersects(polygon),
        }
    }
}
