//! Spatial query engine over gridded forecast datasets.
//!
//! A [`Dataset`] owns its cells and an R-tree [`SpatialIndex`] over their
//! geometries. [`engine`] answers point and bounding-box [`Query`]s against
//! a dataset, partitioning point results into the queried cell and its
//! neighbors.

pub mod cell;
pub mod dataset;
pub mod engine;
pub mod index;
pub mod query;
pub mod sort;

pub use cell::{AttributeValue, Cell};
pub use dataset::Dataset;
pub use engine::{execute, query_bounding_box, query_point, QueryResult};
pub use index::SpatialIndex;
pub use query::Query;
pub use sort::sort_cells;
