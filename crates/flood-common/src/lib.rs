//! Common types and utilities shared across the flood forecast services.

pub mod bbox;
pub mod dataset;
pub mod error;
pub mod grid;
pub mod time;

pub use bbox::BoundingBox;
pub use dataset::DatasetKind;
pub use error::{FloodError, FloodResult};
pub use grid::{build_polygon, resolve_cell_bounds, GridSpec};
pub use time::DateRange;
