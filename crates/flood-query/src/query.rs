//! Resolved query variants.

use flood_common::{BoundingBox, DateRange};

/// A validated query. Built once at the request boundary and matched
/// exhaustively downstream.
#[derive(Debug, Clone, PartialEq)]
pub enum Query {
    Point {
        lat: f64,
        lon: f64,
        include_neighbors: bool,
        date_range: Option<DateRange>,
    },
    BoundingBox {
        bounds: BoundingBox,
        date_range: Option<DateRange>,
    },
}

impl Query {
    pub fn point(lat: f64, lon: f64) -> Self {
        Query::Point {
            lat,
            lon,
            include_neighbors: false,
            date_range: None,
        }
    }

    pub fn bounding_box(bounds: BoundingBox) -> Self {
        Query::BoundingBox {
            bounds,
            date_range: None,
        }
    }

    pub fn with_neighbors(self, include: bool) -> Self {
        match self {
            Query::Point {
                lat,
                lon,
                date_range,
                ..
            } => Query::Point {
                lat,
                lon,
                include_neighbors: include,
                date_range,
            },
            other => other,
        }
    }

    pub fn with_date_range(self, range: Option<DateRange>) -> Self {
        match self {
            Query::Point {
                lat,
                lon,
                include_neighbors,
                ..
            } => Query::Point {
                lat,
                lon,
                include_neighbors,
                date_range: range,
            },
            Query::BoundingBox { bounds, .. } => Query::BoundingBox {
                bounds,
                date_range: range,
            },
        }
    }

    pub fn date_range(&self) -> Option<&DateRange> {
        match self {
            Query::Point { date_range, .. } | Query::BoundingBox { date_range, .. } => {
                date_range.as_ref()
            }
        }
    }
}
