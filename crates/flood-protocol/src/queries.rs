//! Request parameters and their validation into a [`Query`].

use chrono::NaiveDate;
use flood_common::{BoundingBox, DatasetKind, DateRange, FloodError, FloodResult};
use flood_query::Query;
use serde::Deserialize;

/// Raw query-string parameters shared by the forecast endpoints.
///
/// A request names either a point (`lat`, `lon`) or a bounding box
/// (`min_lat`, `max_lat`, `min_lon`, `max_lon`), never both.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct QueryParams {
    pub lat: Option<f64>,
    pub lon: Option<f64>,
    pub min_lat: Option<f64>,
    pub max_lat: Option<f64>,
    pub min_lon: Option<f64>,
    pub max_lon: Option<f64>,
    pub include_neighbors: Option<bool>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

impl QueryParams {
    pub fn point(lat: f64, lon: f64) -> Self {
        Self {
            lat: Some(lat),
            lon: Some(lon),
            ..Default::default()
        }
    }

    pub fn bbox(min_lat: f64, max_lat: f64, min_lon: f64, max_lon: f64) -> Self {
        Self {
            min_lat: Some(min_lat),
            max_lat: Some(max_lat),
            min_lon: Some(min_lon),
            max_lon: Some(max_lon),
            ..Default::default()
        }
    }

    pub fn with_neighbors(mut self, include: bool) -> Self {
        self.include_neighbors = Some(include);
        self
    }

    pub fn with_dates(mut self, start: Option<NaiveDate>, end: Option<NaiveDate>) -> Self {
        self.start_date = start;
        self.end_date = end;
        self
    }

    /// Validate the parameters for `kind` and build the query.
    ///
    /// Checks run in order: exactly one complete shape, date range, bounding
    /// box ordering, then the region of interest. Date ranges only apply to
    /// time-series datasets and neighbors only to datasets that report them;
    /// otherwise those parameters are ignored.
    pub fn into_query(&self, kind: DatasetKind, region: &BoundingBox) -> FloodResult<Query> {
        let shape = self.shape()?;

        let date_range = if kind.accepts_date_range() {
            let range = DateRange::new(self.start_date, self.end_date)?;
            (!range.is_unbounded()).then_some(range)
        } else {
            None
        };

        match shape {
            Shape::Point { lat, lon } => {
                if !region.contains_point(lat, lon) {
                    return Err(FloodError::OutOfRegion(
                        "Queried coordinates are outside the region of interest".to_string(),
                    ));
                }
                let include_neighbors =
                    kind.supports_neighbors() && self.include_neighbors.unwrap_or(false);
                Ok(Query::Point {
                    lat,
                    lon,
                    include_neighbors,
                    date_range,
                })
            }
            Shape::BoundingBox(bounds) => {
                bounds.validate()?;
                if !region.contains(&bounds) {
                    return Err(FloodError::OutOfRegion(
                        "Queried bounding box is outside the region of interest".to_string(),
                    ));
                }
                Ok(Query::BoundingBox { bounds, date_range })
            }
        }
    }

    fn shape(&self) -> FloodResult<Shape> {
        let point = [self.lat, self.lon];
        let bbox = [self.min_lat, self.max_lat, self.min_lon, self.max_lon];

        let any_point = point.iter().any(Option::is_some);
        let any_bbox = bbox.iter().any(Option::is_some);

        if any_point && any_bbox {
            return Err(FloodError::InvalidInput(
                "Only one of coordinates, bounding box may be supplied".to_string(),
            ));
        }

        if let [Some(lat), Some(lon)] = point {
            return Ok(Shape::Point { lat, lon });
        }

        if let [Some(min_lat), Some(max_lat), Some(min_lon), Some(max_lon)] = bbox {
            return Ok(Shape::BoundingBox(BoundingBox::new(
                min_lat, max_lat, min_lon, max_lon,
            )));
        }

        if any_point || any_bbox {
            Err(FloodError::InvalidInput(
                "Incomplete coordinates or bounding box".to_string(),
            ))
        } else {
            Err(FloodError::InvalidInput(
                "One of coordinates, bounding box must be supplied".to_string(),
            ))
        }
    }
}

enum Shape {
    Point { lat: f64, lon: f64 },
    BoundingBox(BoundingBox),
}
