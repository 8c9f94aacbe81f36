//! Wire types for the flood forecast API.
//!
//! - [`queries`]: raw request parameters and their validation into a [`Query`]
//! - [`geojson`]: FeatureCollection encoding of query results
//! - [`responses`]: response bodies for forecast, threshold and error replies
//!
//! [`Query`]: flood_query::Query

pub mod geojson;
pub mod queries;
pub mod responses;

pub use geojson::{to_feature_collection, Feature, FeatureCollection, Geometry};
pub use queries::QueryParams;
pub use responses::{ExceptionResponse, ForecastResponse, ThresholdResponse};

/// Media types returned by the API.
pub mod media_types {
    pub const JSON: &str = "application/json";
    pub const PROBLEM_JSON: &str = "application/problem+json";
    pub const PROMETHEUS_TEXT: &str = "text/plain; version=0.0.4";
}
