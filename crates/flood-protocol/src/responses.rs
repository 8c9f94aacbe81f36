//! Response bodies.

use flood_common::FloodError;
use serde::{Deserialize, Serialize};

use crate::geojson::FeatureCollection;

/// Body of the summary and detailed endpoints.
///
/// `neighboring_location` is serialized as `null` for bounding-box queries.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ForecastResponse {
    pub queried_location: FeatureCollection,
    pub neighboring_location: Option<FeatureCollection>,
}

/// Body of the threshold endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ThresholdResponse {
    pub queried_location: FeatureCollection,
}

/// Problem-details error body.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ExceptionResponse {
    /// Exception type identifier.
    #[serde(rename = "type")]
    pub type_: String,

    pub title: String,

    pub status: u16,

    pub detail: String,
}

impl ExceptionResponse {
    pub fn new(type_: impl Into<String>, status: u16, detail: impl Into<String>) -> Self {
        let status_title = match status {
            400 => "Bad Request",
            404 => "Not Found",
            503 => "Service Unavailable",
            _ => "Internal Server Error",
        };
        Self {
            type_: type_.into(),
            title: status_title.to_string(),
            status,
            detail: detail.into(),
        }
    }

    pub fn bad_request(detail: impl Into<String>) -> Self {
        Self::new("invalid-parameter-value", 400, detail)
    }

    pub fn not_found(detail: impl Into<String>) -> Self {
        Self::new("not-found", 404, detail)
    }

    pub fn unavailable(detail: impl Into<String>) -> Self {
        Self::new("service-unavailable", 503, detail)
    }

    pub fn internal_error(detail: impl Into<String>) -> Self {
        Self::new("server-error", 500, detail)
    }
}

impl From<&FloodError> for ExceptionResponse {
    fn from(err: &FloodError) -> Self {
        match err {
            FloodError::InvalidInput(msg) | FloodError::InvalidRange(msg) => {
                ExceptionResponse::bad_request(msg.clone())
            }
            FloodError::OutOfRegion(msg) => ExceptionResponse::not_found(msg.clone()),
            FloodError::DatasetUnavailable(msg) => ExceptionResponse::unavailable(msg.clone()),
            // Internal details stay in the logs.
            _ => ExceptionResponse::internal_error("Failed to build response"),
        }
    }
}
