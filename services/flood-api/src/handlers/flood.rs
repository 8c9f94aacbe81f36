//! Forecast query handlers.
//!
//! `GET /summary`, `GET /detailed` and `GET /threshold` share one flow:
//! validate parameters into a query, read the current dataset, run the
//! query, then encode the matched cells as FeatureCollections.

use std::sync::Arc;

use axum::{
    extract::{rejection::QueryRejection, Extension, Query},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use flood_common::{DatasetKind, FloodError, FloodResult};
use flood_protocol::{
    media_types, to_feature_collection, ExceptionResponse, ForecastResponse, QueryParams,
    ThresholdResponse,
};
use flood_query::execute;
use metrics::counter;
use serde_json::Value;
use tracing::{debug, error};

use crate::state::AppState;

/// GET /summary - 30-day summary forecast for a cell or box
pub async fn summary_handler(
    Extension(state): Extension<Arc<AppState>>,
    params: Result<Query<QueryParams>, QueryRejection>,
) -> Response {
    handle(&state, DatasetKind::Summary, params)
}

/// GET /detailed - daily forecast series for a cell or box
pub async fn detailed_handler(
    Extension(state): Extension<Arc<AppState>>,
    params: Result<Query<QueryParams>, QueryRejection>,
) -> Response {
    handle(&state, DatasetKind::Detailed, params)
}

/// GET /threshold - return period thresholds for a cell or box
pub async fn threshold_handler(
    Extension(state): Extension<Arc<AppState>>,
    params: Result<Query<QueryParams>, QueryRejection>,
) -> Response {
    handle(&state, DatasetKind::Threshold, params)
}

fn handle(
    state: &AppState,
    kind: DatasetKind,
    params: Result<Query<QueryParams>, QueryRejection>,
) -> Response {
    let result = params
        .map_err(|rejection| FloodError::InvalidInput(rejection.body_text()))
        .and_then(|Query(params)| respond(state, kind, &params));

    let response = match result {
        Ok(body) => json_response(StatusCode::OK, media_types::JSON, &body),
        Err(e) => error_response(kind, &e),
    };

    counter!(
        "flood_requests_total",
        "endpoint" => kind.name(),
        "status" => response.status().as_u16().to_string()
    )
    .increment(1);

    response
}

fn respond(state: &AppState, kind: DatasetKind, params: &QueryParams) -> FloodResult<Value> {
    let query = params.into_query(kind, &state.config.region)?;

    let dataset = state.store.get(kind).ok_or_else(|| {
        FloodError::DatasetUnavailable(format!("The {} dataset has not been loaded yet", kind))
    })?;

    let result = execute(&dataset, &query)?;
    let columns = kind.properties();
    let queried_location = to_feature_collection(&result.primary, columns, kind.primary_sort())?;

    debug!(
        dataset = %kind,
        primary = result.primary.len(),
        neighbors = result.neighbors.as_ref().map_or(0, Vec::len),
        "Query answered"
    );

    let body = match kind {
        DatasetKind::Threshold => serde_json::to_value(ThresholdResponse { queried_location })?,
        DatasetKind::Summary | DatasetKind::Detailed => {
            let neighboring_location = result
                .neighbors
                .as_deref()
                .map(|cells| to_feature_collection(cells, columns, kind.neighbor_sort()))
                .transpose()?;
            serde_json::to_value(ForecastResponse {
                queried_location,
                neighboring_location,
            })?
        }
    };

    Ok(body)
}

fn error_response(kind: DatasetKind, err: &FloodError) -> Response {
    if err.is_client_error() {
        debug!(dataset = %kind, error = %err, "Rejected query");
    } else {
        error!(dataset = %kind, error = %err, "Query failed");
    }

    let status = StatusCode::from_u16(err.http_status_code())
        .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    let body = serde_json::to_value(ExceptionResponse::from(err)).unwrap_or_default();
    json_response(status, media_types::PROBLEM_JSON, &body)
}

fn json_response(status: StatusCode, content_type: &'static str, body: &Value) -> Response {
    (status, [(header::CONTENT_TYPE, content_type)], body.to_string()).into_response()
}
