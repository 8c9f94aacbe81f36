//! Health, readiness and metrics handlers.

use std::collections::BTreeMap;
use std::sync::Arc;

use axum::{
    extract::Extension,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use chrono::{DateTime, Utc};
use flood_common::DatasetKind;
use flood_protocol::media_types;
use serde::Serialize;

use crate::state::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
}

#[derive(Serialize)]
pub struct ReadyResponse {
    pub ready: bool,
    pub version: u64,
    pub datasets: BTreeMap<DatasetKind, DatasetStatus>,
}

#[derive(Serialize)]
pub struct DatasetStatus {
    pub loaded: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rows: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fetched_at: Option<DateTime<Utc>>,
}

/// GET /health - Basic health check
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
    })
}

/// GET /ready - Ready once every dataset has been published
pub async fn ready_handler(Extension(state): Extension<Arc<AppState>>) -> Response {
    let snapshot = state.store.current();

    let datasets = DatasetKind::ALL
        .into_iter()
        .map(|kind| {
            let entry = snapshot.entry(kind);
            let status = DatasetStatus {
                loaded: entry.is_some(),
                rows: entry.map(|e| e.dataset.len()),
                fetched_at: entry.map(|e| e.fetched_at),
            };
            (kind, status)
        })
        .collect();

    let response = ReadyResponse {
        ready: snapshot.is_complete(),
        version: snapshot.version,
        datasets,
    };

    let status = if response.ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (status, Json(response)).into_response()
}

/// GET /metrics - Prometheus metrics
pub async fn metrics_handler(Extension(state): Extension<Arc<AppState>>) -> Response {
    let body = state
        .prometheus
        .as_ref()
        .map(|handle| handle.render())
        .unwrap_or_default();

    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, media_types::PROMETHEUS_TEXT)],
        body,
    )
        .into_response()
}
