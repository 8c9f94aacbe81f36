//! Flood forecast API service library.
//!
//! Serves point and bounding-box queries against the summary, detailed
//! and threshold datasets, which a background scheduler refreshes daily.

pub mod config;
pub mod handlers;
pub mod scheduler;
pub mod state;

use std::sync::Arc;

use axum::{routing::get, Extension, Router};
use tower_http::{compression::CompressionLayer, cors::CorsLayer, trace::TraceLayer};

use crate::state::AppState;

/// Build the service router with its middleware stack.
pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        // Forecast queries
        .route("/summary", get(handlers::flood::summary_handler))
        .route("/detailed", get(handlers::flood::detailed_handler))
        .route("/threshold", get(handlers::flood::threshold_handler))
        // Health and metrics
        .route("/health", get(handlers::health::health_handler))
        .route("/ready", get(handlers::health::ready_handler))
        .route("/metrics", get(handlers::health::metrics_handler))
        // Middleware
        .layer(Extension(state))
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
        .layer(CorsLayer::permissive())
}
