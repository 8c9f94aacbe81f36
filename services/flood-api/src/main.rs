//! Flood API Server
//!
//! Point and bounding-box queries over GloFAS flood forecast datasets.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::sync::broadcast;
use tracing::{error, info, warn};
use tracing_subscriber::{fmt, EnvFilter};

use flood_api::config::FloodConfig;
use flood_api::scheduler::RefreshScheduler;
use flood_api::state::AppState;
use storage::{ObjectStorage, SnapshotStore};

/// Flood API Server
#[derive(Parser, Debug)]
#[command(name = "flood-api")]
#[command(about = "Flood forecast query server for GloFAS datasets")]
struct Args {
    /// Listen address
    #[arg(short, long, default_value = "0.0.0.0:8080", env = "FLOOD_LISTEN_ADDR")]
    listen: String,

    /// Configuration file
    #[arg(short, long, default_value = "config/flood.yaml", env = "FLOOD_CONFIG")]
    config: PathBuf,

    /// Log level
    #[arg(long, default_value = "info", env = "RUST_LOG")]
    log_level: String,

    /// Number of worker threads
    #[arg(long, env = "FLOOD_WORKER_THREADS")]
    worker_threads: Option<usize>,
}

fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let args = Args::parse();

    // Build runtime with configured threads
    let mut runtime_builder = tokio::runtime::Builder::new_multi_thread();
    runtime_builder.enable_all();

    if let Some(threads) = args.worker_threads {
        runtime_builder.worker_threads(threads);
    }

    let runtime = runtime_builder
        .build()
        .context("Failed to create Tokio runtime")?;

    runtime.block_on(run_server(args))
}

async fn run_server(args: Args) -> Result<()> {
    // Initialize tracing
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_level(true)
        .json()
        .init();

    // Initialize Prometheus metrics exporter
    let prometheus_handle = metrics_exporter_prometheus::PrometheusBuilder::new()
        .install_recorder()
        .context("Failed to install Prometheus recorder")?;

    info!("Starting flood API server");

    let config = Arc::new(FloodConfig::load(&args.config)?);
    let storage = ObjectStorage::new(&config.storage)?;
    let store = Arc::new(SnapshotStore::new());

    let scheduler = Arc::new(RefreshScheduler::new(
        Arc::new(storage),
        Arc::clone(&store),
        Arc::clone(&config),
    ));

    // Initial load before accepting requests
    let report = scheduler.refresh_all().await;
    if !report.all_published() {
        warn!(
            failures = report.failures(),
            "Initial load incomplete, unavailable datasets answer 503 until the next refresh"
        );
    }

    let (shutdown_tx, _) = broadcast::channel::<()>(1);

    let scheduler_shutdown = shutdown_tx.subscribe();
    let scheduler_task = tokio::spawn({
        let scheduler = Arc::clone(&scheduler);
        async move {
            if let Err(e) = scheduler.run_forever(scheduler_shutdown).await {
                error!(error = %e, "Refresh scheduler stopped");
            }
        }
    });

    let state = Arc::new(AppState::new(config, store).with_prometheus(prometheus_handle));
    let app = flood_api::build_router(state);

    // Parse listen address
    let addr: SocketAddr = args
        .listen
        .parse()
        .with_context(|| format!("Invalid listen address: {}", args.listen))?;

    info!("Flood API listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    let server_shutdown = shutdown_tx.clone();
    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            tokio::signal::ctrl_c().await.ok();
            info!("Received shutdown signal");
            server_shutdown.send(()).ok();
        })
        .await
        .context("Server failed")?;

    scheduler_task.await.ok();
    Ok(())
}
