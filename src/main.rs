//! loginstats - account table anomaly metrics.
//!
//! Periodically scans the user table for duplicate logins/emails and casing
//! anomalies and exports the counts as Prometheus gauges.

mod config;
mod db;
mod error;
mod http;
mod metrics;
mod stats;

use crate::config::Config;
use crate::db::Database;
use crate::metrics::Metrics;
use crate::stats::LoginStatsCollector;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .init();

    // Load configuration
    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "config.toml".to_string());

    let config = Config::load(&config_path).map_err(|e| {
        error!(path = %config_path, error = %e, "Failed to load config");
        e
    })?;

    info!(
        name = %config.server.name,
        database = %config.database.path,
        interval_secs = config.stats.collection_interval,
        "Starting loginstats"
    );

    let db = Database::new(&config.database.path).await?;

    // Registers the login gauges before the first pass can run
    let metrics = Arc::new(Metrics::new());
    let collector = Arc::new(LoginStatsCollector::new(
        Arc::new(db),
        &metrics,
        config.stats.interval(),
        config.stats.fetch_timeout(),
    )?);
    info!("Metrics initialized");

    let shutdown = CancellationToken::new();
    tokio::spawn(cancel_on_signal(tokio::signal::ctrl_c(), shutdown.clone()));

    // Convention: metrics_port = 0 disables the HTTP endpoint (used by tests).
    let metrics_port = config.server.metrics_port;
    let http_task = if metrics_port == 0 {
        info!("Metrics HTTP endpoint disabled");
        None
    } else {
        let state = http::HttpState {
            metrics: Arc::clone(&metrics),
            collector: Arc::clone(&collector),
        };
        let shutdown = shutdown.clone();
        let task = tokio::spawn(async move {
            http::run_http_server(metrics_port, state, shutdown).await;
        });
        info!(port = metrics_port, "Prometheus HTTP server started");
        Some(task)
    };

    let collection = {
        let collector = Arc::clone(&collector);
        let shutdown = shutdown.clone();
        tokio::spawn(async move { collector.run(shutdown).await })
    };

    let reason = collection.await?;
    info!(reason = ?reason, "Login stats collection finished");

    if let Some(task) = http_task {
        task.await?;
    }

    Ok(())
}

/// Cancel `shutdown` once `signal` fires.
///
/// If the listener cannot be installed the token is left alone and the
/// service keeps collecting until killed.
async fn cancel_on_signal<F>(signal: F, shutdown: CancellationToken)
where
    F: Future<Output = std::io::Result<()>>,
{
    match signal.await {
        Ok(()) => {
            info!("Shutdown requested");
            shutdown.cancel();
        }
        Err(e) => error!(error = %e, "Failed to listen for shutdown signal"),
    }
}
