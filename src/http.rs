//! HTTP server for the Prometheus metrics endpoint and the usage stats snapshot.
//!
//! Runs on a separate tokio task and serves:
//! - `/metrics` for Prometheus scraping
//! - `/api/stats/users` for an on-demand login stats report (JSON)

use crate::metrics::Metrics;
use crate::stats::LoginStatsCollector;
use axum::extract::State;
use axum::http::StatusCode;
use axum::{Json, Router, routing::get};
use std::collections::BTreeMap;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// Shared handles for the HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub metrics: Arc<Metrics>,
    pub collector: Arc<LoginStatsCollector>,
}

/// Handler for GET /metrics - returns Prometheus metrics in text format.
async fn metrics_handler(State(state): State<HttpState>) -> String {
    state.metrics.gather()
}

/// Handler for GET /api/stats/users - runs one detection pass and returns its report.
async fn user_stats_handler(
    State(state): State<HttpState>,
) -> Result<Json<BTreeMap<&'static str, u64>>, (StatusCode, String)> {
    state
        .collector
        .collect_login_stats()
        .await
        .map(Json)
        .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))
}

fn router(state: HttpState) -> Router {
    Router::new()
        .route("/metrics", get(metrics_handler))
        .route("/api/stats/users", get(user_stats_handler))
        .with_state(state)
}

/// Run the HTTP server until `shutdown` is cancelled.
///
/// Binds to `0.0.0.0:port`. This is a long-running task that should be
/// spawned in the background.
pub async fn run_http_server(port: u16, state: HttpState, shutdown: CancellationToken) {
    let app = router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("Prometheus HTTP server listening on {}", addr);

    let listener = match tokio::net::TcpListener::bind(&addr).await {
        Ok(listener) => listener,
        Err(e) => {
            tracing::error!("Failed to bind HTTP server on {}: {}", addr, e);
            return;
        }
    };

    let server = axum::serve(listener, app)
        .with_graceful_shutdown(async move { shutdown.cancelled().await });
    if let Err(e) = server.await {
        tracing::error!("HTTP server error: {}", e);
    }
}
