//! HTTP surface
//!
//! - `GET /cluster-info` - current snapshot
//! - `GET /healthz` - connectivity and freshness check
//! - `GET /metrics` - snapshot gauges, only when a metrics handle is given

use anyhow::{Context, Result};
use axum::{
    Json, Router,
    extract::State,
    http::{Method, StatusCode, header},
    response::IntoResponse,
    routing::get,
};
use metrics_exporter_prometheus::PrometheusHandle;
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::models::Snapshot;
use crate::services::Reflector;
use crate::telemetry;

/// Upper bound for one `/healthz` check
pub const HEALTH_CHECK_TIMEOUT: Duration = Duration::from_secs(5);

/// Shared state of the HTTP handlers
#[derive(Clone)]
pub struct AppState {
    pub reflector: Arc<Reflector>,
    pub metrics: Option<PrometheusHandle>,
}

/// Build the router for a reflector
///
/// `/metrics` is only routed when `metrics` is set.
pub fn router(reflector: Arc<Reflector>, metrics: Option<PrometheusHandle>) -> Router {
    let mut routes = Router::<AppState>::new()
        .route("/cluster-info", get(cluster_info))
        .route("/healthz", get(healthz));

    if metrics.is_some() {
        routes = routes.route("/metrics", get(metrics_text));
    }

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE]);

    routes
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(AppState { reflector, metrics })
}

/// Serve HTTP until `shutdown` is cancelled
pub async fn serve(
    reflector: Arc<Reflector>,
    metrics: Option<PrometheusHandle>,
    shutdown: CancellationToken,
) -> Result<()> {
    let addr = bind_address(&reflector.config().listen);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind HTTP listener on {}", addr))?;

    tracing::info!(address = %addr, "Starting HTTP server");

    axum::serve(listener, router(reflector, metrics))
        .with_graceful_shutdown(async move {
            shutdown.cancelled().await;
            tracing::info!("Shutting down HTTP server");
        })
        .await
        .context("HTTP server failed")
}

/// Expand the ":PORT" shorthand to a bind-all address
pub fn bind_address(listen: &str) -> String {
    if listen.starts_with(':') {
        format!("0.0.0.0{}", listen)
    } else {
        listen.to_string()
    }
}

async fn cluster_info(State(state): State<AppState>) -> Json<Snapshot> {
    let snapshot = state.reflector.snapshot().await;
    tracing::debug!(
        nodes = snapshot.nodes.len(),
        apps = snapshot.apps.len(),
        "Served cluster info"
    );
    Json(snapshot)
}

async fn healthz(State(state): State<AppState>) -> impl IntoResponse {
    match state.reflector.health_check(HEALTH_CHECK_TIMEOUT).await {
        Ok(()) => (StatusCode::OK, Json(json!({"status": "healthy"}))),
        Err(err) => {
            tracing::warn!(reason = err.reason(), error = %err, "Health check failed");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({
                    "status": "unhealthy",
                    "reason": err.reason(),
                    "error": err.to_string(),
                })),
            )
        }
    }
}

/// Gauges reflect the snapshot being served, so an expired cache reads as zero
async fn metrics_text(State(state): State<AppState>) -> impl IntoResponse {
    let Some(handle) = state.metrics else {
        return StatusCode::NOT_FOUND.into_response();
    };
    telemetry::record_snapshot(&state.reflector.snapshot().await);
    (
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        handle.render(),
    )
        .into_response()
}
