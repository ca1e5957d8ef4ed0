//! HTTP server setup

use std::future::Future;
use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::app::options::ServerOptions;
use crate::errors::DashboardError;
use crate::server::handlers::{
    health_handler, panel_handler, record_handler, reload_devices_handler, select_handler,
    shutdown_handler, stop_handler, version_handler,
};
use crate::server::state::ServerState;

/// Build the control surface router
pub fn router(state: Arc<ServerState>) -> Router {
    Router::new()
        // Health and version
        .route("/health", get(health_handler))
        .route("/version", get(version_handler))
        // Panel
        .route("/panel", get(panel_handler))
        // Devices
        .route("/select", post(select_handler))
        .route("/devices/reload", post(reload_devices_handler))
        // Commands
        .route("/record", post(record_handler))
        .route("/stop", post(stop_handler))
        .route("/shutdown", post(shutdown_handler))
        // State and middleware
        .with_state(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

/// Start the HTTP server
pub async fn serve(
    options: &ServerOptions,
    state: Arc<ServerState>,
    shutdown_signal: impl Future<Output = ()> + Send + 'static,
) -> Result<JoinHandle<Result<(), DashboardError>>, DashboardError> {
    let app = router(state);

    let addr = format!("{}:{}", options.host, options.port);
    info!("Starting control server on {}", addr);

    let listener = TcpListener::bind(&addr)
        .await
        .map_err(|e| DashboardError::Server(e.to_string()))?;

    let handle = tokio::spawn(async move {
        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal)
            .await
            .map_err(|e| DashboardError::Server(e.to_string()))
    });

    Ok(handle)
}
