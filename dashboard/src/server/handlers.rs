//! HTTP request handlers

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use recorder_api::Device;

use crate::commands::dispatcher::StartOutcome;
use crate::errors::DashboardError;
use crate::server::state::ServerState;
use crate::utils::version_info;

/// Error response body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl IntoResponse for DashboardError {
    fn into_response(self) -> Response {
        let status = match &self {
            DashboardError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            DashboardError::Network(_)
            | DashboardError::Protocol(_)
            | DashboardError::Remote { .. } => StatusCode::BAD_GATEWAY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (
            status,
            Json(ErrorResponse {
                error: self.to_string(),
            }),
        )
            .into_response()
    }
}

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
    pub version: String,
}

/// Health check handler
pub async fn health_handler() -> impl IntoResponse {
    let version = version_info();
    Json(HealthResponse {
        status: "healthy".to_string(),
        service: "recdash".to_string(),
        version: version.version,
    })
}

/// Version handler
pub async fn version_handler() -> impl IntoResponse {
    Json(version_info())
}

/// Current panel handler
pub async fn panel_handler(State(state): State<Arc<ServerState>>) -> impl IntoResponse {
    Json(state.panel.snapshot())
}

/// Device selection request
#[derive(Debug, Deserialize)]
pub struct SelectRequest {
    pub device: String,
}

/// Device selection handler
pub async fn select_handler(
    State(state): State<Arc<ServerState>>,
    Json(request): Json<SelectRequest>,
) -> Result<StatusCode, DashboardError> {
    state.catalog.select(&request.device)?;
    Ok(StatusCode::NO_CONTENT)
}

/// Device list response
#[derive(Debug, Serialize)]
pub struct DevicesResponse {
    pub devices: Vec<Device>,
}

/// Catalog reload handler
pub async fn reload_devices_handler(
    State(state): State<Arc<ServerState>>,
) -> Result<Json<DevicesResponse>, DashboardError> {
    let devices = state.catalog.load().await?;
    Ok(Json(DevicesResponse { devices }))
}

/// Start request; the catalog selection is used when `device` is absent
#[derive(Debug, Default, Deserialize)]
pub struct StartRequest {
    #[serde(default)]
    pub device: Option<String>,
}

fn parse_start_request(body: &[u8]) -> Result<StartRequest, DashboardError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(StartRequest::default());
    }
    serde_json::from_slice(body)
        .map_err(|e| DashboardError::Validation(format!("invalid start request: {}", e)))
}

/// Start response
#[derive(Debug, Serialize)]
pub struct StartResponse {
    pub id: String,
    pub short_id: String,
}

/// Start recording handler
pub async fn record_handler(
    State(state): State<Arc<ServerState>>,
    body: Bytes,
) -> Result<Response, DashboardError> {
    let request = parse_start_request(&body)?;
    let outcome = match request.device {
        Some(device) => state.dispatcher.start(&device).await?,
        None => state.dispatcher.start_selected().await?,
    };

    Ok(match outcome {
        StartOutcome::Started { id, short_id } => {
            (StatusCode::ACCEPTED, Json(StartResponse { id, short_id })).into_response()
        }
        StartOutcome::Busy => (
            StatusCode::CONFLICT,
            Json(ErrorResponse {
                error: "a start command is already in flight".to_string(),
            }),
        )
            .into_response(),
    })
}

/// Stop request
#[derive(Debug, Deserialize)]
pub struct StopRequest {
    pub id: String,
}

/// Stop recording handler
pub async fn stop_handler(
    State(state): State<Arc<ServerState>>,
    Json(request): Json<StopRequest>,
) -> Result<StatusCode, DashboardError> {
    state.dispatcher.stop(&request.id).await?;
    Ok(StatusCode::ACCEPTED)
}

/// Remote shutdown handler
pub async fn shutdown_handler(State(state): State<Arc<ServerState>>) -> StatusCode {
    state.dispatcher.shutdown().await;
    StatusCode::ACCEPTED
}
