//! HTTP client tests against a local mock of the recorder service

use std::net::SocketAddr;
use std::time::Duration;

use axum::{
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use tokio::net::TcpListener;

use recdash::errors::DashboardError;
use recdash::http::client::HttpClient;
use recdash::http::recorder::RecorderApi;
use recorder_api::{RecordRequest, RecordResponse, RecordingState};

async fn spawn_mock() -> SocketAddr {
    let api = Router::new()
        .route(
            "/health",
            get(|| async { Json(json!({"load": 0.42, "mem_usage": 51.5, "disk_usage": 77.0})) }),
        )
        .route(
            "/devices",
            get(|| async {
                Json(json!({"devices": [
                    {"name": "hw:1,0", "description": "USB Audio", "details": ["card 1", "device 0"]},
                    {"name": "hw:2,0"}
                ]}))
            }),
        )
        .route(
            "/recordings",
            get(|| async {
                Json(json!([
                    {"id": "a1b2c3d4e5", "device_name": "hw:1,0", "state": "recording",
                     "created_at": 1700000000.5, "last_modification": 1700000001.0}
                ]))
            }),
        )
        .route(
            "/history",
            get(|| async {
                Json(json!({"history": [
                    {"id": "0f0f0f0f0f", "device_name": "hw:2,0", "state": "error",
                     "created_at": 1700000000.0, "last_modification": 1700000002.0,
                     "error_code": 1}
                ]}))
            }),
        )
        .route(
            "/record",
            post(|Json(request): Json<RecordRequest>| async move {
                Json(RecordResponse {
                    id: uuid::Uuid::new_v4().simple().to_string(),
                    device_name: Some(request.device),
                    state: Some(RecordingState::New),
                })
            }),
        )
        .route(
            "/stop",
            post(|Json(_): Json<Value>| async {
                (StatusCode::NOT_FOUND, "Recording not found")
            }),
        )
        .route("/shutdown", post(|| async { Json(json!({"status": "shutting down"})) }));

    let app = Router::new().nest("/api/v1", api);
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

fn client_for(addr: SocketAddr) -> HttpClient {
    HttpClient::new(&format!("http://{}/api/v1", addr), Duration::from_secs(5)).unwrap()
}

#[tokio::test]
async fn test_health_decodes() {
    let client = client_for(spawn_mock().await);
    let health = client.health().await.unwrap();
    assert_eq!(health.load, 0.42);
    assert_eq!(health.mem_usage, 51.5);
    assert_eq!(health.disk_usage, 77.0);
}

#[tokio::test]
async fn test_lists_accept_bare_and_wrapped_bodies() {
    let client = client_for(spawn_mock().await);

    let devices = client.devices().await.unwrap();
    assert_eq!(devices.len(), 2);
    assert_eq!(devices[0].name, "hw:1,0");
    assert_eq!(devices[0].details, vec!["card 1", "device 0"]);
    assert!(devices[1].description.is_empty());

    let active = client.recordings().await.unwrap();
    assert_eq!(active.len(), 1);
    assert_eq!(active[0].state, RecordingState::Recording);
    assert_eq!(active[0].created_at, Some(1_700_000_000.5));

    let history = client.history().await.unwrap();
    assert_eq!(history[0].state, RecordingState::Error);
    assert_eq!(history[0].error_code, Some(1));
}

#[tokio::test]
async fn test_record_sends_device() {
    let client = client_for(spawn_mock().await);
    let response = client.record("hw:1,0").await.unwrap();
    assert_eq!(response.device_name.as_deref(), Some("hw:1,0"));
    assert_eq!(response.id.len(), 32);
}

#[tokio::test]
async fn test_non_success_status_is_remote_error() {
    let client = client_for(spawn_mock().await);
    match client.stop("missing").await {
        Err(DashboardError::Remote { status, body }) => {
            assert_eq!(status, 404);
            assert_eq!(body, "Recording not found");
        }
        other => panic!("expected remote error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_shutdown_ignores_response_body() {
    let client = client_for(spawn_mock().await);
    client.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_missing_route_is_remote_error() {
    let addr = spawn_mock().await;
    let client = HttpClient::new(&format!("http://{}/other", addr), Duration::from_secs(5)).unwrap();
    assert!(matches!(
        client.health().await,
        Err(DashboardError::Remote { status: 404, .. })
    ));
}

#[tokio::test]
async fn test_malformed_body_is_protocol_error() {
    let app = Router::new()
        .route("/health", get(|| async { "not json" }))
        .route("/recordings", get(|| async { Json(json!({"items": []})) }));
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    let client = HttpClient::new(&format!("http://{}", addr), Duration::from_secs(5)).unwrap();

    assert!(matches!(client.health().await, Err(DashboardError::Protocol(_))));
    assert!(matches!(client.recordings().await, Err(DashboardError::Protocol(_))));
}

#[tokio::test]
async fn test_unreachable_service_is_network_error() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let client = client_for(addr);
    assert!(matches!(client.health().await, Err(DashboardError::Network(_))));
}
