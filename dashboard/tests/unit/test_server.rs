//! Local control surface tests

use std::net::SocketAddr;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::Duration;

use reqwest::StatusCode;
use serde_json::{json, Value};
use tokio::net::TcpListener;

use recdash::server::serve::router;
use recdash::server::state::ServerState;
use recdash::sync::engine::Channel;

use crate::fakes::{FakeRecorder, Harness};

async fn spawn_surface(harness: &Harness) -> SocketAddr {
    let state = ServerState::new(
        harness.panel.clone(),
        harness.catalog.clone(),
        harness.dispatcher.clone(),
    );
    let app = router(Arc::new(state));
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

fn recorder_with_devices() -> FakeRecorder {
    let fake = FakeRecorder::new();
    fake.set_devices(&["mic1", "mic2"]);
    fake.set_record_id("abcdef1234567890");
    fake
}

#[tokio::test]
async fn test_liveness_and_version() {
    let harness = Harness::new(FakeRecorder::new());
    let addr = spawn_surface(&harness).await;
    let client = reqwest::Client::new();

    let health: Value = client
        .get(format!("http://{}/health", addr))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(health["status"], "healthy");
    assert_eq!(health["service"], "recdash");

    let version: Value = client
        .get(format!("http://{}/version", addr))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(version["version"], env!("CARGO_PKG_VERSION"));
}

#[tokio::test]
async fn test_record_with_selection_flow() {
    let mut harness = Harness::new(recorder_with_devices());
    let addr = spawn_surface(&harness).await;
    let client = reqwest::Client::new();

    // Nothing selected yet
    let response = client
        .post(format!("http://{}/record", addr))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let response = client
        .post(format!("http://{}/devices/reload", addr))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["devices"].as_array().unwrap().len(), 2);

    let response = client
        .post(format!("http://{}/select", addr))
        .json(&json!({"device": "mic9"}))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let response = client
        .post(format!("http://{}/select", addr))
        .json(&json!({"device": "mic1"}))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = client
        .post(format!("http://{}/record", addr))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::ACCEPTED);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["short_id"], "abcdef12");

    let panel: Value = client
        .get(format!("http://{}/panel", addr))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(panel["feedback"], "Recording abcdef12 started.");
    assert_eq!(panel["selected_device"], "mic1");
    assert_eq!(panel["record_enabled"], true);

    assert_eq!(*harness.fake.record_calls.lock().unwrap(), vec!["mic1".to_string()]);
    assert_eq!(harness.take_refreshes(), vec![Channel::Active]);
}

#[tokio::test]
async fn test_record_with_explicit_device() {
    let harness = Harness::new(recorder_with_devices());
    let addr = spawn_surface(&harness).await;

    let response = reqwest::Client::new()
        .post(format!("http://{}/record", addr))
        .json(&json!({"device": "mic2"}))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::ACCEPTED);
    assert_eq!(*harness.fake.record_calls.lock().unwrap(), vec!["mic2".to_string()]);
}

#[tokio::test]
async fn test_record_while_in_flight_conflicts() {
    let fake = recorder_with_devices();
    fake.hold_record.store(true, Ordering::SeqCst);
    let harness = Harness::new(fake);
    let addr = spawn_surface(&harness).await;
    let client = reqwest::Client::new();

    let first = {
        let client = client.clone();
        tokio::spawn(async move {
            client
                .post(format!("http://{}/record", addr))
                .json(&json!({"device": "mic1"}))
                .send()
                .await
                .unwrap()
                .status()
        })
    };

    while !harness.dispatcher.is_starting() {
        tokio::time::sleep(Duration::from_millis(5)).await;
    }

    let response = client
        .post(format!("http://{}/record", addr))
        .json(&json!({"device": "mic1"}))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);

    harness.fake.release.notify_one();
    assert_eq!(first.await.unwrap(), StatusCode::ACCEPTED);
    assert_eq!(harness.fake.record_count(), 1);
}

#[tokio::test]
async fn test_stop_and_shutdown() {
    let harness = Harness::new(FakeRecorder::new());
    let addr = spawn_surface(&harness).await;
    let client = reqwest::Client::new();

    let response = client
        .post(format!("http://{}/stop", addr))
        .json(&json!({"id": "not-active"}))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body: Value = response.json().await.unwrap();
    assert!(body["error"].as_str().unwrap().contains("not-active"));

    let response = client
        .post(format!("http://{}/shutdown", addr))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::ACCEPTED);
    assert_eq!(harness.fake.shutdown_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_reload_failure_is_bad_gateway() {
    let harness = Harness::new(FakeRecorder::new());
    let addr = spawn_surface(&harness).await;

    let response = reqwest::Client::new()
        .post(format!("http://{}/devices/reload", addr))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
}
