//! Command dispatcher tests

use std::sync::atomic::Ordering;

use recdash::commands::dispatcher::{StartOutcome, SHUTDOWN_SENT_STATUS};
use recdash::errors::DashboardError;
use recdash::sync::engine::Channel;
use recorder_api::RecordingState;

use crate::fakes::{recording, FakeRecorder, Harness};

#[tokio::test]
async fn test_start_reports_short_id_and_refreshes_active_once() {
    let fake = FakeRecorder::new();
    fake.set_record_id("abcdef1234567890");
    let mut harness = Harness::new(fake);

    let outcome = harness.dispatcher.start("mic1").await.unwrap();
    assert_eq!(
        outcome,
        StartOutcome::Started {
            id: "abcdef1234567890".to_string(),
            short_id: "abcdef12".to_string(),
        }
    );

    let panel = harness.panel.snapshot();
    assert_eq!(panel.feedback.as_deref(), Some("Recording abcdef12 started."));
    assert!(panel.record_enabled);
    assert_eq!(harness.take_refreshes(), vec![Channel::Active]);
    assert_eq!(*harness.fake.record_calls.lock().unwrap(), vec!["mic1".to_string()]);
}

#[tokio::test]
async fn test_start_without_device_sends_nothing() {
    let mut harness = Harness::new(FakeRecorder::new());

    let result = harness.dispatcher.start("").await;
    assert!(matches!(result, Err(DashboardError::Validation(_))));

    let result = harness.dispatcher.start_selected().await;
    assert!(matches!(result, Err(DashboardError::Validation(_))));

    assert_eq!(harness.fake.record_count(), 0);
    assert!(harness.take_refreshes().is_empty());
}

#[tokio::test]
async fn test_start_selected_uses_catalog_selection() {
    let fake = FakeRecorder::new();
    fake.set_devices(&["mic1", "mic2"]);
    fake.set_record_id(&uuid::Uuid::new_v4().simple().to_string());
    let harness = Harness::new(fake);
    harness.catalog.load().await.unwrap();
    harness.catalog.select("mic2").unwrap();

    let outcome = harness.dispatcher.start_selected().await.unwrap();
    assert!(matches!(outcome, StartOutcome::Started { .. }));
    assert_eq!(*harness.fake.record_calls.lock().unwrap(), vec!["mic2".to_string()]);
}

#[tokio::test]
async fn test_start_failure_reenables_and_skips_refresh() {
    let mut harness = Harness::new(FakeRecorder::new());

    let result = harness.dispatcher.start("mic1").await;
    assert!(matches!(result, Err(DashboardError::Remote { status: 500, .. })));

    assert!(!harness.dispatcher.is_starting());
    assert!(harness.panel.snapshot().record_enabled);
    assert!(harness.panel.snapshot().feedback.is_none());
    assert!(harness.take_refreshes().is_empty());
}

#[tokio::test]
async fn test_second_start_while_in_flight_is_inert() {
    let fake = FakeRecorder::new();
    fake.set_record_id("abcdef1234567890");
    fake.hold_record.store(true, Ordering::SeqCst);
    let mut harness = Harness::new(fake);

    let dispatcher = harness.dispatcher.clone();
    let first = tokio::spawn(async move { dispatcher.start("mic1").await });

    while !harness.dispatcher.is_starting() {
        tokio::task::yield_now().await;
    }
    assert!(!harness.panel.snapshot().record_enabled);

    let second = harness.dispatcher.start("mic1").await.unwrap();
    assert_eq!(second, StartOutcome::Busy);

    harness.fake.release.notify_one();
    let first = first.await.unwrap().unwrap();
    assert!(matches!(first, StartOutcome::Started { .. }));

    assert_eq!(harness.fake.record_count(), 1);
    assert_eq!(harness.take_refreshes(), vec![Channel::Active]);
    assert!(harness.panel.snapshot().record_enabled);
}

#[tokio::test]
async fn test_stop_refreshes_both_lists_even_on_failure() {
    let fake = FakeRecorder::new();
    fake.set_recordings(vec![recording("rec00001", RecordingState::Recording, 1.0)]);
    fake.stop_fails.store(true, Ordering::SeqCst);
    let mut harness = Harness::new(fake);
    harness.engine.poll_active().await;
    let before = harness.panel.snapshot().active;

    let result = harness.dispatcher.stop("rec00001").await;
    assert!(matches!(result, Err(DashboardError::Network(_))));

    // Rows only change with the next applied poll
    assert_eq!(harness.panel.snapshot().active, before);
    assert_eq!(harness.fake.stop_calls.load(Ordering::SeqCst), 1);
    assert_eq!(
        harness.take_refreshes(),
        vec![Channel::Active, Channel::History]
    );
}

#[tokio::test]
async fn test_stop_refused_unless_recording() {
    let fake = FakeRecorder::new();
    fake.set_recordings(vec![recording("rec00002", RecordingState::New, 1.0)]);
    let mut harness = Harness::new(fake);
    harness.engine.poll_active().await;

    let result = harness.dispatcher.stop("rec00002").await;
    assert!(matches!(result, Err(DashboardError::Validation(_))));

    let result = harness.dispatcher.stop("missing").await;
    assert!(matches!(result, Err(DashboardError::Validation(_))));

    assert_eq!(harness.fake.stop_calls.load(Ordering::SeqCst), 0);
    assert_eq!(
        harness.take_refreshes(),
        vec![Channel::Active, Channel::Active]
    );
}

#[tokio::test]
async fn test_stop_before_first_poll_requests_active_refresh() {
    let mut harness = Harness::new(FakeRecorder::new());

    let result = harness.dispatcher.stop("rec00001").await;
    assert!(matches!(result, Err(DashboardError::Validation(_))));

    assert_eq!(harness.fake.stop_calls.load(Ordering::SeqCst), 0);
    assert_eq!(harness.take_refreshes(), vec![Channel::Active]);
}

#[tokio::test]
async fn test_shutdown_always_reports_sent() {
    let fake = FakeRecorder::new();
    fake.shutdown_fails.store(true, Ordering::SeqCst);
    let harness = Harness::new(fake);

    harness.dispatcher.shutdown().await;

    assert_eq!(harness.fake.shutdown_calls.load(Ordering::SeqCst), 1);
    assert_eq!(
        harness.panel.snapshot().status.as_deref(),
        Some(SHUTDOWN_SENT_STATUS)
    );
}
