//! Operator commands

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::catalog::DeviceCatalog;
use crate::errors::DashboardError;
use crate::http::recorder::RecorderApi;
use crate::lifecycle::Lifecycle;
use crate::render::short_id;
use crate::sync::engine::{Channel, SyncEngine};
use crate::view::panel::View;
use crate::workers::refresh::RefreshTrigger;

/// Status shown after a shutdown request
pub const SHUTDOWN_SENT_STATUS: &str = "Shutdown command sent.";

/// Result of a start command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StartOutcome {
    /// The server created a recording
    Started { id: String, short_id: String },
    /// Another start is in flight; nothing was sent
    Busy,
}

/// Clears the in-flight flag and re-enables the record control, including
/// when the command future is dropped mid-request.
struct InFlight<'a> {
    flag: &'a AtomicBool,
    view: &'a dyn View,
}

impl<'a> InFlight<'a> {
    fn acquire(flag: &'a AtomicBool, view: &'a dyn View) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .ok()?;
        view.set_record_enabled(false);
        Some(Self { flag, view })
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::SeqCst);
        self.view.set_record_enabled(true);
    }
}

/// Issues start/stop/shutdown commands and schedules the refreshes they need
pub struct CommandDispatcher {
    api: Arc<dyn RecorderApi>,
    engine: Arc<SyncEngine>,
    catalog: Arc<DeviceCatalog>,
    view: Arc<dyn View>,
    refresh: RefreshTrigger,
    start_in_flight: AtomicBool,
}

impl CommandDispatcher {
    pub fn new(
        api: Arc<dyn RecorderApi>,
        engine: Arc<SyncEngine>,
        catalog: Arc<DeviceCatalog>,
        view: Arc<dyn View>,
        refresh: RefreshTrigger,
    ) -> Self {
        Self {
            api,
            engine,
            catalog,
            view,
            refresh,
            start_in_flight: AtomicBool::new(false),
        }
    }

    /// Whether a start command is currently in flight
    pub fn is_starting(&self) -> bool {
        self.start_in_flight.load(Ordering::SeqCst)
    }

    /// Start recording on `device`.
    ///
    /// Fails fast without a request when `device` is empty. A second call
    /// while one is in flight is inert and returns [`StartOutcome::Busy`].
    /// On success the active list is refreshed once.
    pub async fn start(&self, device: &str) -> Result<StartOutcome, DashboardError> {
        let device = device.trim();
        if device.is_empty() {
            return Err(DashboardError::Validation("no device selected".to_string()));
        }

        let Some(_guard) = InFlight::acquire(&self.start_in_flight, self.view.as_ref()) else {
            debug!("Start already in flight, ignoring");
            return Ok(StartOutcome::Busy);
        };

        info!("Starting recording on {}", device);
        let response = match self.api.record(device).await {
            Ok(response) => response,
            Err(e) => {
                warn!("Start on {} failed: {}", device, e);
                return Err(e);
            }
        };

        let short = short_id(&response.id);
        info!("Recording {} started on {}", response.id, device);
        self.view
            .show_feedback(&format!("Recording {} started.", short));
        self.refresh.request(Channel::Active);

        Ok(StartOutcome::Started {
            id: response.id,
            short_id: short,
        })
    }

    /// Start recording on the catalog's selected device
    pub async fn start_selected(&self) -> Result<StartOutcome, DashboardError> {
        let Some(device) = self.catalog.selected() else {
            return Err(DashboardError::Validation("no device selected".to_string()));
        };
        self.start(&device).await
    }

    /// Stop a recording.
    ///
    /// Only offered for recordings whose last polled state is `recording`.
    /// A refused stop refreshes the active list so a stale view catches up.
    /// Once a sent request completes, successfully or not, both lists are
    /// refreshed.
    pub async fn stop(&self, id: &str) -> Result<(), DashboardError> {
        let refused = match self.engine.active_state(id).await {
            Some(state) if state.can_stop() => None,
            Some(state) => Some(format!("recording {} is {}, not recording", id, state)),
            None => Some(format!("recording {} is not active", id)),
        };
        if let Some(reason) = refused {
            debug!("Stop refused: {}", reason);
            self.refresh.request(Channel::Active);
            return Err(DashboardError::Validation(reason));
        }

        info!("Stopping recording {}", id);
        let result = self.api.stop(id).await;
        if let Err(e) = &result {
            warn!("Stop of {} failed: {}", id, e);
        }

        self.refresh.request(Channel::Active);
        self.refresh.request(Channel::History);
        result
    }

    /// Ask the recorder host to power off. Transport errors are expected
    /// (the host may go down before answering) and are not reported.
    pub async fn shutdown(&self) {
        match self.api.shutdown().await {
            Ok(()) => info!("Shutdown command acknowledged"),
            Err(e) => info!("Shutdown command sent ({})", e),
        }
        self.view.show_status(SHUTDOWN_SENT_STATUS);
    }
}
