//! Device catalog

use std::sync::{Arc, RwLock};

use tracing::{info, warn};

use recorder_api::Device;

use crate::errors::DashboardError;
use crate::http::recorder::RecorderApi;
use crate::view::panel::View;

/// Status shown when the catalog cannot be loaded
pub const LOAD_FAILED_STATUS: &str = "Failed to load devices.";

#[derive(Debug, Default)]
struct CatalogState {
    devices: Vec<Device>,
    selected: Option<String>,
    last_error: Option<String>,
}

/// Recordable devices as last reported by the server, plus the operator's
/// selection
pub struct DeviceCatalog {
    api: Arc<dyn RecorderApi>,
    view: Arc<dyn View>,
    state: RwLock<CatalogState>,
}

impl DeviceCatalog {
    pub fn new(api: Arc<dyn RecorderApi>, view: Arc<dyn View>) -> Self {
        Self {
            api,
            view,
            state: RwLock::new(CatalogState::default()),
        }
    }

    /// Fetch the catalog and replace the current one wholesale.
    ///
    /// A successful load resets the selection. On failure the previous
    /// catalog is kept and an error status is shown; nothing is retried.
    pub async fn load(&self) -> Result<Vec<Device>, DashboardError> {
        match self.api.devices().await {
            Ok(devices) => {
                let mut state = self.state.write().unwrap_or_else(|e| e.into_inner());
                state.devices = devices.clone();
                state.selected = None;
                state.last_error = None;
                self.view.show_devices(&state.devices, None);
                info!("Device catalog loaded: {} devices", devices.len());
                Ok(devices)
            }
            Err(e) => {
                warn!("Failed to load device catalog: {}", e);
                let mut state = self.state.write().unwrap_or_else(|e| e.into_inner());
                state.last_error = Some(e.to_string());
                self.view.show_status(LOAD_FAILED_STATUS);
                Err(e)
            }
        }
    }

    /// Current catalog
    pub fn devices(&self) -> Vec<Device> {
        let state = self.state.read().unwrap_or_else(|e| e.into_inner());
        state.devices.clone()
    }

    /// Select a device for the next start command
    pub fn select(&self, name: &str) -> Result<(), DashboardError> {
        let mut state = self.state.write().unwrap_or_else(|e| e.into_inner());
        if !state.devices.iter().any(|d| d.name == name) {
            return Err(DashboardError::Validation(format!(
                "unknown device: {}",
                name
            )));
        }
        state.selected = Some(name.to_string());
        self.view.show_devices(&state.devices, Some(name));
        Ok(())
    }

    /// Currently selected device
    pub fn selected(&self) -> Option<String> {
        let state = self.state.read().unwrap_or_else(|e| e.into_inner());
        state.selected.clone()
    }

    /// Error of the last failed load, cleared by a successful one
    pub fn last_error(&self) -> Option<String> {
        let state = self.state.read().unwrap_or_else(|e| e.into_inner());
        state.last_error.clone()
    }
}
