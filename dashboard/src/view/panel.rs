//! Rendering adapter
//!
//! [`View`] is the only seam through which presentation state changes. The
//! engine and the dispatcher hand it finished projections; it never sees
//! business state.

use std::sync::RwLock;

use serde::Serialize;

use recorder_api::Device;

use crate::health::HealthView;
use crate::render::RowView;

/// Presentation sink
pub trait View: Send + Sync {
    fn show_health(&self, health: HealthView);

    fn show_active(&self, rows: Vec<RowView>);

    fn show_history(&self, rows: Vec<RowView>);

    fn show_devices(&self, devices: &[Device], selected: Option<&str>);

    fn set_record_enabled(&self, enabled: bool);

    fn show_feedback(&self, message: &str);

    fn show_status(&self, message: &str);
}

/// Device option of the selection control
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeviceOption {
    pub value: String,
    pub label: String,
}

/// Number of times each area has been rendered
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RenderCounts {
    pub health: u64,
    pub active: u64,
    pub history: u64,
    pub devices: u64,
}

/// Everything currently on screen
#[derive(Debug, Clone, Serialize)]
pub struct PanelState {
    pub health: Option<HealthView>,
    pub active: Vec<RowView>,
    pub history: Vec<RowView>,
    pub devices: Vec<DeviceOption>,
    pub selected_device: Option<String>,
    pub record_enabled: bool,
    pub feedback: Option<String>,
    pub status: Option<String>,
    pub renders: RenderCounts,
}

impl Default for PanelState {
    fn default() -> Self {
        Self {
            health: None,
            active: Vec::new(),
            history: Vec::new(),
            devices: Vec::new(),
            selected_device: None,
            record_enabled: true,
            feedback: None,
            status: None,
            renders: RenderCounts::default(),
        }
    }
}

/// In-memory view backing the local control surface
#[derive(Debug, Default)]
pub struct Panel {
    state: RwLock<PanelState>,
}

impl Panel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of the current panel
    pub fn snapshot(&self) -> PanelState {
        self.state.read().unwrap_or_else(|e| e.into_inner()).clone()
    }

    fn update(&self, f: impl FnOnce(&mut PanelState)) {
        let mut state = self.state.write().unwrap_or_else(|e| e.into_inner());
        f(&mut state);
    }
}

impl View for Panel {
    fn show_health(&self, health: HealthView) {
        self.update(|state| {
            state.health = Some(health);
            state.renders.health += 1;
        });
    }

    fn show_active(&self, rows: Vec<RowView>) {
        self.update(|state| {
            state.active = rows;
            state.renders.active += 1;
        });
    }

    fn show_history(&self, rows: Vec<RowView>) {
        self.update(|state| {
            state.history = rows;
            state.renders.history += 1;
        });
    }

    fn show_devices(&self, devices: &[Device], selected: Option<&str>) {
        let options = devices
            .iter()
            .map(|d| DeviceOption {
                value: d.name.clone(),
                label: d.name.clone(),
            })
            .collect();

        self.update(|state| {
            state.devices = options;
            state.selected_device = selected.map(str::to_string);
            state.renders.devices += 1;
        });
    }

    fn set_record_enabled(&self, enabled: bool) {
        self.update(|state| state.record_enabled = enabled);
    }

    fn show_feedback(&self, message: &str) {
        self.update(|state| state.feedback = Some(message.to_string()));
    }

    fn show_status(&self, message: &str) {
        self.update(|state| state.status = Some(message.to_string()));
    }
}
