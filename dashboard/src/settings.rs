//! Settings file management

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::errors::DashboardError;
use crate::health::DEFAULT_LOAD_SCALE;
use crate::logs::LogLevel;
use crate::timefmt::TimeSettings;

/// Dashboard settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,

    /// Emit JSON log lines on stdout
    #[serde(default)]
    pub log_json: bool,

    /// Directory for rolling log files
    #[serde(default)]
    pub log_dir: Option<PathBuf>,

    /// Recorder service configuration
    #[serde(default)]
    pub backend: BackendSettings,

    /// Health polling interval in seconds
    #[serde(default = "default_health_interval")]
    pub health_interval_secs: u64,

    /// Multiplier applied to the load average before classification
    #[serde(default = "default_load_scale")]
    pub load_scale: f64,

    /// Timestamp display
    #[serde(default)]
    pub time: TimeSettings,

    /// Discard poll responses that were issued before the last applied one
    #[serde(default)]
    pub sequence_guard: bool,

    /// Enable the local control server
    #[serde(default = "default_true")]
    pub enable_server: bool,

    /// Local control server configuration
    #[serde(default)]
    pub server: ServerSettings,
}

fn default_true() -> bool {
    true
}

fn default_health_interval() -> u64 {
    60
}

fn default_load_scale() -> f64 {
    DEFAULT_LOAD_SCALE
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            log_level: LogLevel::Info,
            log_json: false,
            log_dir: None,
            backend: BackendSettings::default(),
            health_interval_secs: default_health_interval(),
            load_scale: default_load_scale(),
            time: TimeSettings::default(),
            sequence_guard: false,
            enable_server: true,
            server: ServerSettings::default(),
        }
    }
}

impl Settings {
    /// Read settings from a JSON file
    pub async fn load(path: &Path) -> Result<Self, DashboardError> {
        debug!("Reading settings from {}", path.display());
        let contents = tokio::fs::read_to_string(path).await?;
        let settings: Settings = serde_json::from_str(&contents)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Reject values the dashboard cannot run with
    pub fn validate(&self) -> Result<(), DashboardError> {
        if self.health_interval_secs == 0 {
            return Err(DashboardError::Config(
                "health_interval_secs must be positive".to_string(),
            ));
        }
        if !self.load_scale.is_finite() || self.load_scale <= 0.0 {
            return Err(DashboardError::Config(format!(
                "load_scale must be a positive number, got {}",
                self.load_scale
            )));
        }
        if self.backend.timeout_secs == 0 {
            return Err(DashboardError::Config(
                "backend.timeout_secs must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

/// Recorder service settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendSettings {
    /// Base URL of the recorder API
    #[serde(default = "default_backend_url")]
    pub base_url: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

fn default_backend_url() -> String {
    "http://localhost:8000/api/v1".to_string()
}

fn default_timeout() -> u64 {
    30
}

impl Default for BackendSettings {
    fn default() -> Self {
        Self {
            base_url: default_backend_url(),
            timeout_secs: default_timeout(),
        }
    }
}

/// Local control server settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8080
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}
