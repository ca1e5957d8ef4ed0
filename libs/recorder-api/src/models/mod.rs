//! API models

use serde::{de::DeserializeOwned, Deserialize, Serialize};
use thiserror::Error;

/// Host health snapshot (`GET /health`)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HealthSnapshot {
    /// Load average
    pub load: f64,

    /// Memory usage percentage (0-100)
    pub mem_usage: f64,

    /// Disk usage percentage (0-100)
    pub disk_usage: f64,
}

/// Recordable sound device
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Device {
    /// Device name, used as both identifier and display label
    pub name: String,

    #[serde(default)]
    pub description: String,

    #[serde(default)]
    pub details: Vec<String>,
}

impl Device {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            details: Vec::new(),
        }
    }
}

/// Device list response (`GET /devices`)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeviceListResponse {
    pub devices: Vec<Device>,
}

/// Recording state as reported by the server.
///
/// Unknown states are carried verbatim so that a newer server never breaks
/// list decoding.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum RecordingState {
    New,
    Recording,
    Stopped,
    Error,
    Unknown(String),
}

impl RecordingState {
    pub fn as_str(&self) -> &str {
        match self {
            RecordingState::New => "new",
            RecordingState::Recording => "recording",
            RecordingState::Stopped => "stopped",
            RecordingState::Error => "error",
            RecordingState::Unknown(raw) => raw,
        }
    }
}

impl From<String> for RecordingState {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "new" => RecordingState::New,
            "recording" => RecordingState::Recording,
            "stopped" => RecordingState::Stopped,
            "error" => RecordingState::Error,
            _ => RecordingState::Unknown(raw),
        }
    }
}

impl From<RecordingState> for String {
    fn from(state: RecordingState) -> Self {
        state.as_str().to_string()
    }
}

impl std::fmt::Display for RecordingState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A recording as listed by `GET /recordings` and `GET /history`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recording {
    /// Opaque identifier (uuid hex on the reference server)
    pub id: String,

    pub device_name: String,

    pub state: RecordingState,

    /// Creation time in epoch seconds
    #[serde(default)]
    pub created_at: Option<f64>,

    /// Last state change in epoch seconds
    #[serde(default)]
    pub last_modification: Option<f64>,

    /// Capture process exit code when `state` is `error`
    #[serde(default)]
    pub error_code: Option<i64>,
}

/// Start recording request (`POST /record`)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordRequest {
    pub device: String,
}

/// Start recording response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordResponse {
    pub id: String,

    #[serde(default)]
    pub device_name: Option<String>,

    #[serde(default)]
    pub state: Option<RecordingState>,
}

/// Stop recording request (`POST /stop`)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StopRequest {
    pub id: String,
}

/// Stop recording response. The body is not required by clients.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StopResponse {
    #[serde(default)]
    pub status: Option<String>,

    #[serde(default)]
    pub id: Option<String>,
}

/// List decoding error
#[derive(Error, Debug)]
pub enum ListError {
    #[error("expected a list or an object with field `{0}`")]
    UnexpectedShape(String),

    #[error("invalid list entry: {0}")]
    InvalidEntry(#[from] serde_json::Error),
}

/// Decode a list response that may be either a bare JSON array or an object
/// wrapping the array under `field`.
///
/// The array is taken from `field` when the body is an object; a bare array
/// is used as is. Anything else, including an object without `field`, is
/// rejected.
pub fn decode_list<T: DeserializeOwned>(
    body: serde_json::Value,
    field: &str,
) -> Result<Vec<T>, ListError> {
    let list = match body {
        serde_json::Value::Array(_) => body,
        serde_json::Value::Object(mut map) => match map.remove(field) {
            Some(inner @ serde_json::Value::Array(_)) => inner,
            _ => return Err(ListError::UnexpectedShape(field.to_string())),
        },
        _ => return Err(ListError::UnexpectedShape(field.to_string())),
    };

    Ok(serde_json::from_value(list)?)
}
