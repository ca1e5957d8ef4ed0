//! Error types for the dashboard

use thiserror::Error;

/// Main error type for the dashboard
#[derive(Error, Debug)]
pub enum DashboardError {
    /// Request could not be sent or no response was received
    #[error("Network error: {0}")]
    Network(String),

    /// Response received but not in the expected JSON shape
    #[error("Protocol error: {0}")]
    Protocol(String),

    /// Command attempted with missing or invalid input
    #[error("Validation error: {0}")]
    Validation(String),

    /// Response received with a non-success status
    #[error("Remote error: {status} - {body}")]
    Remote { status: u16, body: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Server error: {0}")]
    Server(String),

    #[error("Shutdown error: {0}")]
    Shutdown(String),
}

impl From<reqwest::Error> for DashboardError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            DashboardError::Protocol(err.to_string())
        } else {
            DashboardError::Network(err.to_string())
        }
    }
}

impl From<recorder_api::ListError> for DashboardError {
    fn from(err: recorder_api::ListError) -> Self {
        DashboardError::Protocol(err.to_string())
    }
}

impl From<url::ParseError> for DashboardError {
    fn from(err: url::ParseError) -> Self {
        DashboardError::Config(format!("invalid URL: {}", err))
    }
}
