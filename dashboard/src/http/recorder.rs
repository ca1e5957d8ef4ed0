//! Recorder service API

use async_trait::async_trait;

use recorder_api::{
    decode_list, Device, HealthSnapshot, RecordRequest, RecordResponse, Recording, StopRequest,
};

use crate::errors::DashboardError;
use crate::http::client::HttpClient;

/// Remote recorder service, as consumed by the dashboard
#[async_trait]
pub trait RecorderApi: Send + Sync {
    /// `GET /health`
    async fn health(&self) -> Result<HealthSnapshot, DashboardError>;

    /// `GET /devices`
    async fn devices(&self) -> Result<Vec<Device>, DashboardError>;

    /// `GET /recordings` (active recordings)
    async fn recordings(&self) -> Result<Vec<Recording>, DashboardError>;

    /// `GET /history` (terminal recordings)
    async fn history(&self) -> Result<Vec<Recording>, DashboardError>;

    /// `POST /record`
    async fn record(&self, device: &str) -> Result<RecordResponse, DashboardError>;

    /// `POST /stop`
    async fn stop(&self, id: &str) -> Result<(), DashboardError>;

    /// `POST /shutdown`
    async fn shutdown(&self) -> Result<(), DashboardError>;
}

#[async_trait]
impl RecorderApi for HttpClient {
    async fn health(&self) -> Result<HealthSnapshot, DashboardError> {
        self.get("/health").await
    }

    async fn devices(&self) -> Result<Vec<Device>, DashboardError> {
        let body: serde_json::Value = self.get("/devices").await?;
        Ok(decode_list(body, "devices")?)
    }

    async fn recordings(&self) -> Result<Vec<Recording>, DashboardError> {
        let body: serde_json::Value = self.get("/recordings").await?;
        Ok(decode_list(body, "recordings")?)
    }

    async fn history(&self) -> Result<Vec<Recording>, DashboardError> {
        let body: serde_json::Value = self.get("/history").await?;
        Ok(decode_list(body, "history")?)
    }

    async fn record(&self, device: &str) -> Result<RecordResponse, DashboardError> {
        let request = RecordRequest {
            device: device.to_string(),
        };
        self.post("/record", &request).await
    }

    async fn stop(&self, id: &str) -> Result<(), DashboardError> {
        let request = StopRequest { id: id.to_string() };
        self.post_discard("/stop", Some(&request)).await
    }

    async fn shutdown(&self) -> Result<(), DashboardError> {
        self.post_discard::<()>("/shutdown", None).await
    }
}
