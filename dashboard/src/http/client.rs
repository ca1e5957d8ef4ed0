//! HTTP client implementation

use std::time::Duration;

use reqwest::{Client, Response};
use serde::{de::DeserializeOwned, Serialize};
use tracing::debug;
use url::Url;

use crate::errors::DashboardError;

/// HTTP client for the recorder service
pub struct HttpClient {
    client: Client,
    base_url: Url,
}

impl HttpClient {
    /// Create a new HTTP client
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, DashboardError> {
        let base_url = Url::parse(base_url.trim_end_matches('/'))?;
        if base_url.cannot_be_a_base() {
            return Err(DashboardError::Config(format!(
                "base URL cannot carry paths: {}",
                base_url
            )));
        }

        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self { client, base_url })
    }

    /// Get the base URL
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url.as_str().trim_end_matches('/'), path)
    }

    /// Make a GET request
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, DashboardError> {
        let url = self.url(path);
        debug!("GET {}", url);

        let response = self.client.get(&url).send().await?;
        let response = check_status("GET", response).await?;

        let body = response.json().await?;
        Ok(body)
    }

    /// Make a POST request
    pub async fn post<T: DeserializeOwned, B: Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, DashboardError> {
        let url = self.url(path);
        debug!("POST {}", url);

        let response = self.client.post(&url).json(body).send().await?;
        let response = check_status("POST", response).await?;

        let body = response.json().await?;
        Ok(body)
    }

    /// Make a POST request whose response body is not needed
    pub async fn post_discard<B: Serialize>(
        &self,
        path: &str,
        body: Option<&B>,
    ) -> Result<(), DashboardError> {
        let url = self.url(path);
        debug!("POST {}", url);

        let mut request = self.client.post(&url);
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await?;
        check_status("POST", response).await?;
        Ok(())
    }
}

async fn check_status(method: &str, response: Response) -> Result<Response, DashboardError> {
    if response.status().is_success() {
        return Ok(response);
    }

    let status = response.status();
    let url = response.url().to_string();
    let body = response.text().await.unwrap_or_default();
    debug!("HTTP {} {} failed: {} - {}", method, url, status, body);
    Err(DashboardError::Remote {
        status: status.as_u16(),
        body,
    })
}
