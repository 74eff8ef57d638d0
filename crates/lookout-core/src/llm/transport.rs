//! Outbound HTTP seam for async providers.
//!
//! Providers send their one request through a [`Transport`] so the network
//! client can be swapped for a recording double in tests.

use crate::error::TransportError;
use async_trait::async_trait;
use std::time::Duration;

/// Status and body of a completed HTTP exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportResponse {
    pub status: u16,
    pub body: String,
}

impl TransportResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Sends a JSON POST and returns whatever came back.
///
/// Non-2xx statuses are a successful exchange here; classifying them is the
/// provider's job.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn post_json(
        &self,
        url: &str,
        headers: &[(&str, String)],
        body: &serde_json::Value,
        timeout: Duration,
    ) -> Result<TransportResponse, TransportError>;
}

/// [`Transport`] backed by a shared `reqwest::Client`.
#[derive(Debug, Clone, Default)]
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn post_json(
        &self,
        url: &str,
        headers: &[(&str, String)],
        body: &serde_json::Value,
        timeout: Duration,
    ) -> Result<TransportResponse, TransportError> {
        let mut request = self.client.post(url).json(body).timeout(timeout);
        for (name, value) in headers {
            request = request.header(*name, value);
        }

        let resp = request.send().await?;
        let status = resp.status().as_u16();
        let body = resp.text().await?;
        Ok(TransportResponse { status, body })
    }
}
