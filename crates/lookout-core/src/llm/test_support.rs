//! Recording transport double shared by provider and orchestrator tests.

use super::transport::{Transport, TransportResponse};
use crate::error::TransportError;
use async_trait::async_trait;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// One request as seen by [`MockTransport`].
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: serde_json::Value,
}

/// Returns a canned result and records every call.
pub struct MockTransport {
    result: Result<TransportResponse, TransportError>,
    call_count: Arc<AtomicU32>,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

impl MockTransport {
    pub fn responding(status: u16, body: impl Into<String>) -> Self {
        Self {
            result: Ok(TransportResponse {
                status,
                body: body.into(),
            }),
            call_count: Arc::new(AtomicU32::new(0)),
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// A chat completions 200 whose first choice says `text`.
    pub fn chat_reply(text: &str) -> Self {
        let body = serde_json::json!({
            "id": "chatcmpl-test",
            "model": "gpt-4o-mini",
            "choices": [{"index": 0, "message": {"role": "assistant", "content": text}}],
        });
        Self::responding(200, body.to_string())
    }

    pub fn failing(error: TransportError) -> Self {
        Self {
            result: Err(error),
            call_count: Arc::new(AtomicU32::new(0)),
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Get a shared handle to the call counter (clone before moving the transport).
    pub fn call_count_handle(&self) -> Arc<AtomicU32> {
        self.call_count.clone()
    }

    pub fn requests_handle(&self) -> Arc<Mutex<Vec<RecordedRequest>>> {
        self.requests.clone()
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn post_json(
        &self,
        url: &str,
        headers: &[(&str, String)],
        body: &serde_json::Value,
        _timeout: Duration,
    ) -> Result<TransportResponse, TransportError> {
        self.call_count.fetch_add(1, Ordering::SeqCst);
        self.requests.lock().unwrap().push(RecordedRequest {
            url: url.to_string(),
            headers: headers
                .iter()
                .map(|(name, value)| (name.to_string(), value.clone()))
                .collect(),
            body: body.clone(),
        });
        self.result.clone()
    }
}
