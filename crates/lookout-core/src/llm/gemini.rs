//! Gemini answer provider using the generateContent API.
//!
//! The generation call is synchronous. The provider runs it on tokio's
//! blocking pool so request handling on the async workers is never stalled.

use super::prompt;
use super::provider::AnswerProvider;
use super::transport::TransportResponse;
use crate::config::ProviderConfig;
use crate::error::{AnswerFailure, TransportError};
use crate::types::{Answer, DetectionSet, Question};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::{Duration, Instant};

const PROVIDER: &str = "gemini";

/// One generation call.
#[derive(Debug, Clone)]
pub struct GenerateRequest {
    pub api_key: String,
    pub model: String,
    pub prompt: String,
    pub max_output_tokens: u32,
}

/// Synchronous text generation entry point.
pub trait GenerateBackend: Send + Sync {
    fn generate_content(&self, request: &GenerateRequest)
        -> Result<TransportResponse, TransportError>;
}

/// Blocking HTTP client for `models/{model}:generateContent`.
pub struct GeminiBackend {
    endpoint: String,
    timeout: Duration,
}

impl GeminiBackend {
    pub fn new(endpoint: &str, timeout: Duration) -> Self {
        Self {
            endpoint: endpoint.trim_end_matches('/').to_string(),
            timeout,
        }
    }
}

// --- Request types ---

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
    contents: Vec<Content<'a>>,
    generation_config: GenerationConfig,
}

#[derive(Serialize)]
struct Content<'a> {
    role: &'static str,
    parts: Vec<Part<'a>>,
}

#[derive(Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    max_output_tokens: u32,
}

// --- Response types ---

#[derive(Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

impl GenerateBackend for GeminiBackend {
    fn generate_content(
        &self,
        request: &GenerateRequest,
    ) -> Result<TransportResponse, TransportError> {
        let url = format!("{}/models/{}:generateContent", self.endpoint, request.model);
        let body = GenerateContentRequest {
            contents: vec![Content {
                role: "user",
                parts: vec![Part {
                    text: &request.prompt,
                }],
            }],
            generation_config: GenerationConfig {
                max_output_tokens: request.max_output_tokens,
            },
        };

        // Built per call on the worker thread: the blocking client owns a
        // runtime and must not be dropped from async context.
        let client = reqwest::blocking::Client::builder()
            .timeout(self.timeout)
            .build()?;
        let resp = client
            .post(&url)
            .header("x-goog-api-key", &request.api_key)
            .json(&body)
            .send()?;

        let status = resp.status().as_u16();
        let body = resp.text()?;
        Ok(TransportResponse { status, body })
    }
}

/// Concatenated text of the first candidate, if present.
fn extract_text(body: &str) -> Option<String> {
    let resp: GenerateContentResponse = serde_json::from_str(body).ok()?;
    let content = resp.candidates.into_iter().next()?.content?;
    let text = content
        .parts
        .into_iter()
        .filter_map(|part| part.text)
        .collect::<Vec<_>>()
        .join("");
    let text = text.trim();
    (!text.is_empty()).then(|| text.to_string())
}

/// Answer provider over a [`GenerateBackend`].
pub struct GenerativeProvider {
    api_key: Option<String>,
    missing_key_message: String,
    model: String,
    max_tokens: u32,
    backend: Arc<dyn GenerateBackend>,
}

impl GenerativeProvider {
    pub fn new(config: &ProviderConfig) -> Self {
        let backend = GeminiBackend::new(&config.endpoint, config.request_timeout);
        Self::with_backend(config, Arc::new(backend))
    }

    /// Create with a caller-supplied generation backend.
    pub fn with_backend(config: &ProviderConfig, backend: Arc<dyn GenerateBackend>) -> Self {
        Self {
            api_key: config.api_key().map(String::from),
            missing_key_message: config.missing_key_message(),
            model: config.model.clone(),
            max_tokens: config.max_tokens,
            backend,
        }
    }

    fn unavailable(status_code: Option<u16>, body: String) -> Answer {
        Answer::Failure(AnswerFailure::Unavailable {
            provider: PROVIDER.to_string(),
            status_code,
            body,
        })
    }
}

#[async_trait]
impl AnswerProvider for GenerativeProvider {
    fn name(&self) -> &str {
        PROVIDER
    }

    fn model(&self) -> &str {
        &self.model
    }

    fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    async fn answer(&self, detections: &DetectionSet, question: &Question) -> Answer {
        let Some(api_key) = self.api_key.clone() else {
            return Answer::Failure(AnswerFailure::Unconfigured {
                provider: PROVIDER.to_string(),
                message: self.missing_key_message.clone(),
            });
        };

        let request = GenerateRequest {
            api_key,
            model: self.model.clone(),
            prompt: prompt::generative_prompt(detections, question),
            max_output_tokens: self.max_tokens,
        };

        let start = Instant::now();
        let backend = self.backend.clone();
        let result =
            tokio::task::spawn_blocking(move || backend.generate_content(&request)).await;

        let resp = match result {
            Ok(Ok(resp)) => resp,
            Ok(Err(e)) => {
                let what = if e.timed_out { "timed out" } else { "failed" };
                tracing::error!("Gemini request {what}: {e}");
                return Self::unavailable(None, e.message);
            }
            Err(e) => {
                tracing::error!("Gemini worker task failed: {e}");
                return Self::unavailable(None, format!("Generation worker failed: {e}"));
            }
        };

        if !resp.is_success() {
            tracing::error!("Gemini HTTP {}: {}", resp.status, resp.body);
            return Self::unavailable(Some(resp.status), resp.body);
        }

        let latency_ms = start.elapsed().as_millis() as u64;
        match extract_text(&resp.body) {
            Some(text) => {
                tracing::debug!(model = %self.model, latency_ms, "Gemini answered");
                Answer::Success(text)
            }
            None => {
                tracing::warn!("Gemini response had no candidate text; returning raw body");
                Answer::Failure(AnswerFailure::MalformedResponse {
                    provider: PROVIDER.to_string(),
                    raw: resp.body,
                })
            }
        }
    }
}
