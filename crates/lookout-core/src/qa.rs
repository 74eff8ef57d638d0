//! Question answering over normalized detections.
//!
//! [`QaService`] hands an already-normalized [`DetectionSet`] and a question to
//! whichever [`AnswerProvider`] it was built with. It does not normalize,
//! rewrite prompts or post-process answers; it only bounds the wait and,
//! when configured, retries transient failures.

use crate::config::QaConfig;
use crate::error::AnswerFailure;
use crate::llm::retry;
use crate::llm::AnswerProvider;
use crate::types::{Answer, DetectionSet, Question};
use std::sync::Arc;
use std::time::Duration;

/// Per-call limits for the orchestrator.
#[derive(Debug, Clone)]
pub struct AskOptions {
    /// Upper bound on a single provider call in milliseconds
    pub timeout_ms: u64,
    /// Extra attempts after a retryable failure (0 = single attempt)
    pub retry_attempts: u32,
    /// Base backoff delay in milliseconds
    pub retry_delay_ms: u64,
}

impl Default for AskOptions {
    fn default() -> Self {
        Self {
            timeout_ms: 30_000,
            retry_attempts: 0,
            retry_delay_ms: 1000,
        }
    }
}

impl From<&QaConfig> for AskOptions {
    fn from(config: &QaConfig) -> Self {
        Self {
            timeout_ms: config.timeout_ms,
            retry_attempts: config.retry_attempts,
            retry_delay_ms: config.retry_delay_ms,
        }
    }
}

/// Provider-agnostic Q&A orchestrator.
///
/// Cheap to clone and safe to share across concurrent requests; it holds no
/// mutable state.
#[derive(Clone)]
pub struct QaService {
    provider: Arc<dyn AnswerProvider>,
    options: AskOptions,
}

impl QaService {
    pub fn new(provider: Box<dyn AnswerProvider>, options: AskOptions) -> Self {
        Self {
            provider: Arc::from(provider),
            options,
        }
    }

    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }

    pub fn model(&self) -> &str {
        self.provider.model()
    }

    pub fn is_configured(&self) -> bool {
        self.provider.is_configured()
    }

    /// Ask the configured provider about `detections`.
    ///
    /// Dropping the returned future abandons the in-flight call.
    pub async fn ask(&self, detections: &DetectionSet, question: &Question) -> Answer {
        let timeout = Duration::from_millis(self.options.timeout_ms);
        let mut answer = self.attempt(detections, question, timeout).await;

        for attempt in 1..=self.options.retry_attempts {
            match answer.failure() {
                Some(failure) if retry::is_retryable(failure) => {}
                _ => break,
            }
            let delay = retry::backoff_duration(attempt - 1, self.options.retry_delay_ms);
            tracing::debug!(
                "Retry {attempt}/{} with {} after {delay:?}",
                self.options.retry_attempts,
                self.provider.name()
            );
            tokio::time::sleep(delay).await;
            answer = self.attempt(detections, question, timeout).await;
        }

        if let Some(failure) = answer.failure() {
            tracing::warn!(kind = failure.kind(), "Question not answered cleanly: {failure}");
        }
        answer
    }

    async fn attempt(
        &self,
        detections: &DetectionSet,
        question: &Question,
        timeout: Duration,
    ) -> Answer {
        match tokio::time::timeout(timeout, self.provider.answer(detections, question)).await {
            Ok(answer) => answer,
            Err(_) => Answer::Failure(AnswerFailure::Unavailable {
                provider: self.provider.name().to_string(),
                status_code: None,
                body: format!("Timeout after {}ms", self.options.timeout_ms),
            }),
        }
    }
}
