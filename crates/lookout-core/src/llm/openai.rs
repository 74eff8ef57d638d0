//! OpenAI-compatible answer provider using the Chat Completions API.
//!
//! Detections and question go out as a single user message; the answer is the
//! first choice's message content.

use super::prompt;
use super::provider::AnswerProvider;
use super::transport::{HttpTransport, Transport};
use crate::config::ProviderConfig;
use crate::error::AnswerFailure;
use crate::types::{Answer, DetectionSet, Question};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::{Duration, Instant};

const PROVIDER: &str = "openai";

/// Chat completions provider.
pub struct ChatCompletionProvider {
    api_key: Option<String>,
    missing_key_message: String,
    model: String,
    endpoint: String,
    max_tokens: u32,
    timeout: Duration,
    transport: Arc<dyn Transport>,
}

impl ChatCompletionProvider {
    pub fn new(config: &ProviderConfig) -> Self {
        Self::with_transport(config, Arc::new(HttpTransport::new()))
    }

    /// Create with a caller-supplied transport.
    pub fn with_transport(config: &ProviderConfig, transport: Arc<dyn Transport>) -> Self {
        Self {
            api_key: config.api_key().map(String::from),
            missing_key_message: config.missing_key_message(),
            model: config.model.clone(),
            endpoint: config.endpoint.clone(),
            max_tokens: config.max_tokens,
            timeout: config.request_timeout,
            transport,
        }
    }

    fn unavailable(&self, status_code: Option<u16>, body: String) -> Answer {
        Answer::Failure(AnswerFailure::Unavailable {
            provider: PROVIDER.to_string(),
            status_code,
            body,
        })
    }
}

// --- Request types ---

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage>,
    max_tokens: u32,
}

#[derive(Serialize)]
struct ChatMessage {
    role: &'static str,
    content: String,
}

// --- Response types ---

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: Option<ChoiceMessage>,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

/// First choice's message text, if the body has one.
fn extract_content(body: &str) -> Option<String> {
    let resp: ChatResponse = serde_json::from_str(body).ok()?;
    resp.choices
        .into_iter()
        .next()?
        .message?
        .content
        .map(|text| text.trim().to_string())
        .filter(|text| !text.is_empty())
}

#[async_trait]
impl AnswerProvider for ChatCompletionProvider {
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
        let Some(api_key) = self.api_key.as_deref() else {
            return Answer::Failure(AnswerFailure::Unconfigured {
                provider: PROVIDER.to_string(),
                message: self.missing_key_message.clone(),
            });
        };

        let start = Instant::now();
        let body = ChatRequest {
            model: &self.model,
            max_tokens: self.max_tokens,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt::chat_prompt(detections, question),
            }],
        };
        let payload = match serde_json::to_value(&body) {
            Ok(payload) => payload,
            Err(e) => return self.unavailable(None, format!("Failed to encode request: {e}")),
        };

        let headers = [("Authorization", format!("Bearer {api_key}"))];
        let resp = match self
            .transport
            .post_json(&self.endpoint, &headers, &payload, self.timeout)
            .await
        {
            Ok(resp) => resp,
            Err(e) => {
                let what = if e.timed_out { "timed out" } else { "failed" };
                tracing::error!("OpenAI request {what} after {:?}: {e}", start.elapsed());
                return self.unavailable(None, e.message);
            }
        };

        if !resp.is_success() {
            tracing::error!("OpenAI HTTP {}: {}", resp.status, resp.body);
            return self.unavailable(Some(resp.status), resp.body);
        }

        let latency_ms = start.elapsed().as_millis() as u64;
        match extract_content(&resp.body) {
            Some(text) => {
                tracing::debug!(model = %self.model, latency_ms, "OpenAI answered");
                Answer::Success(text)
            }
            None => {
                tracing::warn!("OpenAI response had no message content; returning raw body");
                Answer::Failure(AnswerFailure::MalformedResponse {
                    provider: PROVIDER.to_string(),
                    raw: resp.body,
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ProviderKind;
    use crate::error::TransportError;
    use crate::llm::test_support::MockTransport;
    use crate::types::Detection;
    use std::sync::atomic::Ordering;

    fn config(api_key: Option<&str>) -> ProviderConfig {
        ProviderConfig {
            kind: ProviderKind::OpenAi,
            api_key: api_key.map(String::from),
            key_source: "${OPENAI_API_KEY}".to_string(),
            model: "gpt-4o-mini".to_string(),
            endpoint: "https://api.openai.test/v1/chat/completions".to_string(),
            max_tokens: 256,
            request_timeout: Duration::from_secs(5),
        }
    }

    fn cat() -> DetectionSet {
        DetectionSet::new(vec![Detection::new("cat", 0.92, [10.0, 10.0, 50.0, 50.0]).unwrap()])
    }

    fn question() -> Question {
        Question::new("What animal is this?").unwrap()
    }

    #[tokio::test]
    async fn test_unconfigured_makes_no_network_call() {
        let transport = MockTransport::chat_reply("should not reach");
        let calls = transport.call_count_handle();
        let provider = ChatCompletionProvider::with_transport(&config(None), Arc::new(transport));

        let answer = provider.answer(&cat(), &question()).await;

        assert_eq!(calls.load(Ordering::SeqCst), 0);
        match answer {
            Answer::Failure(AnswerFailure::Unconfigured { provider, message }) => {
                assert_eq!(provider, "openai");
                assert!(message.contains("OPENAI_API_KEY"));
            }
            other => panic!("Expected Unconfigured, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_unconfigured_message_names_configured_variable() {
        let config = ProviderConfig {
            key_source: "${TEAM_OPENAI_TOKEN}".to_string(),
            ..config(None)
        };
        let provider =
            ChatCompletionProvider::with_transport(&config, Arc::new(MockTransport::chat_reply("")));

        let reply = provider.answer(&cat(), &question()).await.into_reply().unwrap();
        assert_eq!(
            reply,
            "OpenAI API key not configured. Set TEAM_OPENAI_TOKEN in env."
        );
    }

    #[tokio::test]
    async fn test_success_sends_bounded_request() {
        let transport = MockTransport::chat_reply("  A cat.\n");
        let requests = transport.requests_handle();
        let provider =
            ChatCompletionProvider::with_transport(&config(Some("sk-test")), Arc::new(transport));

        let answer = provider.answer(&cat(), &question()).await;
        assert_eq!(answer, Answer::success("A cat."));

        let requests = requests.lock().unwrap();
        assert_eq!(requests.len(), 1);
        let request = &requests[0];
        assert_eq!(request.url, "https://api.openai.test/v1/chat/completions");
        assert!(request
            .headers
            .contains(&("Authorization".to_string(), "Bearer sk-test".to_string())));
        assert_eq!(request.body["max_tokens"], 256);
        assert_eq!(request.body["model"], "gpt-4o-mini");
        let content = request.body["messages"][0]["content"].as_str().unwrap();
        assert!(content.contains("cat"));
        assert!(content.contains("0.92"));
        assert!(content.contains("What animal is this?"));
    }

    #[tokio::test]
    async fn test_http_500_is_unavailable_with_body() {
        let transport = MockTransport::responding(500, "internal meltdown");
        let provider =
            ChatCompletionProvider::with_transport(&config(Some("sk-test")), Arc::new(transport));

        let answer = provider.answer(&cat(), &question()).await;
        assert_eq!(
            answer,
            Answer::Failure(AnswerFailure::Unavailable {
                provider: "openai".to_string(),
                status_code: Some(500),
                body: "internal meltdown".to_string(),
            })
        );
    }

    #[tokio::test]
    async fn test_connection_error_is_unavailable_without_status() {
        let transport = MockTransport::failing(TransportError::new("connection refused"));
        let provider =
            ChatCompletionProvider::with_transport(&config(Some("sk-test")), Arc::new(transport));

        match provider.answer(&cat(), &question()).await {
            Answer::Failure(AnswerFailure::Unavailable {
                status_code, body, ..
            }) => {
                assert_eq!(status_code, None);
                assert_eq!(body, "connection refused");
            }
            other => panic!("Expected Unavailable, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_missing_choices_degrades_to_raw_body() {
        let raw = r#"{"id":"chatcmpl-1","choices":[]}"#;
        let transport = MockTransport::responding(200, raw);
        let provider =
            ChatCompletionProvider::with_transport(&config(Some("sk-test")), Arc::new(transport));

        let answer = provider.answer(&cat(), &question()).await;
        assert_eq!(
            answer.failure().map(|f| f.kind()),
            Some("provider_malformed_response")
        );
        assert_eq!(answer.into_reply(), Ok(raw.to_string()));
    }

    #[tokio::test]
    async fn test_non_json_success_body_degrades_to_raw_body() {
        let transport = MockTransport::responding(200, "<html>proxy page</html>");
        let provider =
            ChatCompletionProvider::with_transport(&config(Some("sk-test")), Arc::new(transport));

        let reply = provider.answer(&cat(), &question()).await.into_reply();
        assert_eq!(reply, Ok("<html>proxy page</html>".to_string()));
    }

    #[test]
    fn test_extract_content_null_message_content() {
        let body = r#"{"choices":[{"message":{"role":"assistant","content":null}}]}"#;
        assert_eq!(extract_content(body), None);
    }
}
