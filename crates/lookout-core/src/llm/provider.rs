//! Answer provider trait and factory.
//!
//! Defines the interface every language-model backend implements, plus the
//! factory that builds the configured one.

use super::gemini::GenerativeProvider;
use super::openai::ChatCompletionProvider;
use crate::config::{ProviderConfig, ProviderKind};
use crate::types::{Answer, DetectionSet, Question};
use async_trait::async_trait;

/// Trait that all answer providers implement.
///
/// Uses `async_trait` because native async fn in trait is not object-safe
/// (we need `Box<dyn AnswerProvider>` for dynamic dispatch).
///
/// `answer` never returns `Err` and never panics: every failure is an
/// [`Answer::Failure`]. Providers make exactly one outbound attempt.
#[async_trait]
pub trait AnswerProvider: Send + Sync {
    /// Provider name for logging (e.g., "openai", "gemini").
    fn name(&self) -> &str;

    /// Model identifier sent to the remote service.
    fn model(&self) -> &str;

    /// Whether credentials are present. Does not touch the network.
    fn is_configured(&self) -> bool;

    /// Answer `question` about `detections`.
    async fn answer(&self, detections: &DetectionSet, question: &Question) -> Answer;
}

/// Factory that creates the configured provider.
pub struct ProviderFactory;

impl ProviderFactory {
    /// Build the provider named by `config.kind` with its production network client.
    pub fn create(config: &ProviderConfig) -> Box<dyn AnswerProvider> {
        tracing::debug!(
            provider = config.kind.name(),
            model = %config.model,
            "Creating answer provider"
        );
        match config.kind {
            ProviderKind::OpenAi => Box::new(ChatCompletionProvider::new(config)),
            ProviderKind::Gemini => Box::new(GenerativeProvider::new(config)),
        }
    }
}
