//! Lookout Core - question answering over object detections.
//!
//! Lookout takes the raw boxes an object detector produced for an image and a
//! free-text question, and answers the question with a remote language model.
//!
//! # Architecture
//!
//! ```text
//! raw boxes → Normalizer → DetectionSet ─┐
//!                                        ├→ QaService → AnswerProvider → Answer
//!                              Question ─┘
//! ```
//!
//! Exactly one [`AnswerProvider`](llm::AnswerProvider) is active, chosen by
//! [`ProviderConfig`] at startup.
//!
//! # Usage
//!
//! ```rust,ignore
//! use lookout_core::{Config, Lookout, Question};
//!
//! #[tokio::main]
//! async fn main() -> lookout_core::Result<()> {
//!     let lookout = Lookout::new(Config::load()?, None, None)?;
//!     let raw: Vec<serde_json::Value> = serde_json::from_str(DETECTOR_JSON)?;
//!     let detections = lookout.normalize(&raw);
//!     let answer = lookout.ask(&detections, &Question::new("What animal is this?")?).await;
//!     println!("{:?}", answer.into_reply());
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod detection;
pub mod error;
pub mod llm;
pub mod qa;
pub mod types;

// Re-exports for convenient access
pub use config::{Config, ProviderConfig, ProviderKind};
pub use detection::{ClassTable, NormalizeReport, Normalizer, RawBox, RawDetection};
pub use error::{
    AnswerFailure, ConfigError, DetectionError, LookoutError, QuestionError, Result,
    TransportError,
};
pub use llm::{AnswerProvider, ProviderFactory};
pub use qa::{AskOptions, QaService};
pub use types::{Answer, Detection, DetectionSet, Question};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// The wired-up pipeline: normalizer plus orchestrator over the configured provider.
#[derive(Clone)]
pub struct Lookout {
    normalizer: Normalizer,
    qa: QaService,
}

impl Lookout {
    /// Build from configuration, resolving the active provider once.
    ///
    /// `provider_override` and `model_override` take precedence over the
    /// `[qa] provider` setting and the provider's configured model.
    pub fn new(
        config: Config,
        provider_override: Option<&str>,
        model_override: Option<&str>,
    ) -> Result<Self> {
        let provider_config =
            ProviderConfig::from_config(&config, provider_override, model_override)?;
        if provider_config.api_key().is_none() {
            tracing::warn!(
                "No API key for {}; questions will be answered with a configuration message. {}",
                provider_config.kind.name(),
                provider_config.missing_key_message()
            );
        }

        let provider = ProviderFactory::create(&provider_config);
        let qa = QaService::new(provider, AskOptions::from(&config.qa));
        Ok(Self::from_parts(Normalizer::new(config.class_table()), qa))
    }

    /// Assemble from already-built parts (custom providers, tests).
    pub fn from_parts(normalizer: Normalizer, qa: QaService) -> Self {
        tracing::debug!("Initializing Lookout v{}", VERSION);
        Self { normalizer, qa }
    }

    pub fn normalizer(&self) -> &Normalizer {
        &self.normalizer
    }

    pub fn qa(&self) -> &QaService {
        &self.qa
    }

    /// Normalize one image's raw detector output.
    pub fn normalize<R: RawDetection>(&self, raw_boxes: &[R]) -> DetectionSet {
        self.normalizer.normalize(raw_boxes)
    }

    /// Ask a question about already-normalized detections.
    pub async fn ask(&self, detections: &DetectionSet, question: &Question) -> Answer {
        self.qa.ask(detections, question).await
    }
}
