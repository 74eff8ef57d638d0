//! Error types for Lookout.
//!
//! Configuration and I/O problems are ordinary `Result` errors. Answer provider
//! failures are not: they travel inside [`crate::Answer`] as an
//! [`AnswerFailure`] so callers can always render something deterministic.

use thiserror::Error;

/// Top-level error type for Lookout operations.
#[derive(Error, Debug)]
pub enum LookoutError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Question validation errors
    #[error("Invalid question: {0}")]
    Question(#[from] QuestionError),

    /// General I/O errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read the config file from disk
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    /// Failed to parse TOML configuration
    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    /// Configuration values are invalid
    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

/// A detection that cannot satisfy the canonical invariants.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetectionError {
    #[error("label is blank")]
    BlankLabel,

    #[error("confidence is not a finite number")]
    NonFiniteConfidence,

    #[error("bounding box has a non-finite coordinate")]
    NonFiniteBox,
}

/// Rejected user question.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum QuestionError {
    #[error("question is required")]
    Empty,
}

/// A failed outbound call, before any HTTP status was received.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct TransportError {
    pub message: String,
    /// True when the client gave up waiting rather than the connection failing.
    pub timed_out: bool,
}

impl TransportError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            timed_out: false,
        }
    }
}

impl From<reqwest::Error> for TransportError {
    fn from(e: reqwest::Error) -> Self {
        Self {
            timed_out: e.is_timeout(),
            message: e.to_string(),
        }
    }
}

/// Typed failure from an answer provider.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AnswerFailure {
    /// Credentials were absent at call time. No request was sent.
    #[error("{provider} is not configured: {message}")]
    Unconfigured { provider: String, message: String },

    /// The remote call failed at the transport level or returned a non-2xx status.
    /// `body` is the upstream response text (or client diagnostic) verbatim.
    #[error("{provider} unavailable{}: {body}", status_suffix(.status_code))]
    Unavailable {
        provider: String,
        status_code: Option<u16>,
        body: String,
    },

    /// The remote call succeeded but the answer field was missing.
    /// `raw` holds the whole response body as text.
    #[error("{provider} returned an unexpected response shape")]
    MalformedResponse { provider: String, raw: String },
}

fn status_suffix(status_code: &Option<u16>) -> String {
    status_code
        .map(|code| format!(" (HTTP {code})"))
        .unwrap_or_default()
}

impl AnswerFailure {
    /// Short machine-readable tag, used by the HTTP boundary.
    pub fn kind(&self) -> &'static str {
        match self {
            AnswerFailure::Unconfigured { .. } => "provider_unconfigured",
            AnswerFailure::Unavailable { .. } => "provider_unavailable",
            AnswerFailure::MalformedResponse { .. } => "provider_malformed_response",
        }
    }

    pub fn provider(&self) -> &str {
        match self {
            AnswerFailure::Unconfigured { provider, .. }
            | AnswerFailure::Unavailable { provider, .. }
            | AnswerFailure::MalformedResponse { provider, .. } => provider,
        }
    }
}

/// Convenience type alias for Lookout results.
pub type Result<T> = std::result::Result<T, LookoutError>;
