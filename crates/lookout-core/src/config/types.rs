//! Sub-configuration structs with their defaults.

use crate::detection::class_table::COCO_CLASSES;
use serde::{Deserialize, Serialize};

/// HTTP boundary settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Socket address to listen on
    pub bind: String,

    /// Browser origin allowed by CORS
    pub frontend_origin: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1:8000".to_string(),
            frontend_origin: "http://localhost:3000".to_string(),
        }
    }
}

/// Question answering settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct QaConfig {
    /// Active answer provider: "openai" or "gemini"
    pub provider: String,

    /// Output length bound sent to the remote model
    pub max_tokens: u32,

    /// Upper bound on one provider call in milliseconds
    pub timeout_ms: u64,

    /// Extra attempts after a transient failure. 0 means a single attempt.
    pub retry_attempts: u32,

    /// Base backoff delay in milliseconds
    pub retry_delay_ms: u64,
}

impl Default for QaConfig {
    fn default() -> Self {
        Self {
            provider: "openai".to_string(),
            max_tokens: 256,
            timeout_ms: 30_000,
            retry_attempts: 0,
            retry_delay_ms: 1000,
        }
    }
}

/// Detector settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectorConfig {
    /// Class names in detector index order
    pub class_names: Vec<String>,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            class_names: COCO_CLASSES.iter().map(|s| s.to_string()).collect(),
        }
    }
}

/// Logging settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level: error, warn, info, debug, trace
    pub level: String,

    /// Log format: "pretty" or "json"
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}

/// LLM provider configurations.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct LlmConfig {
    /// OpenAI-compatible chat completions configuration
    pub openai: Option<OpenAiConfig>,

    /// Gemini generateContent configuration
    pub gemini: Option<GeminiConfig>,
}

/// OpenAI configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenAiConfig {
    /// API key (supports ${ENV_VAR} syntax)
    pub api_key: String,

    /// Model name
    pub model: String,

    /// Chat completions URL
    pub endpoint: String,
}

impl Default for OpenAiConfig {
    fn default() -> Self {
        Self {
            api_key: "${OPENAI_API_KEY}".to_string(),
            model: "gpt-4o-mini".to_string(),
            endpoint: "https://api.openai.com/v1/chat/completions".to_string(),
        }
    }
}

/// Gemini configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeminiConfig {
    /// API key (supports ${ENV_VAR} syntax)
    pub api_key: String,

    /// Model name
    pub model: String,

    /// API base URL; `/models/{model}:generateContent` is appended
    pub endpoint: String,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            api_key: "${GEMINI_API_KEY}".to_string(),
            model: "gemini-1.5-flash".to_string(),
            endpoint: "https://generativelanguage.googleapis.com/v1beta".to_string(),
        }
    }
}
