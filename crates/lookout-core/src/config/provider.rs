//! The resolved, read-only view of which answer provider is active.

use super::Config;
use crate::error::ConfigError;
use std::time::Duration;

/// Supported answer provider backends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderKind {
    /// OpenAI-compatible chat completions
    OpenAi,
    /// Gemini generateContent, run on a blocking worker
    Gemini,
}

impl ProviderKind {
    pub fn parse(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "openai" => Some(ProviderKind::OpenAi),
            "gemini" => Some(ProviderKind::Gemini),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            ProviderKind::OpenAi => "openai",
            ProviderKind::Gemini => "gemini",
        }
    }

    /// Vendor name for user-facing messages.
    pub fn display_name(&self) -> &'static str {
        match self {
            ProviderKind::OpenAi => "OpenAI",
            ProviderKind::Gemini => "Gemini",
        }
    }
}

/// Everything a provider needs, resolved once at startup.
///
/// `api_key` stays optional: a missing key is reported per call as
/// `Unconfigured`, not at startup.
#[derive(Debug, Clone)]
pub struct ProviderConfig {
    pub kind: ProviderKind,
    pub api_key: Option<String>,
    /// The `api_key` value as written in the config file, e.g. `${OPENAI_API_KEY}`.
    pub key_source: String,
    pub model: String,
    pub endpoint: String,
    pub max_tokens: u32,
    pub request_timeout: Duration,
}

impl ProviderConfig {
    /// Resolve the active provider from the loaded configuration.
    ///
    /// `provider_override` and `model_override` come from CLI flags.
    pub fn from_config(
        config: &Config,
        provider_override: Option<&str>,
        model_override: Option<&str>,
    ) -> Result<Self, ConfigError> {
        let name = provider_override.unwrap_or(&config.qa.provider);
        let kind = ProviderKind::parse(name).ok_or_else(|| {
            ConfigError::ValidationError(format!("Unknown answer provider: {name}"))
        })?;

        let (api_key, model, endpoint) = match kind {
            ProviderKind::OpenAi => {
                let cfg = config.llm.openai.clone().unwrap_or_default();
                (cfg.api_key, cfg.model, cfg.endpoint)
            }
            ProviderKind::Gemini => {
                let cfg = config.llm.gemini.clone().unwrap_or_default();
                (cfg.api_key, cfg.model, cfg.endpoint)
            }
        };

        Ok(Self {
            kind,
            api_key: resolve_env_var(&api_key),
            key_source: api_key,
            model: model_override.map(String::from).unwrap_or(model),
            endpoint: endpoint.trim_end_matches('/').to_string(),
            max_tokens: config.qa.max_tokens,
            request_timeout: Duration::from_millis(config.qa.timeout_ms),
        })
    }

    /// API key, if one is present and non-blank.
    pub fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref().filter(|key| !key.trim().is_empty())
    }

    /// What the user should do about a missing key, following where the
    /// config told us to look for it.
    pub fn missing_key_message(&self) -> String {
        let vendor = self.kind.display_name();
        match env_var_name(&self.key_source) {
            Some(var) => format!("{vendor} API key not configured. Set {var} in env."),
            None => format!(
                "{vendor} API key not configured. Set api_key under [llm.{}] in the config file.",
                self.kind.name()
            ),
        }
    }
}

/// `VAR` for a `${VAR}` reference.
fn env_var_name(value: &str) -> Option<&str> {
    value
        .strip_prefix("${")
        .and_then(|rest| rest.strip_suffix('}'))
        .filter(|name| !name.is_empty())
}

/// Resolve `${ENV_VAR}` references in config strings.
pub fn resolve_env_var(value: &str) -> Option<String> {
    if let Some(var_name) = env_var_name(value) {
        std::env::var(var_name).ok()
    } else if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}
