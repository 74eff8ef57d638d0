//! Configuration validation with range checks.

use crate::error::ConfigError;

use super::{Config, ProviderKind};

impl Config {
    /// Validate configuration values are within acceptable ranges.
    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        if ProviderKind::parse(&self.qa.provider).is_none() {
            return Err(ConfigError::ValidationError(format!(
                "qa.provider must be \"openai\" or \"gemini\", got \"{}\"",
                self.qa.provider
            )));
        }
        if self.qa.max_tokens == 0 {
            return Err(ConfigError::ValidationError(
                "qa.max_tokens must be > 0".into(),
            ));
        }
        if self.qa.timeout_ms == 0 {
            return Err(ConfigError::ValidationError(
                "qa.timeout_ms must be > 0".into(),
            ));
        }
        if self.detector.class_names.is_empty() {
            return Err(ConfigError::ValidationError(
                "detector.class_names must not be empty".into(),
            ));
        }
        if self.server.bind.parse::<std::net::SocketAddr>().is_err() {
            return Err(ConfigError::ValidationError(format!(
                "server.bind is not a socket address: {}",
                self.server.bind
            )));
        }
        Ok(())
    }
}
