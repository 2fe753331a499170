//! Configuration validation with range checks.

use crate::error::ConfigError;

use super::Config;

impl Config {
    /// Validate configuration values are within acceptable ranges.
    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        if self.llm.endpoint.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "llm.endpoint must not be empty".into(),
            ));
        }
        if self.llm.model.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "llm.model must not be empty".into(),
            ));
        }
        if self.llm.timeout_ms == Some(0) {
            return Err(ConfigError::ValidationError(
                "llm.timeout_ms must be > 0 when set".into(),
            ));
        }
        if self.llm.retry_attempts > 0 && self.llm.retry_delay_ms == 0 {
            return Err(ConfigError::ValidationError(
                "llm.retry_delay_ms must be > 0 when retries are enabled".into(),
            ));
        }
        if !matches!(self.logging.format.as_str(), "pretty" | "json") {
            return Err(ConfigError::ValidationError(format!(
                "logging.format must be \"pretty\" or \"json\", got \"{}\"",
                self.logging.format
            )));
        }
        Ok(())
    }
}
