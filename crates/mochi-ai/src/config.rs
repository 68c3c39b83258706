//! Agent configuration for the OpenAI-compatible endpoint.

use std::fmt;

use mochi_common::ConfigError;

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_MODEL: &str = "gpt-3.5-turbo";
pub const DEFAULT_TEMPERATURE: f64 = 0.7;
pub const DEFAULT_MAX_TOKENS: u32 = 2000;

/// Immutable per-session configuration. Replacing it means constructing a
/// new session (the transcript can be carried over, see
/// [`crate::ChatSession::resume`]).
#[derive(Clone)]
pub struct AgentConfig {
    pub base_url: String,
    pub api_key: String,
    pub model: String,
    pub temperature: f64,
    pub max_tokens: u32,
}

impl fmt::Debug for AgentConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AgentConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &"[REDACTED]")
            .field("model", &self.model)
            .field("temperature", &self.temperature)
            .field("max_tokens", &self.max_tokens)
            .finish()
    }
}

impl AgentConfig {
    /// A missing or empty API key is fatal: no partial config is created.
    pub fn new(api_key: impl Into<String>) -> Result<Self, ConfigError> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(ConfigError::MissingApiKey);
        }
        Ok(Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key,
            model: DEFAULT_MODEL.to_string(),
            temperature: DEFAULT_TEMPERATURE,
            max_tokens: DEFAULT_MAX_TOKENS,
        })
    }

    /// Create config from environment variables.
    ///
    /// Resolution order per field: `MOCHI_*` first, then the matching
    /// `OPENAI_*` variable, then the built-in default.
    pub fn from_env() -> Result<Self, ConfigError> {
        let api_key = env_either("MOCHI_API_KEY", "OPENAI_API_KEY")
            .ok_or(ConfigError::MissingApiKey)?;

        let mut config = Self::new(api_key)?;
        if let Some(url) = env_either("MOCHI_BASE_URL", "OPENAI_BASE_URL") {
            config.base_url = url;
        }
        if let Some(model) = env_either("MOCHI_MODEL", "OPENAI_MODEL") {
            config.model = model;
        }
        if let Some(raw) = std::env::var("MOCHI_TEMPERATURE").ok().filter(|s| !s.is_empty()) {
            config.temperature = raw.parse().map_err(|_| ConfigError::InvalidValue {
                field: "MOCHI_TEMPERATURE".into(),
                reason: format!("not a number: {raw}"),
            })?;
        }
        if let Some(raw) = std::env::var("MOCHI_MAX_TOKENS").ok().filter(|s| !s.is_empty()) {
            config.max_tokens = raw.parse().map_err(|_| ConfigError::InvalidValue {
                field: "MOCHI_MAX_TOKENS".into(),
                reason: format!("not an integer: {raw}"),
            })?;
        }
        Ok(config)
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_temperature(mut self, temperature: f64) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    /// Endpoint for the streaming chat completions call.
    pub fn chat_completions_url(&self) -> String {
        format!("{}/chat/completions", self.base_url.trim_end_matches('/'))
    }
}

fn env_either(primary: &str, fallback: &str) -> Option<String> {
    std::env::var(primary)
        .or_else(|_| std::env::var(fallback))
        .ok()
        .filter(|s| !s.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_api_key_is_fatal() {
        let err = AgentConfig::new("").unwrap_err();
        assert!(matches!(err, ConfigError::MissingApiKey));

        let err = AgentConfig::new("   ").unwrap_err();
        assert!(matches!(err, ConfigError::MissingApiKey));
    }

    #[test]
    fn defaults_applied() {
        let config = AgentConfig::new("sk-test").unwrap();
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.model, DEFAULT_MODEL);
        assert_eq!(config.temperature, DEFAULT_TEMPERATURE);
        assert_eq!(config.max_tokens, DEFAULT_MAX_TOKENS);
    }

    #[test]
    fn chat_completions_url_handles_trailing_slash() {
        let config = AgentConfig::new("sk-test")
            .unwrap()
            .with_base_url("https://example.com/v1/");
        assert_eq!(
            config.chat_completions_url(),
            "https://example.com/v1/chat/completions"
        );
    }

    #[test]
    fn debug_redacts_api_key() {
        let config = AgentConfig::new("sk-very-secret").unwrap();
        let rendered = format!("{config:?}");
        assert!(!rendered.contains("sk-very-secret"));
        assert!(rendered.contains("[REDACTED]"));
    }
}
