#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("missing API key: set MOCHI_API_KEY or OPENAI_API_KEY")]
    MissingApiKey,

    #[error("invalid config value for {field}: {reason}")]
    InvalidValue { field: String, reason: String },
}
