use std::env;
use std::time::Duration;

use crate::error::GenerationError;

/// Environment variables checked for the provider API key, in order.
pub const API_KEY_ENV_VARS: [&str; 2] = ["COMEBACK_OPENAI_API_KEY", "OPENAI_API_KEY"];

/// Completion provider connection settings.
#[derive(Clone)]
pub struct ProviderConfig {
    /// Bearer token for the provider. Never sent to browser callers.
    pub api_key: String,
    /// Model identifier.
    pub model: String,
    /// API base URL, without the `/chat/completions` suffix.
    pub base_url: String,
    /// Deadline for one completion request.
    pub timeout: Duration,
}

impl ProviderConfig {
    /// Low-cost chat model used for plan generation.
    pub const DEFAULT_MODEL: &str = "gpt-4o-mini";
    pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
    pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

    /// Build a config with default model, URL and timeout.
    ///
    /// Fails with [`GenerationError::Configuration`] if `api_key` is blank.
    pub fn new(api_key: impl Into<String>) -> Result<Self, GenerationError> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(GenerationError::Configuration(
                "provider API key is empty".to_string(),
            ));
        }
        Ok(Self {
            api_key,
            model: Self::DEFAULT_MODEL.to_string(),
            base_url: Self::DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(Self::DEFAULT_TIMEOUT_SECS),
        })
    }

    /// Build a config from the environment.
    ///
    /// The key comes from the first non-empty variable in
    /// [`API_KEY_ENV_VARS`]; everything else uses defaults.
    pub fn from_env() -> Result<Self, GenerationError> {
        let key = api_key_from_env().ok_or_else(|| {
            GenerationError::Configuration(format!(
                "provider API key not configured; set {}",
                API_KEY_ENV_VARS.join(" or ")
            ))
        })?;
        Self::new(key)
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

impl std::fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("api_key", &"<redacted>")
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// First non-empty API key found in the environment.
pub fn api_key_from_env() -> Option<String> {
    API_KEY_ENV_VARS
        .iter()
        .filter_map(|var| env::var(var).ok())
        .find(|v| !v.trim().is_empty())
}
