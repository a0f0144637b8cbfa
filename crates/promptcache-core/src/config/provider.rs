//! Provider credentials and generation parameters

use crate::error::{PromptCacheError, PromptCacheResult};
use crate::llm::request::GenerationParams;
use serde::{Deserialize, Serialize};

/// Default model when none is configured
pub const DEFAULT_MODEL: &str = "claude-sonnet-4-20250514";

/// Default Messages API version header value
pub const DEFAULT_API_VERSION: &str = "2023-06-01";

/// Settings for the remote model provider
#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderSettings {
    /// API key used by the transport
    pub api_key: Option<String>,
    /// Model identifier sent with every request
    pub model: String,
    /// Maximum tokens to generate (required by the Messages API)
    pub max_tokens: u32,
    pub temperature: Option<f32>,
    pub top_p: Option<f32>,
    pub stop_sequences: Vec<String>,
    pub api_version: String,
}

impl Default for ProviderSettings {
    fn default() -> Self {
        Self {
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            max_tokens: 4096,
            temperature: None,
            top_p: None,
            stop_sequences: Vec::new(),
            api_version: DEFAULT_API_VERSION.to_string(),
        }
    }
}

impl std::fmt::Debug for ProviderSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderSettings")
            .field("api_key", &self.masked_api_key())
            .field("model", &self.model)
            .field("max_tokens", &self.max_tokens)
            .field("temperature", &self.temperature)
            .field("top_p", &self.top_p)
            .field("stop_sequences", &self.stop_sequences)
            .field("api_version", &self.api_version)
            .finish()
    }
}

impl ProviderSettings {
    /// Set API key
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Set model
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Display-safe form of the key
    pub fn masked_api_key(&self) -> Option<String> {
        self.api_key.as_deref().map(mask_api_key)
    }

    /// Validate credentials and parameters.
    ///
    /// Called at startup; a failure here is fatal and no request is accepted.
    pub fn validate(&self) -> PromptCacheResult<()> {
        let key = self.api_key.as_deref().map(str::trim).unwrap_or_default();
        if key.is_empty() {
            return Err(PromptCacheError::config_with_context(
                "Missing provider API key",
                "Set PROMPTCACHE_API_KEY or ANTHROPIC_API_KEY, or add provider.api_key to the config file",
            ));
        }
        if self
            .api_key
            .as_deref()
            .is_some_and(|k| k.chars().any(char::is_whitespace))
        {
            return Err(PromptCacheError::config(
                "Invalid provider API key: contains whitespace",
            ));
        }
        if self.model.trim().is_empty() {
            return Err(PromptCacheError::config("Model identifier must not be empty"));
        }
        if self.max_tokens == 0 {
            return Err(PromptCacheError::config("max_tokens must be greater than 0"));
        }
        if let Some(temperature) = self.temperature {
            if !(0.0..=1.0).contains(&temperature) {
                return Err(PromptCacheError::config(format!(
                    "temperature must be within [0, 1], got {}",
                    temperature
                )));
            }
        }
        Ok(())
    }

    /// Generation parameters for outbound requests
    pub fn generation_params(&self) -> GenerationParams {
        GenerationParams {
            max_tokens: self.max_tokens,
            temperature: self.temperature,
            top_p: self.top_p,
            stop_sequences: self.stop_sequences.clone(),
        }
    }
}

/// Mask an API key for display, keeping a short prefix and suffix
pub fn mask_api_key(key: &str) -> String {
    let chars: Vec<char> = key.chars().collect();
    let len = chars.len();
    if len <= 12 {
        return "*".repeat(len);
    }

    let prefix: String = chars[..8].iter().collect();
    let suffix: String = chars[len - 4..].iter().collect();
    format!("{}{}...{}", prefix, "*".repeat((len - 12).min(8)), suffix)
}
