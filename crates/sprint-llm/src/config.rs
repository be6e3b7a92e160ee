//! Provider selection and settings

use crate::anthropic::{self, AnthropicProvider};
use crate::{LlmError, MockProvider};
use serde::{Deserialize, Serialize};
use sprint_domain::traits::LlmProvider;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

/// A provider shareable across request handlers and blocking tasks
pub type SharedProvider = Arc<dyn LlmProvider<Error = LlmError> + Send + Sync>;

/// Which backend answers prompts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    /// Anthropic Messages API
    #[default]
    Anthropic,
    /// Canned responses, no network
    Mock,
}

/// The `[llm]` configuration section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// Backend
    pub provider: ProviderKind,

    /// API base URL
    pub endpoint: String,

    /// Model identifier
    pub model: String,

    /// Environment variable holding the API key
    pub api_key_env: String,

    /// Timeout for one HTTP request (seconds)
    pub timeout_secs: u64,

    /// Attempts per call, including the first
    pub max_retries: u32,

    /// Response token budget
    pub max_tokens: u32,

    /// Sampling temperature
    pub temperature: f32,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: ProviderKind::Anthropic,
            endpoint: anthropic::DEFAULT_ENDPOINT.to_string(),
            model: anthropic::DEFAULT_MODEL.to_string(),
            api_key_env: "ANTHROPIC_API_KEY".to_string(),
            timeout_secs: anthropic::DEFAULT_TIMEOUT_SECS,
            max_retries: anthropic::DEFAULT_MAX_RETRIES,
            max_tokens: anthropic::DEFAULT_MAX_TOKENS,
            temperature: anthropic::DEFAULT_TEMPERATURE,
        }
    }
}

impl LlmConfig {
    /// Mock provider settings for tests and offline demos
    pub fn mock() -> Self {
        Self {
            provider: ProviderKind::Mock,
            ..Self::default()
        }
    }

    /// Get the request timeout as a Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.timeout_secs == 0 {
            return Err("llm.timeout_secs must be greater than 0".to_string());
        }
        if !(1..=anthropic::MAX_RETRIES_LIMIT).contains(&self.max_retries) {
            return Err(format!(
                "llm.max_retries must be within 1 and {}",
                anthropic::MAX_RETRIES_LIMIT
            ));
        }
        if self.max_tokens == 0 {
            return Err("llm.max_tokens must be greater than 0".to_string());
        }
        if !(0.0..=1.0).contains(&self.temperature) {
            return Err("llm.temperature must be within 0.0 and 1.0".to_string());
        }
        if self.provider == ProviderKind::Anthropic {
            if self.model.trim().is_empty() {
                return Err("llm.model must not be empty".to_string());
            }
            if self.api_key_env.trim().is_empty() {
                return Err("llm.api_key_env must not be empty".to_string());
            }
        }
        Ok(())
    }

    /// Build the configured provider
    ///
    /// Fails with `LlmError::MissingApiKey` when the Anthropic key variable
    /// is unset.
    pub fn build_provider(&self) -> Result<SharedProvider, LlmError> {
        match self.provider {
            ProviderKind::Mock => {
                info!("Using mock LLM provider");
                Ok(Arc::new(MockProvider::default()))
            }
            ProviderKind::Anthropic => {
                let provider = AnthropicProvider::from_env(&self.api_key_env)?
                    .with_endpoint(self.endpoint.clone())
                    .with_model(self.model.clone())
                    .with_timeout(self.timeout())
                    .with_max_retries(self.max_retries)
                    .with_max_tokens(self.max_tokens)
                    .with_temperature(self.temperature);
                info!(model = %self.model, endpoint = %self.endpoint, "Using Anthropic provider");
                Ok(Arc::new(provider))
            }
        }
    }
}
