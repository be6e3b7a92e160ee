//! Anthropic Provider Implementation
//!
//! Calls the Anthropic Messages API over blocking HTTP.
//!
//! # Features
//!
//! - API key read from an environment variable
//! - Per-request timeout
//! - Retry logic with exponential backoff on network errors, rate limits
//!   and server errors
//!
//! # Examples
//!
//! ```no_run
//! use sprint_llm::AnthropicProvider;
//! use sprint_domain::traits::LlmProvider;
//!
//! let provider = AnthropicProvider::from_env("ANTHROPIC_API_KEY").unwrap();
//! let reply = provider.generate("Name three developer tools companies").unwrap();
//! ```

use crate::LlmError;
use serde::{Deserialize, Serialize};
use sprint_domain::traits::LlmProvider as LlmProviderTrait;
use std::time::Duration;
use tracing::{debug, warn};

/// Default Anthropic API endpoint
pub const DEFAULT_ENDPOINT: &str = "https://api.anthropic.com";

/// Default model
pub const DEFAULT_MODEL: &str = "claude-sonnet-4-5-20250929";

/// API version header value
pub const API_VERSION: &str = "2023-06-01";

/// Default timeout for one HTTP request (60 seconds)
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Default number of attempts
pub const DEFAULT_MAX_RETRIES: u32 = 3;

/// Upper bound on attempts per call
pub const MAX_RETRIES_LIMIT: u32 = 10;

/// Default response budget
pub const DEFAULT_MAX_TOKENS: u32 = 8000;

/// Default sampling temperature
pub const DEFAULT_TEMPERATURE: f32 = 0.3;

/// Anthropic Messages API provider
#[derive(Debug, Clone)]
pub struct AnthropicProvider {
    endpoint: String,
    model: String,
    api_key: String,
    timeout: Duration,
    max_retries: u32,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    temperature: f32,
    messages: [Message<'a>; 1],
}

#[derive(Serialize)]
struct Message<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Deserialize)]
struct MessagesResponse {
    content: Vec<ContentBlock>,
}

#[derive(Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    text: String,
}

/// Outcome of one HTTP attempt
enum Attempt {
    Done(Result<String, LlmError>),
    Retry(LlmError),
}

impl AnthropicProvider {
    /// Create a provider with an explicit API key and default settings
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            model: DEFAULT_MODEL.to_string(),
            api_key: api_key.into(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            max_retries: DEFAULT_MAX_RETRIES,
            max_tokens: DEFAULT_MAX_TOKENS,
            temperature: DEFAULT_TEMPERATURE,
        }
    }

    /// Create a provider whose key comes from the named environment variable
    pub fn from_env(var: &str) -> Result<Self, LlmError> {
        match std::env::var(var) {
            Ok(key) if !key.trim().is_empty() => Ok(Self::new(key.trim())),
            _ => Err(LlmError::MissingApiKey(var.to_string())),
        }
    }

    /// Set the API endpoint (no trailing path)
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into().trim_end_matches('/').to_string();
        self
    }

    /// Set the model
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Set the per-request timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the maximum number of attempts
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries.clamp(1, MAX_RETRIES_LIMIT);
        self
    }

    /// Set the response token budget
    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    /// Set the sampling temperature
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    fn attempt(&self, client: &reqwest::blocking::Client, prompt: &str) -> Attempt {
        let url = format!("{}/v1/messages", self.endpoint);
        let body = MessagesRequest {
            model: &self.model,
            max_tokens: self.max_tokens,
            temperature: self.temperature,
            messages: [Message {
                role: "user",
                content: prompt,
            }],
        };

        let response = match client
            .post(&url)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", API_VERSION)
            .json(&body)
            .send()
        {
            Ok(response) => response,
            Err(e) => return Attempt::Retry(LlmError::Communication(format!("Request failed: {}", e))),
        };

        let status = response.status();
        if status.is_success() {
            return Attempt::Done(match response.json::<MessagesResponse>() {
                Ok(parsed) => extract_text(parsed),
                Err(e) => Err(LlmError::InvalidResponse(format!("Failed to parse response: {}", e))),
            });
        }

        let error_text = response.text().unwrap_or_else(|_| "Unknown error".to_string());
        match status.as_u16() {
            404 => Attempt::Done(Err(LlmError::ModelNotAvailable(self.model.clone()))),
            429 => Attempt::Retry(LlmError::RateLimitExceeded),
            500..=599 => Attempt::Retry(LlmError::Communication(format!("HTTP {}: {}", status, error_text))),
            _ => Attempt::Done(Err(LlmError::Other(format!("HTTP {}: {}", status, error_text)))),
        }
    }
}

fn extract_text(response: MessagesResponse) -> Result<String, LlmError> {
    let text: String = response
        .content
        .into_iter()
        .filter(|block| block.kind == "text")
        .map(|block| block.text)
        .collect();
    if text.trim().is_empty() {
        Err(LlmError::InvalidResponse("response contained no text".to_string()))
    } else {
        Ok(text)
    }
}

impl LlmProviderTrait for AnthropicProvider {
    type Error = LlmError;

    fn generate(&self, prompt: &str) -> Result<String, Self::Error> {
        // The blocking client owns its own runtime; build and drop it on this thread.
        let client = reqwest::blocking::Client::builder()
            .timeout(self.timeout)
            .build()
            .map_err(|e| LlmError::Other(format!("Failed to build HTTP client: {}", e)))?;

        let mut attempts = 0;
        let mut last_error = None;

        while attempts < self.max_retries {
            match self.attempt(&client, prompt) {
                Attempt::Done(result) => return result,
                Attempt::Retry(e) => {
                    warn!(model = %self.model, attempt = attempts + 1, error = %e, "LLM call failed");
                    last_error = Some(e);
                }
            }

            attempts += 1;
            if attempts < self.max_retries {
                // Exponential backoff: 1s, 2s, 4s, etc.
                let delay = Duration::from_secs(2u64.saturating_pow(attempts - 1));
                debug!(?delay, "Retrying LLM call");
                std::thread::sleep(delay);
            }
        }

        Err(last_error.unwrap_or_else(|| LlmError::Communication("Max retries exceeded".to_string())))
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_defaults() {
        let provider = AnthropicProvider::new("sk-test");
        assert_eq!(provider.endpoint, DEFAULT_ENDPOINT);
        assert_eq!(provider.model, DEFAULT_MODEL);
        assert_eq!(provider.max_retries, DEFAULT_MAX_RETRIES);
        assert_eq!(provider.max_tokens, 8000);
        assert_eq!(provider.model_name(), DEFAULT_MODEL);
    }

    #[test]
    fn test_builder_methods() {
        let provider = AnthropicProvider::new("sk-test")
            .with_endpoint("http://localhost:8080/")
            .with_model("claude-haiku")
            .with_max_retries(0)
            .with_temperature(0.0);
        assert_eq!(provider.endpoint, "http://localhost:8080");
        assert_eq!(provider.model, "claude-haiku");
        assert_eq!(provider.max_retries, 1);
        assert_eq!(provider.temperature, 0.0);

        let provider = AnthropicProvider::new("sk-test").with_max_retries(u32::MAX);
        assert_eq!(provider.max_retries, MAX_RETRIES_LIMIT);
    }

    #[test]
    fn test_from_env_missing_key() {
        let err = AnthropicProvider::from_env("SPRINT_LLM_TEST_UNSET_KEY").unwrap_err();
        assert!(matches!(err, LlmError::MissingApiKey(var) if var == "SPRINT_LLM_TEST_UNSET_KEY"));
    }

    #[test]
    fn test_extract_text_joins_text_blocks() {
        let response: MessagesResponse = serde_json::from_str(
            r#"{"content": [{"type": "text", "text": "[{\"name\":"}, {"type": "tool_use"}, {"type": "text", "text": "\"Cursor\"}]"}]}"#,
        )
        .unwrap();
        assert_eq!(extract_text(response).unwrap(), r#"[{"name":"Cursor"}]"#);
    }

    #[test]
    fn test_extract_text_empty() {
        let response = MessagesResponse { content: vec![] };
        assert!(matches!(extract_text(response), Err(LlmError::InvalidResponse(_))));
    }

    #[test]
    fn test_request_body_shape() {
        let body = MessagesRequest {
            model: "m",
            max_tokens: 10,
            temperature: 0.5,
            messages: [Message { role: "user", content: "hi" }],
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["messages"][0]["role"], "user");
        assert_eq!(json["max_tokens"], 10);
    }

    #[test]
    fn test_unreachable_endpoint() {
        let provider = AnthropicProvider::new("sk-test")
            .with_endpoint("http://127.0.0.1:9")
            .with_timeout(Duration::from_secs(2))
            .with_max_retries(1);

        match provider.generate("test") {
            Err(LlmError::Communication(_)) => {}
            other => panic!("Expected Communication error, got {:?}", other),
        }
    }

    #[test]
    #[ignore] // Needs ANTHROPIC_API_KEY and network access
    fn test_anthropic_generate_integration() {
        let provider = AnthropicProvider::from_env("ANTHROPIC_API_KEY").unwrap();
        let response = provider.generate("Say 'hello' and nothing else").unwrap();
        assert!(!response.is_empty());
    }
}
