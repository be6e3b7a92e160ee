//! Thesis Sprint LLM Provider Layer
//!
//! Implementations of the `LlmProvider` trait from `sprint-domain`.
//!
//! # Providers
//!
//! - `MockProvider`: Deterministic mock for testing
//! - `AnthropicProvider`: Anthropic Messages API over blocking HTTP
//!
//! Providers are synchronous. Async callers run them on
//! `tokio::task::spawn_blocking`.
//!
//! # Examples
//!
//! ```
//! use sprint_llm::MockProvider;
//! use sprint_domain::traits::LlmProvider;
//!
//! let provider = MockProvider::new("[]");
//! let result = provider.generate("find companies").unwrap();
//! assert_eq!(result, "[]");
//! ```

#![warn(missing_docs)]

pub mod anthropic;
pub mod config;

use sprint_domain::traits::LlmProvider as LlmProviderTrait;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use thiserror::Error;

pub use anthropic::AnthropicProvider;
pub use config::{LlmConfig, ProviderKind, SharedProvider};

/// Errors that can occur during LLM operations
#[derive(Error, Debug)]
pub enum LlmError {
    /// Network or API communication error
    #[error("Communication error: {0}")]
    Communication(String),

    /// Invalid response from LLM
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Rate limit exceeded
    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    /// Model not available
    #[error("Model not available: {0}")]
    ModelNotAvailable(String),

    /// API key environment variable unset or empty
    #[error("API key not set: {0}")]
    MissingApiKey(String),

    /// Generic error
    #[error("LLM error: {0}")]
    Other(String),
}

impl LlmError {
    /// Whether repeating the same call could succeed
    pub fn is_retryable(&self) -> bool {
        matches!(self, LlmError::Communication(_) | LlmError::RateLimitExceeded)
    }
}

#[derive(Debug)]
enum Canned {
    Reply(String),
    Fail,
}

/// Mock LLM provider for deterministic testing
///
/// Returns pre-configured responses without making any network calls. A
/// registered response is used when its key occurs anywhere in the prompt,
/// so tests can key on a company name without reproducing the whole prompt.
///
/// # Examples
///
/// ```
/// use sprint_llm::MockProvider;
/// use sprint_domain::traits::LlmProvider;
///
/// let mut provider = MockProvider::default();
/// provider.add_response("Cursor", r#"{"sources": []}"#);
/// provider.add_error("Codeium");
/// assert_eq!(provider.generate("Research Cursor").unwrap(), r#"{"sources": []}"#);
/// assert!(provider.generate("Research Codeium").is_err());
/// ```
#[derive(Debug, Clone)]
pub struct MockProvider {
    default_response: String,
    responses: Arc<Mutex<Vec<(String, Canned)>>>,
    call_count: Arc<Mutex<usize>>,
    delay: Option<Duration>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl MockProvider {
    /// Create a new MockProvider with a fixed response for all prompts
    pub fn new(response: impl Into<String>) -> Self {
        Self {
            default_response: response.into(),
            responses: Arc::new(Mutex::new(Vec::new())),
            call_count: Arc::new(Mutex::new(0)),
            delay: None,
        }
    }

    /// Sleep before every reply
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Reply with `response` to prompts containing `key`
    ///
    /// Earlier registrations win when several keys match.
    pub fn add_response(&mut self, key: impl Into<String>, response: impl Into<String>) {
        lock(&self.responses).push((key.into(), Canned::Reply(response.into())));
    }

    /// Fail prompts containing `key` with a communication error
    pub fn add_error(&mut self, key: impl Into<String>) {
        lock(&self.responses).push((key.into(), Canned::Fail));
    }

    /// Get the number of times generate was called
    pub fn call_count(&self) -> usize {
        *lock(&self.call_count)
    }

    /// Reset the call count
    pub fn reset_call_count(&self) {
        *lock(&self.call_count) = 0;
    }
}

impl Default for MockProvider {
    fn default() -> Self {
        Self::new("[]")
    }
}

impl LlmProviderTrait for MockProvider {
    type Error = LlmError;

    fn generate(&self, prompt: &str) -> Result<String, Self::Error> {
        *lock(&self.call_count) += 1;

        if let Some(delay) = self.delay {
            std::thread::sleep(delay);
        }

        let responses = lock(&self.responses);
        match responses.iter().find(|(key, _)| prompt.contains(key.as_str())) {
            Some((_, Canned::Reply(response))) => Ok(response.clone()),
            Some((key, Canned::Fail)) => Err(LlmError::Communication(format!("mock failure for '{}'", key))),
            None => Ok(self.default_response.clone()),
        }
    }

    fn model_name(&self) -> &str {
        "mock"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_provider_default() {
        let provider = MockProvider::new("Test response");
        assert_eq!(provider.generate("any prompt").unwrap(), "Test response");
        assert_eq!(provider.model_name(), "mock");
    }

    #[test]
    fn test_mock_provider_matches_substrings() {
        let mut provider = MockProvider::default();
        provider.add_response("Cursor", "cursor reply");
        provider.add_response("Replit", "replit reply");

        assert_eq!(provider.generate("Research Cursor (cursor.com)").unwrap(), "cursor reply");
        assert_eq!(provider.generate("Research Replit").unwrap(), "replit reply");
        assert_eq!(provider.generate("Research Codeium").unwrap(), "[]");
    }

    #[test]
    fn test_first_registration_wins() {
        let mut provider = MockProvider::default();
        provider.add_response("Series", "first");
        provider.add_response("Series B", "second");
        assert_eq!(provider.generate("Series B companies").unwrap(), "first");
    }

    #[test]
    fn test_mock_provider_call_count() {
        let provider = MockProvider::new("test");
        assert_eq!(provider.call_count(), 0);

        provider.generate("prompt1").unwrap();
        provider.generate("prompt2").unwrap();
        assert_eq!(provider.call_count(), 2);

        provider.reset_call_count();
        assert_eq!(provider.call_count(), 0);
    }

    #[test]
    fn test_mock_provider_error() {
        let mut provider = MockProvider::default();
        provider.add_error("bad prompt");

        let err = provider.generate("a bad prompt").unwrap_err();
        assert!(matches!(err, LlmError::Communication(_)));
        assert!(err.is_retryable());
    }

    #[test]
    fn test_mock_provider_clone_shares_state() {
        let provider1 = MockProvider::new("test");
        let mut provider2 = provider1.clone();
        provider2.add_response("hello", "world");

        provider1.generate("hello").unwrap();
        assert_eq!(provider2.call_count(), 1);
        assert_eq!(provider1.generate("hello").unwrap(), "world");
    }

    #[test]
    fn test_retryable_errors() {
        assert!(LlmError::RateLimitExceeded.is_retryable());
        assert!(!LlmError::MissingApiKey("ANTHROPIC_API_KEY".into()).is_retryable());
        assert!(!LlmError::InvalidResponse("no text".into()).is_retryable());
    }
}
