//! Error types for the research collaborators

use thiserror::Error;

/// Errors that can occur while generating or validating companies
#[derive(Error, Debug)]
pub enum ResearchError {
    /// LLM provider error
    #[error("LLM error: {0}")]
    Llm(String),

    /// The call did not finish within the configured timeout
    #[error("Research call timed out")]
    Timeout,

    /// The response did not have the expected shape
    #[error("Invalid response format: {0}")]
    InvalidFormat(String),

    /// JSON parsing error
    #[error("JSON parse error: {0}")]
    JsonParse(String),
}

impl ResearchError {
    /// Whether the collaborator was unreachable, as opposed to answering badly
    pub fn is_unavailable(&self) -> bool {
        matches!(self, ResearchError::Llm(_) | ResearchError::Timeout)
    }
}

impl From<serde_json::Error> for ResearchError {
    fn from(e: serde_json::Error) -> Self {
        ResearchError::JsonParse(e.to_string())
    }
}
