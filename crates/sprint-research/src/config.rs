//! Configuration for the research collaborators

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// The `[research]` configuration section
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResearchConfig {
    /// Maximum time for a single collaborator call (seconds)
    pub call_timeout_secs: u64,

    /// Number of candidates to ask for when a request does not say
    pub target_count: usize,

    /// Upper bound on a requested candidate count
    pub max_target_count: usize,

    /// Maximum size of the Top Recommendation bucket
    pub top_cap: usize,

    /// Maximum existing company names listed in the discovery prompt
    pub context_names_limit: usize,
}

impl ResearchConfig {
    /// Get the call timeout as a Duration
    pub fn call_timeout(&self) -> Duration {
        Duration::from_secs(self.call_timeout_secs)
    }

    /// Clamp a requested candidate count to the configured range
    pub fn effective_target(&self, requested: Option<usize>) -> usize {
        requested
            .unwrap_or(self.target_count)
            .clamp(1, self.max_target_count)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.call_timeout_secs == 0 {
            return Err("call_timeout_secs must be greater than 0".to_string());
        }
        if self.target_count == 0 {
            return Err("target_count must be greater than 0".to_string());
        }
        if self.target_count > self.max_target_count {
            return Err("target_count cannot exceed max_target_count".to_string());
        }
        if self.top_cap == 0 {
            return Err("top_cap must be greater than 0".to_string());
        }
        Ok(())
    }
}

impl Default for ResearchConfig {
    fn default() -> Self {
        Self {
            call_timeout_secs: 120,
            target_count: 50,
            max_target_count: 60,
            top_cap: 10,
            context_names_limit: 50,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        let config = ResearchConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.call_timeout(), Duration::from_secs(120));
    }

    #[test]
    fn test_invalid_values() {
        let mut config = ResearchConfig::default();
        config.call_timeout_secs = 0;
        assert!(config.validate().is_err());

        let mut config = ResearchConfig::default();
        config.target_count = config.max_target_count + 1;
        assert!(config.validate().is_err());

        let mut config = ResearchConfig::default();
        config.top_cap = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_effective_target() {
        let config = ResearchConfig::default();
        assert_eq!(config.effective_target(None), 50);
        assert_eq!(config.effective_target(Some(0)), 1);
        assert_eq!(config.effective_target(Some(500)), 60);
        assert_eq!(config.effective_target(Some(30)), 30);
    }
}
