//! Configuration file parsing for the server.
//!
//! Loads the bind address, log level, demo seeding flag and the `[llm]`,
//! `[research]` and `[rules]` sections from TOML.

use serde::{Deserialize, Serialize};
use sprint_domain::RulesConfig;
use sprint_llm::LlmConfig;
use sprint_research::ResearchConfig;
use std::path::Path;
use thiserror::Error;

/// Configuration error
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read config file
    #[error("Failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),

    /// Failed to parse TOML
    #[error("Failed to parse config TOML: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// A value is out of range or inconsistent
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Server configuration loaded from TOML
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Bind address (e.g., "127.0.0.1")
    pub bind_address: String,

    /// Bind port (e.g., 8080)
    pub bind_port: u16,

    /// Default log filter when `RUST_LOG` is unset
    pub log_level: String,

    /// Seed the demo sprints at startup
    pub seed_demo: bool,

    /// Language model provider
    pub llm: LlmConfig,

    /// Discovery and validation settings
    pub research: ResearchConfig,

    /// Trust ranks, freshness and fit thresholds
    pub rules: RulesConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            bind_address: "127.0.0.1".to_string(),
            bind_port: 8080,
            log_level: "info".to_string(),
            seed_demo: true,
            llm: LlmConfig::default(),
            research: ResearchConfig::default(),
            rules: RulesConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load and validate configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let config: AppConfig = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Defaults with the mock provider, for running without an API key
    pub fn default_config() -> Self {
        AppConfig {
            llm: LlmConfig::mock(),
            ..AppConfig::default()
        }
    }

    /// Check every section
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.bind_address.trim().is_empty() {
            return Err(ConfigError::Invalid("bind_address must not be empty".to_string()));
        }
        if self.log_level.trim().is_empty() {
            return Err(ConfigError::Invalid("log_level must not be empty".to_string()));
        }
        self.llm.validate().map_err(ConfigError::Invalid)?;
        self.research.validate().map_err(ConfigError::Invalid)?;
        self.rules
            .validate()
            .map_err(|e| ConfigError::Invalid(e.to_string()))?;
        Ok(())
    }

    /// Get the full bind address (address:port)
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.bind_address, self.bind_port)
    }
}
