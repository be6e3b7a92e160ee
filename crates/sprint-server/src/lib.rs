//! Thesis Sprint Server
//!
//! JSON API over the sprint store and the discovery and validation
//! collaborators. Labels (confidence, freshness, fit buckets, shortlist
//! status) are returned display-ready.

#![warn(missing_docs)]

pub mod api;
pub mod config;
pub mod error;
pub mod handlers;

use config::AppConfig;
use handlers::{create_router, AppState};
use sprint_domain::traits::SprintStore;
use sprint_llm::LlmError;
use sprint_store::{MemoryStore, StoreError};
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Server startup error
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    /// Demo seeding failed
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// The LLM provider could not be built
    #[error("LLM provider error: {0}")]
    Llm(#[from] LlmError),

    /// Server binding error
    #[error("Failed to bind server: {0}")]
    Bind(#[from] std::io::Error),

    /// Server error
    #[error("Server error: {0}")]
    Server(String),
}

/// Install the global tracing subscriber
///
/// `RUST_LOG` wins over `default_level`. Calling this twice is harmless.
pub fn init_tracing(default_level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

/// Build the store and collaborators from configuration
pub fn build_state(config: &AppConfig) -> Result<AppState, ServerError> {
    let store = if config.seed_demo {
        MemoryStore::with_demo_data(&config.rules.trust)?
    } else {
        MemoryStore::new()
    };
    let llm = config.llm.build_provider()?;

    Ok(AppState::new(
        Arc::new(store),
        llm,
        config.research.clone(),
        config.rules.clone(),
    ))
}

/// Start the HTTP server
pub async fn start_server(config: AppConfig) -> Result<(), ServerError> {
    info!("Starting Thesis Sprint server");
    info!("Bind address: {}", config.bind_addr());
    info!("LLM provider: {:?} ({})", config.llm.provider, config.llm.model);

    let state = build_state(&config)?;
    info!(
        "Store ready: {} sprints, {} companies",
        state.store.list_sprints()?.len(),
        state.store.company_count()?
    );

    let app = create_router(state);

    let listener = TcpListener::bind(&config.bind_addr()).await?;
    info!("Listening on {}", config.bind_addr());

    axum::serve(listener, app)
        .await
        .map_err(|e| ServerError::Server(e.to_string()))?;

    Ok(())
}
