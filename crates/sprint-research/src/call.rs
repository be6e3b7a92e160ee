//! Timeout-bounded LLM calls

use crate::error::ResearchError;
use sprint_domain::traits::LlmProvider;
use std::fmt::Display;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::timeout;
use tracing::debug;

/// Run a provider call on the blocking pool, giving up after `limit`
///
/// On timeout the blocking task is detached and its result discarded.
pub(crate) async fn call_llm<L>(
    llm: &Arc<L>,
    prompt: String,
    limit: Duration,
) -> Result<String, ResearchError>
where
    L: LlmProvider + Send + Sync + ?Sized + 'static,
    L::Error: Display,
{
    let llm = Arc::clone(llm);
    debug!(model = llm.model_name(), "Prompt length: {} chars", prompt.len());

    // Providers are sync; keep them off the async workers
    let task = tokio::task::spawn_blocking(move || {
        llm.generate(&prompt)
            .map_err(|e| ResearchError::Llm(e.to_string()))
    });

    let response = timeout(limit, task)
        .await
        .map_err(|_| ResearchError::Timeout)?
        .map_err(|e| ResearchError::Llm(format!("Task join error: {}", e)))??;

    debug!("LLM response length: {} chars", response.len());
    Ok(response)
}
