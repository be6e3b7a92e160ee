//! Thesis Sprint Research
//!
//! The two language-model collaborators: candidate generation from a thesis
//! and funding validation for one company.
//!
//! # Architecture
//!
//! ```text
//! Sprint  → Discovery  → LLM → candidates → Companies (unstored)
//! Company → Researcher → LLM → sources → resolver → Claims (unstored)
//! ```
//!
//! Every response is untrusted input. Calls run on the blocking pool under
//! a timeout; a failed call returns an error and changes nothing.
//!
//! # Example Usage
//!
//! ```no_run
//! use sprint_research::{Discovery, DiscoveryRequest, ResearchConfig};
//! use sprint_domain::{FitThresholds, Sprint, NewSprint};
//! use sprint_llm::MockProvider;
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let sprint = Sprint::create(
//!     NewSprint { name: "Dev Tools".into(), thesis: "AI coding".into(), ..Default::default() },
//!     chrono::Utc::now(),
//! )?;
//! let discovery = Discovery::new(
//!     Arc::new(MockProvider::new("[]")),
//!     ResearchConfig::default(),
//!     FitThresholds::default(),
//! );
//!
//! let report = discovery.discover(&DiscoveryRequest::for_sprint(&sprint, &[])).await?;
//! println!("Generated: {} companies", report.companies.len());
//! println!("Rejected: {} entries", report.rejected.len());
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

mod call;
mod config;
mod discovery;
mod error;
mod parser;
mod prompt;
mod researcher;
mod types;


pub use config::ResearchConfig;
pub use discovery::Discovery;
pub use error::ResearchError;
pub use prompt::{DiscoveryPrompt, FundingPrompt};
pub use researcher::Researcher;
pub use types::{AdjustedScore, DiscoveryReport, DiscoveryRequest, RejectedCandidate, ValidationOutcome};
