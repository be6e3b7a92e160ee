//! Thesis Sprint Domain Layer
//!
//! This crate contains the core business logic and domain model for Thesis Sprint.
//! It has no I/O and defines the value objects, rule tables and trait interfaces
//! that the store, research, export and server crates depend upon.
//!
//! ## Key Concepts
//!
//! - **Source**: a cited origin (URL, type, timestamp) for one claimed value
//! - **Trust Hierarchy**: ranking of source types used to pick authoritative values
//! - **Claim**: a resolved funding fact with a confidence label and status
//! - **Freshness**: recency bucket derived from the age of a timestamp
//! - **Fit**: bucketing of the externally generated 0-100 thesis fit score
//! - **Sprint / Company**: the aggregates users create, validate and shortlist
//!
//! ## Architecture
//!
//! - Pure business logic only
//! - Rule tables are configuration with documented defaults ([`RulesConfig`])
//! - Trait definitions for the store and LLM seams live in [`traits`]

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod claim;
pub mod company;
pub mod confidence;
pub mod criteria;
pub mod error;
pub mod fit;
pub mod freshness;
pub mod ids;
pub mod normalize;
pub mod resolver;
pub mod rules;
pub mod source;
pub mod sprint;
pub mod stage;
pub mod traits;
pub mod trust;

// Re-exports for convenience
pub use claim::{Basis, Claim, ClaimStatus, FundingField, NOT_AVAILABLE};
pub use company::{Company, FitNote, FundingSnapshot, ShortlistStatus, ValidationState};
pub use confidence::{company_confidence, CompanyConfidence, ConfidenceLabel};
pub use criteria::{CriteriaMiss, SprintCriteria, StageRange};
pub use error::ValidationInputError;
pub use fit::{rank_companies, FitAssessment, FitBucket, FitScore, FitThresholds, RankedCompanies, ScoreAdjustment};
pub use freshness::{Freshness, FreshnessThresholds};
pub use ids::{ClaimId, CompanyId, SourceId, SprintId};
pub use resolver::{resolve, Resolution};
pub use rules::{RulesConfig, RulesError};
pub use source::Source;
pub use sprint::{NewSprint, Sprint, SprintStatus, SprintUpdate};
pub use stage::RoundType;
pub use traits::{CompanyFilter, CompanyQuery, LlmProvider, SortKey, SprintStore};
pub use trust::{SourceType, TrustTable};
