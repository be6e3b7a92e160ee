//! Request and result types for discovery and validation

use serde::{Deserialize, Serialize};
use sprint_domain::{Claim, Company, FundingField, FundingSnapshot, ScoreAdjustment, Sprint, SprintCriteria, SprintId};

/// Request to generate candidate companies for a sprint
#[derive(Debug, Clone)]
pub struct DiscoveryRequest {
    /// Sprint the candidates will join
    pub sprint_id: SprintId,

    /// Investment thesis text
    pub thesis: String,

    /// Screening criteria shown to the model
    pub criteria: SprintCriteria,

    /// Number of candidates wanted; the configured default when absent
    pub target_count: Option<usize>,

    /// Companies already in the sprint, not to be suggested again
    pub exclude_names: Vec<String>,
}

impl DiscoveryRequest {
    /// Build a request from a sprint and its current companies
    pub fn for_sprint(sprint: &Sprint, existing: &[Company]) -> Self {
        Self {
            sprint_id: sprint.id.clone(),
            thesis: sprint.thesis.clone(),
            criteria: sprint.criteria.clone(),
            target_count: None,
            exclude_names: existing.iter().map(|c| c.name.clone()).collect(),
        }
    }

    /// Ask for a specific number of candidates
    pub fn with_target_count(mut self, count: usize) -> Self {
        self.target_count = Some(count);
        self
    }
}

/// A candidate whose fit score had to be clamped into range
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdjustedScore {
    /// Candidate name
    pub company: String,
    /// Score as received and as applied
    pub adjustment: ScoreAdjustment,
}

/// A candidate entry that could not be used
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RejectedCandidate {
    /// Position in the response array
    pub index: usize,
    /// Name, when one was present
    pub name: Option<String>,
    /// Why it was skipped
    pub reason: String,
}

/// Result of a discovery call
#[derive(Debug, Clone, Default)]
pub struct DiscoveryReport {
    /// New companies, not yet stored
    pub companies: Vec<Company>,

    /// Scores clamped into [0, 100]
    pub adjustments: Vec<AdjustedScore>,

    /// Entries skipped
    pub rejected: Vec<RejectedCandidate>,
}

/// Result of a funding validation call
#[derive(Debug, Clone)]
pub struct ValidationOutcome {
    /// One resolved claim per funding field
    pub claims: Vec<Claim>,

    /// Sources skipped for a bad URL, timestamp or empty claims
    pub dropped_sources: usize,

    /// Consolidated view of the new claims
    pub snapshot: FundingSnapshot,

    /// Fields whose top-level summary disagreed with the resolved value
    pub summary_mismatches: Vec<FundingField>,
}

/// Candidate entry as parsed from the model's response
#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct CandidateRecord {
    pub index: usize,
    pub name: String,
    pub domain: Option<String>,
    pub description: String,
    pub stage: Option<String>,
    pub location: Option<String>,
    pub fit_score: Option<i64>,
    pub fit_reasons: Vec<String>,
    pub tags: Vec<String>,
    pub next_action: Option<String>,
}

/// One well-formed source from a funding record
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct SourceRecord {
    pub url: String,
    pub source_type: sprint_domain::SourceType,
    pub title: String,
    pub observed_at: chrono::DateTime<chrono::Utc>,
    pub claims: Vec<(FundingField, String)>,
}

/// A parsed funding record
#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct FundingRecord {
    pub summary: Vec<(FundingField, String)>,
    pub valuation_basis: Option<String>,
    pub bases: Vec<(FundingField, String)>,
    pub sources: Vec<SourceRecord>,
    pub dropped_sources: usize,
}
