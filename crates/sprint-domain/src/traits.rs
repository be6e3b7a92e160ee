//! Trait definitions for external interactions
//!
//! These traits define the boundaries between domain logic and infrastructure.
//! Infrastructure implementations live in other crates.

use crate::claim::Claim;
use crate::company::{Company, ShortlistStatus};
use crate::error::ValidationInputError;
use crate::ids::{CompanyId, SprintId};
use crate::sprint::{NewSprint, Sprint, SprintUpdate};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Trait for storing sprints and their companies
///
/// Implemented by the infrastructure layer (sprint-store). Every method takes
/// `&self` and returns owned copies, so implementations synchronize
/// internally and callers never hold references into the store.
pub trait SprintStore {
    /// Error type for store operations
    type Error;

    /// Create a sprint
    fn create_sprint(&self, input: NewSprint) -> Result<Sprint, Self::Error>;

    /// Get a sprint by ID
    fn get_sprint(&self, id: &SprintId) -> Result<Option<Sprint>, Self::Error>;

    /// List sprints in creation order
    fn list_sprints(&self) -> Result<Vec<Sprint>, Self::Error>;

    /// Edit a sprint's name, thesis, criteria or status
    fn update_criteria(&self, id: &SprintId, update: SprintUpdate) -> Result<Sprint, Self::Error>;

    /// Add a company to its sprint, or replace it if the ID exists
    fn upsert_company(&self, company: Company) -> Result<Company, Self::Error>;

    /// Get a company by ID
    fn get_company(&self, id: &CompanyId) -> Result<Option<Company>, Self::Error>;

    /// Remove a company from the store and its sprint
    fn remove_company(&self, id: &CompanyId) -> Result<Company, Self::Error>;

    /// Query the companies of one sprint
    fn list_companies(
        &self,
        sprint_id: &SprintId,
        query: &CompanyQuery,
    ) -> Result<Vec<Company>, Self::Error>;

    /// Companies marked Pursue or Watch, Pursue first
    fn shortlist(&self, sprint_id: &SprintId) -> Result<Vec<Company>, Self::Error>;

    /// Replace a company's claims with a fresh validation result
    fn record_validation(
        &self,
        id: &CompanyId,
        claims: Vec<Claim>,
        at: DateTime<Utc>,
    ) -> Result<Company, Self::Error>;

    /// Set a company's shortlist decision
    fn set_shortlist(
        &self,
        id: &CompanyId,
        status: ShortlistStatus,
        at: DateTime<Utc>,
    ) -> Result<Company, Self::Error>;

    /// Append a fit note
    fn append_note(&self, id: &CompanyId, text: &str, at: DateTime<Utc>) -> Result<Company, Self::Error>;
}

/// Which companies a listing shows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompanyFilter {
    /// Everything
    #[default]
    All,
    /// Company confidence Low or Medium
    NeedsReview,
    /// Company confidence Conflict
    Conflicts,
    /// Pursue or Watch
    Shortlisted,
}

impl CompanyFilter {
    /// Parse a filter tag
    pub fn parse(tag: &str) -> Result<Self, ValidationInputError> {
        match tag.trim().to_lowercase().replace('-', "_").as_str() {
            "" | "all" => Ok(CompanyFilter::All),
            "needs_review" | "review" => Ok(CompanyFilter::NeedsReview),
            "conflicts" | "conflict" => Ok(CompanyFilter::Conflicts),
            "shortlisted" | "shortlist" => Ok(CompanyFilter::Shortlisted),
            other => Err(ValidationInputError::invalid("filter", format!("unknown filter '{}'", other))),
        }
    }
}

/// Sort order of a listing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    /// High, Medium, Conflict, Low
    #[default]
    Confidence,
    /// Newest round first
    LastRaised,
    /// Largest round first
    Amount,
    /// Alphabetical
    Name,
}

impl SortKey {
    /// Parse a sort tag
    pub fn parse(tag: &str) -> Result<Self, ValidationInputError> {
        match tag.trim().to_lowercase().replace('-', "_").as_str() {
            "" | "confidence" => Ok(SortKey::Confidence),
            "last_raised" | "date" | "recent" => Ok(SortKey::LastRaised),
            "amount" => Ok(SortKey::Amount),
            "name" => Ok(SortKey::Name),
            other => Err(ValidationInputError::invalid("sort", format!("unknown sort key '{}'", other))),
        }
    }
}

/// Query for listing a sprint's companies
#[derive(Debug, Clone, Default)]
pub struct CompanyQuery {
    /// Which companies to include
    pub filter: CompanyFilter,

    /// Sort order
    pub sort: SortKey,

    /// Case-insensitive text search on name, description and tags
    pub search: Option<String>,

    /// Drop companies that fail the sprint criteria
    pub enforce_criteria: bool,

    /// Reference time for criteria checks (defaults to now)
    pub as_of: Option<DateTime<Utc>>,

    /// Maximum results to return
    pub limit: Option<usize>,
}

/// Trait for LLM provider operations
///
/// Implemented by the infrastructure layer (sprint-llm)
pub trait LlmProvider {
    /// Error type for LLM operations
    type Error;

    /// Generate text completion
    fn generate(&self, prompt: &str) -> Result<String, Self::Error>;

    /// Model identifier, for logging
    fn model_name(&self) -> &str {
        "llm"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_parse() {
        assert_eq!(CompanyFilter::parse("needs-review").unwrap(), CompanyFilter::NeedsReview);
        assert_eq!(CompanyFilter::parse("").unwrap(), CompanyFilter::All);
        assert!(CompanyFilter::parse("hot").is_err());
    }

    #[test]
    fn test_sort_parse() {
        assert_eq!(SortKey::parse("last_raised").unwrap(), SortKey::LastRaised);
        assert_eq!(SortKey::parse("Amount").unwrap(), SortKey::Amount);
        assert!(SortKey::parse("fit").is_err());
    }
}
