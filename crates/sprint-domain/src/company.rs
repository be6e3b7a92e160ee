//! Company aggregate

use crate::claim::{Basis, Claim, ClaimStatus, FundingField};
use crate::confidence::{company_confidence, CompanyConfidence};
use crate::fit::FitAssessment;
use crate::freshness::{Freshness, FreshnessThresholds};
use crate::ids::{CompanyId, SprintId};
use crate::normalize::{parse_date, parse_money};
use crate::stage::RoundType;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Shortlist decision for a company
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShortlistStatus {
    /// No decision yet
    #[default]
    #[serde(rename = "none")]
    Unlisted,
    /// Actively pursue
    Pursue,
    /// Keep an eye on
    Watch,
    /// Ruled out
    Dismiss,
}

impl ShortlistStatus {
    /// Get the canonical key
    pub fn as_str(&self) -> &'static str {
        match self {
            ShortlistStatus::Unlisted => "none",
            ShortlistStatus::Pursue => "pursue",
            ShortlistStatus::Watch => "watch",
            ShortlistStatus::Dismiss => "dismiss",
        }
    }

    /// Parse a status tag
    pub fn parse(tag: &str) -> Option<Self> {
        match tag.trim().to_lowercase().as_str() {
            "" | "none" | "unlisted" => Some(ShortlistStatus::Unlisted),
            "pursue" => Some(ShortlistStatus::Pursue),
            "watch" => Some(ShortlistStatus::Watch),
            "dismiss" | "deprioritize" | "pass" => Some(ShortlistStatus::Dismiss),
            _ => None,
        }
    }

    /// Pursue and Watch make up the shortlist
    pub fn is_shortlisted(&self) -> bool {
        matches!(self, ShortlistStatus::Pursue | ShortlistStatus::Watch)
    }
}

impl fmt::Display for ShortlistStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whether funding research has run for a company
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidationState {
    /// Never validated
    #[default]
    Pending,
    /// Claims come from a completed validation run
    Validated,
}

/// Free-text note about thesis fit
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FitNote {
    /// Note text
    pub text: String,
    /// When it was written
    pub created_at: DateTime<Utc>,
}

/// Consolidated funding view derived from a company's claims
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FundingSnapshot {
    /// Date of the last round
    pub last_round_date: Option<NaiveDate>,
    /// Type of the last round as reported
    pub last_round_type: Option<String>,
    /// Amount of the last round as reported
    pub amount: Option<String>,
    /// Amount of the last round in US dollars
    pub amount_usd: Option<f64>,
    /// Lead investor
    pub lead_investor: Option<String>,
    /// Post-money valuation
    pub valuation: Option<String>,
    /// Basis of the valuation figure
    pub valuation_basis: Option<Basis>,
    /// Company-level confidence
    pub confidence: CompanyConfidence,
    /// Whether any claim is conflicting
    pub has_conflicts: bool,
    /// Resolution notes of non-trivial claims
    pub resolution_note: Option<String>,
    /// Freshness of the last round
    pub freshness: Option<Freshness>,
}

/// A candidate company within one sprint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Company {
    /// Unique identifier
    pub id: CompanyId,
    /// Owning sprint
    pub sprint_id: SprintId,
    /// Company name
    pub name: String,
    /// One-paragraph description
    #[serde(default)]
    pub description: String,
    /// Website or domain
    #[serde(default)]
    pub website: Option<String>,
    /// Headquarters location, free text
    #[serde(default)]
    pub location: Option<String>,
    /// Topic tags
    #[serde(default)]
    pub tags: Vec<String>,
    /// Stage estimate from discovery, used until a round type is validated
    #[serde(default)]
    pub stage: Option<RoundType>,
    /// Thesis fit assessment
    #[serde(default)]
    pub fit: Option<FitAssessment>,
    /// Shortlist decision
    #[serde(default)]
    pub shortlist: ShortlistStatus,
    /// When the shortlist decision was last changed
    #[serde(default)]
    pub shortlisted_at: Option<DateTime<Utc>>,
    /// Appended fit notes, oldest first
    #[serde(default)]
    pub notes: Vec<FitNote>,
    /// Resolved funding claims
    #[serde(default)]
    pub claims: Vec<Claim>,
    /// Validation state
    #[serde(default)]
    pub validation: ValidationState,
    /// Time of the last successful validation
    #[serde(default)]
    pub validated_at: Option<DateTime<Utc>>,
    /// Creation time
    pub created_at: DateTime<Utc>,
}

impl Company {
    /// Create an unvalidated company
    pub fn new(sprint_id: SprintId, name: impl Into<String>) -> Self {
        Self {
            id: CompanyId::new(),
            sprint_id,
            name: name.into(),
            description: String::new(),
            website: None,
            location: None,
            tags: Vec::new(),
            stage: None,
            fit: None,
            shortlist: ShortlistStatus::Unlisted,
            shortlisted_at: None,
            notes: Vec::new(),
            claims: Vec::new(),
            validation: ValidationState::Pending,
            validated_at: None,
            created_at: Utc::now(),
        }
    }

    /// Fit score, if assessed
    pub fn fit_score(&self) -> Option<u8> {
        self.fit.as_ref().map(|f| f.score.value())
    }

    /// Company-level confidence derived from the claims
    pub fn confidence(&self) -> CompanyConfidence {
        company_confidence(&self.claims)
    }

    /// Claim for one field, if any
    pub fn claim(&self, field: FundingField) -> Option<&Claim> {
        self.claims.iter().find(|c| c.field == field)
    }

    fn known_value(&self, field: FundingField) -> Option<&str> {
        self.claim(field)
            .filter(|c| c.is_known())
            .map(|c| c.value.as_str())
    }

    /// Date of the last round, if a claim supports one
    pub fn last_round_date(&self) -> Option<NaiveDate> {
        self.known_value(FundingField::RoundDate).and_then(parse_date)
    }

    /// Amount of the last round in US dollars
    pub fn last_round_amount_usd(&self) -> Option<f64> {
        self.known_value(FundingField::Amount).and_then(parse_money)
    }

    /// Validated round type, falling back to the discovery estimate
    pub fn current_stage(&self) -> Option<RoundType> {
        self.known_value(FundingField::RoundType)
            .and_then(RoundType::parse)
            .or(self.stage)
    }

    /// Case-insensitive match on name, description and tags
    pub fn matches_search(&self, query: &str) -> bool {
        let query = query.trim().to_lowercase();
        query.is_empty()
            || self.name.to_lowercase().contains(&query)
            || self.description.to_lowercase().contains(&query)
            || self.tags.iter().any(|t| t.to_lowercase().contains(&query))
    }

    /// Build the consolidated funding view
    pub fn snapshot(&self, freshness: &FreshnessThresholds, now: DateTime<Utc>) -> FundingSnapshot {
        let last_round_date = self.last_round_date();
        let notes: Vec<String> = self
            .claims
            .iter()
            .filter(|c| c.status != ClaimStatus::Verified || c.sources.len() > 1)
            .filter_map(|c| c.note.as_ref().map(|n| format!("{}: {}", c.field.label(), n)))
            .collect();

        FundingSnapshot {
            last_round_date,
            last_round_type: self.known_value(FundingField::RoundType).map(str::to_string),
            amount: self.known_value(FundingField::Amount).map(str::to_string),
            amount_usd: self.last_round_amount_usd(),
            lead_investor: self.known_value(FundingField::LeadInvestor).map(str::to_string),
            valuation: self.known_value(FundingField::Valuation).map(str::to_string),
            valuation_basis: self
                .claim(FundingField::Valuation)
                .filter(|c| c.is_known())
                .map(|c| c.basis),
            confidence: self.confidence(),
            has_conflicts: self.claims.iter().any(|c| c.status == ClaimStatus::Conflicting),
            resolution_note: (!notes.is_empty()).then(|| notes.join("; ")),
            freshness: last_round_date
                .and_then(|d| d.and_hms_opt(0, 0, 0))
                .map(|d| freshness.classify(d.and_utc(), now)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolver::resolve;
    use crate::source::Source;
    use crate::trust::{SourceType, TrustTable};
    use chrono::TimeZone;

    fn add_claim(company: &mut Company, field: FundingField, sources: Vec<(SourceType, &str)>) {
        let now = Utc::now();
        let sources = sources
            .into_iter()
            .map(|(t, v)| Source::new("https://example.com/press", t, "t", now, v))
            .collect();
        let resolution = resolve(field, sources, Basis::Direct, &TrustTable::default());
        company
            .claims
            .push(Claim::from_resolution(company.id.clone(), resolution, now));
    }

    #[test]
    fn test_shortlist_parse() {
        assert_eq!(ShortlistStatus::parse("Pursue"), Some(ShortlistStatus::Pursue));
        assert_eq!(ShortlistStatus::parse("deprioritize"), Some(ShortlistStatus::Dismiss));
        assert_eq!(ShortlistStatus::parse("maybe"), None);
        assert!(!ShortlistStatus::Dismiss.is_shortlisted());
        assert_eq!(serde_json::to_string(&ShortlistStatus::Unlisted).unwrap(), "\"none\"");
    }

    #[test]
    fn test_stage_prefers_validated_round() {
        let mut company = Company::new(SprintId::from("s"), "Acme");
        company.stage = Some(RoundType::SeriesA);
        assert_eq!(company.current_stage(), Some(RoundType::SeriesA));

        add_claim(&mut company, FundingField::RoundType, vec![(SourceType::PressRelease, "Series B")]);
        assert_eq!(company.current_stage(), Some(RoundType::SeriesB));
    }

    #[test]
    fn test_search() {
        let mut company = Company::new(SprintId::from("s"), "Cursor");
        company.description = "AI-first code editor".into();
        assert!(company.matches_search("editor"));
        assert!(company.matches_search("CURSOR"));
        assert!(company.matches_search(""));
        assert!(!company.matches_search("fintech"));
    }

    #[test]
    fn test_snapshot() {
        let now = Utc.with_ymd_and_hms(2025, 3, 1, 0, 0, 0).unwrap();
        let mut company = Company::new(SprintId::from("s"), "Acme");
        add_claim(&mut company, FundingField::RoundDate, vec![(SourceType::PressRelease, "2025-01-16")]);
        add_claim(&mut company, FundingField::RoundType, vec![(SourceType::PressRelease, "Series B")]);
        add_claim(
            &mut company,
            FundingField::Amount,
            vec![(SourceType::PressRelease, "$105M"), (SourceType::Social, "$100M")],
        );
        add_claim(&mut company, FundingField::LeadInvestor, vec![]);

        let snapshot = company.snapshot(&FreshnessThresholds::default(), now);

        assert_eq!(snapshot.amount.as_deref(), Some("$105M"));
        assert_eq!(snapshot.amount_usd, Some(105_000_000.0));
        assert_eq!(snapshot.lead_investor, None);
        assert_eq!(snapshot.confidence, CompanyConfidence::High);
        assert!(!snapshot.has_conflicts);
        assert_eq!(snapshot.freshness, Some(Freshness::Fresh));
        assert!(snapshot.resolution_note.unwrap().contains("Last round amount"));
        assert_eq!(
            company.last_round_date(),
            Some(NaiveDate::from_ymd_opt(2025, 1, 16).unwrap())
        );
    }
}
