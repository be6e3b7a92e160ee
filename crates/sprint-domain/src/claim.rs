//! Claim module - one resolved funding fact about a company

use crate::confidence::ConfidenceLabel;
use crate::ids::{ClaimId, CompanyId};
use crate::resolver::Resolution;
use crate::source::Source;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Placeholder value for a field no source supports
///
/// Claims never invent a value; an unsupported field reads "N/A".
pub const NOT_AVAILABLE: &str = "N/A";

/// Funding field a claim asserts
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FundingField {
    /// Date of the last round
    RoundDate,
    /// Type of the last round (Seed, Series A, ...)
    RoundType,
    /// Amount raised in the last round
    Amount,
    /// Lead investor of the last round
    LeadInvestor,
    /// Post-money valuation
    Valuation,
}

impl FundingField {
    /// All fields in display order
    pub const ALL: [FundingField; 5] = [
        FundingField::RoundDate,
        FundingField::RoundType,
        FundingField::Amount,
        FundingField::LeadInvestor,
        FundingField::Valuation,
    ];

    /// Get the canonical key
    pub fn as_str(&self) -> &'static str {
        match self {
            FundingField::RoundDate => "round_date",
            FundingField::RoundType => "round_type",
            FundingField::Amount => "amount",
            FundingField::LeadInvestor => "lead_investor",
            FundingField::Valuation => "valuation",
        }
    }

    /// Human-readable label
    pub fn label(&self) -> &'static str {
        match self {
            FundingField::RoundDate => "Last round date",
            FundingField::RoundType => "Last round type",
            FundingField::Amount => "Last round amount",
            FundingField::LeadInvestor => "Lead investor",
            FundingField::Valuation => "Valuation",
        }
    }

    /// Parse a key, accepting a few collaborator spellings
    pub fn parse(key: &str) -> Option<Self> {
        match key.trim().to_lowercase().replace([' ', '-'], "_").as_str() {
            "round_date" | "date" | "last_round_date" => Some(FundingField::RoundDate),
            "round_type" | "round" | "stage" | "last_round_type" => Some(FundingField::RoundType),
            "amount" | "round_amount" | "last_round_amount" => Some(FundingField::Amount),
            "lead_investor" | "lead" => Some(FundingField::LeadInvestor),
            "valuation" | "post_money_valuation" => Some(FundingField::Valuation),
            _ => None,
        }
    }

    /// Required fields gate the company-level confidence label
    pub fn is_required(&self) -> bool {
        matches!(
            self,
            FundingField::RoundDate | FundingField::RoundType | FundingField::Amount
        )
    }
}

impl fmt::Display for FundingField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Resolution status of a claim
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClaimStatus {
    /// One authoritative value backed by the top-trust source
    Verified,
    /// Top-trust sources disagree
    Conflicting,
    /// No usable source
    Unverified,
}

impl ClaimStatus {
    /// Get the canonical key
    pub fn as_str(&self) -> &'static str {
        match self {
            ClaimStatus::Verified => "verified",
            ClaimStatus::Conflicting => "conflicting",
            ClaimStatus::Unverified => "unverified",
        }
    }
}

/// How directly a value is supported by its citations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Basis {
    /// Stated outright by the cited source
    #[default]
    Direct,
    /// Reported second-hand
    Secondary,
    /// Inferred from other figures
    Implied,
    /// Unconfirmed rumor
    Rumor,
    /// Estimate without a direct citation
    Estimate,
}

impl Basis {
    /// Get the canonical key
    pub fn as_str(&self) -> &'static str {
        match self {
            Basis::Direct => "direct",
            Basis::Secondary => "secondary",
            Basis::Implied => "implied",
            Basis::Rumor => "rumor",
            Basis::Estimate => "estimate",
        }
    }

    /// Parse a basis tag
    pub fn parse(tag: &str) -> Option<Self> {
        match tag.trim().to_lowercase().as_str() {
            "direct" => Some(Basis::Direct),
            "secondary" => Some(Basis::Secondary),
            "implied" => Some(Basis::Implied),
            "rumor" | "rumour" => Some(Basis::Rumor),
            "estimate" | "estimated" => Some(Basis::Estimate),
            _ => None,
        }
    }

    /// Highest confidence a value with this basis may carry
    pub fn ceiling(&self) -> ConfidenceLabel {
        match self {
            Basis::Direct => ConfidenceLabel::High,
            _ => ConfidenceLabel::Medium,
        }
    }
}

impl fmt::Display for Basis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A resolved claim about one funding field of one company
///
/// Claims are only built from a [`Resolution`], so the value, confidence and
/// status always agree with the sources they carry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claim {
    /// Unique identifier
    pub id: ClaimId,

    /// Company the claim is about
    pub company_id: CompanyId,

    /// Which funding field
    pub field: FundingField,

    /// Resolved value, or [`NOT_AVAILABLE`]
    pub value: String,

    /// Confidence label
    pub confidence: ConfidenceLabel,

    /// Resolution status
    pub status: ClaimStatus,

    /// Basis tag of the value
    pub basis: Basis,

    /// Supporting sources, most trusted first
    pub sources: Vec<Source>,

    /// Malformed sources dropped during resolution
    pub dropped_sources: usize,

    /// How the value was chosen
    pub note: Option<String>,

    /// When the claim was resolved
    pub resolved_at: DateTime<Utc>,
}

impl Claim {
    /// Build a claim from a resolver outcome
    pub fn from_resolution(
        company_id: CompanyId,
        resolution: Resolution,
        resolved_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: ClaimId::new(),
            company_id,
            field: resolution.field,
            value: resolution.value,
            confidence: resolution.confidence,
            status: resolution.status,
            basis: resolution.basis,
            sources: resolution.sources,
            dropped_sources: resolution.dropped,
            note: resolution.note,
            resolved_at,
        }
    }

    /// Whether the claim carries a usable value
    pub fn is_known(&self) -> bool {
        self.status != ClaimStatus::Unverified && self.value != NOT_AVAILABLE
    }

    /// One-line statement, e.g. "Last round amount: $105M"
    pub fn statement(&self) -> String {
        format!("{}: {}", self.field.label(), self.value)
    }
}
