//! Confidence labels for claims and companies

use crate::claim::{Claim, ClaimStatus, FundingField};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Confidence label of a single claim
///
/// Ordered from least to most confident, so `min` picks the weaker label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConfidenceLabel {
    /// Unsupported, disputed or weakly sourced
    Low,
    /// Supported, but not by a primary-tier source or not directly cited
    Medium,
    /// Backed by a press release or filing
    High,
}

impl ConfidenceLabel {
    /// Get the canonical key
    pub fn as_str(&self) -> &'static str {
        match self {
            ConfidenceLabel::High => "high",
            ConfidenceLabel::Medium => "medium",
            ConfidenceLabel::Low => "low",
        }
    }

    /// Lower this label to at most `ceiling`
    pub fn capped_at(self, ceiling: ConfidenceLabel) -> Self {
        self.min(ceiling)
    }
}

impl fmt::Display for ConfidenceLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Confidence label of a company, derived from its claims
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompanyConfidence {
    /// Every required field is High
    High,
    /// Nothing disputed, but some evidence is Medium
    Medium,
    /// A required field is missing or Low
    Low,
    /// At least one claim has disagreeing top-trust sources
    Conflict,
}

impl CompanyConfidence {
    /// Get the canonical key
    pub fn as_str(&self) -> &'static str {
        match self {
            CompanyConfidence::High => "high",
            CompanyConfidence::Medium => "medium",
            CompanyConfidence::Low => "low",
            CompanyConfidence::Conflict => "conflict",
        }
    }

    /// Position when sorting by confidence (High, Medium, Conflict, Low)
    pub fn sort_rank(&self) -> u8 {
        match self {
            CompanyConfidence::High => 0,
            CompanyConfidence::Medium => 1,
            CompanyConfidence::Conflict => 2,
            CompanyConfidence::Low => 3,
        }
    }

    /// Whether the company belongs in the "needs review" queue
    pub fn needs_review(&self) -> bool {
        matches!(self, CompanyConfidence::Low | CompanyConfidence::Medium)
    }
}

impl fmt::Display for CompanyConfidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<ConfidenceLabel> for CompanyConfidence {
    fn from(label: ConfidenceLabel) -> Self {
        match label {
            ConfidenceLabel::High => CompanyConfidence::High,
            ConfidenceLabel::Medium => CompanyConfidence::Medium,
            ConfidenceLabel::Low => CompanyConfidence::Low,
        }
    }
}

/// Derive a company's label from its claims
///
/// - any conflicting claim → Conflict
/// - a required field missing, unverified or Low → Low
/// - otherwise the weakest label among required claims and known optional claims
///
/// A company without claims has not been validated and reads Low.
pub fn company_confidence(claims: &[Claim]) -> CompanyConfidence {
    if claims.is_empty() {
        return CompanyConfidence::Low;
    }
    if claims.iter().any(|c| c.status == ClaimStatus::Conflicting) {
        return CompanyConfidence::Conflict;
    }

    let mut weakest = ConfidenceLabel::High;
    for field in FundingField::ALL.iter().filter(|f| f.is_required()) {
        match claims.iter().find(|c| c.field == *field) {
            Some(claim) if claim.is_known() => weakest = weakest.min(claim.confidence),
            _ => return CompanyConfidence::Low,
        }
    }
    for claim in claims.iter().filter(|c| !c.field.is_required() && c.is_known()) {
        weakest = weakest.min(claim.confidence);
    }

    weakest.into()
}
