//! Fit scoring and bucketing
//!
//! Fit scores come from the generation collaborator as raw integers. They are
//! validated into [`FitScore`] (0-100) and bucketed by [`FitThresholds`].

use crate::company::Company;
use crate::error::ValidationInputError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Next action given to Maybe-bucket companies when none was supplied
pub const DEFAULT_NEXT_ACTION: &str = "Check recent traction against the thesis before investing time";

/// Thesis fit score in [0, 100]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub struct FitScore(u8);

/// Record of a raw score that had to be clamped into range
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreAdjustment {
    /// Score as received
    pub raw: i64,
    /// Score after clamping
    pub applied: FitScore,
}

impl FitScore {
    /// Highest valid score
    pub const MAX: u8 = 100;

    /// Validate a raw score
    pub fn new(raw: i64) -> Result<Self, ValidationInputError> {
        if (0..=Self::MAX as i64).contains(&raw) {
            Ok(Self(raw as u8))
        } else {
            Err(ValidationInputError::ScoreOutOfRange { raw })
        }
    }

    /// Clamp a raw score into range, reporting any change
    pub fn clamped(raw: i64) -> (Self, Option<ScoreAdjustment>) {
        match Self::new(raw) {
            Ok(score) => (score, None),
            Err(_) => {
                let applied = Self(raw.clamp(0, Self::MAX as i64) as u8);
                (applied, Some(ScoreAdjustment { raw, applied }))
            }
        }
    }

    /// Get the numeric value
    pub fn value(&self) -> u8 {
        self.0
    }
}

impl TryFrom<i64> for FitScore {
    type Error = ValidationInputError;

    fn try_from(raw: i64) -> Result<Self, Self::Error> {
        Self::new(raw)
    }
}

impl From<FitScore> for i64 {
    fn from(score: FitScore) -> Self {
        score.0 as i64
    }
}

impl fmt::Display for FitScore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Fit bucket
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FitBucket {
    /// Score at or above the top threshold
    TopRecommendation,
    /// Score at or above the worth threshold
    WorthALook,
    /// Everything below
    Maybe,
}

impl FitBucket {
    /// Display label
    pub fn label(&self) -> &'static str {
        match self {
            FitBucket::TopRecommendation => "Top Recommendation",
            FitBucket::WorthALook => "Worth a Look",
            FitBucket::Maybe => "Maybe",
        }
    }
}

impl fmt::Display for FitBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Inclusive lower bounds of the upper two buckets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FitThresholds {
    /// Lower bound of Top Recommendation
    pub top: u8,
    /// Lower bound of Worth a Look
    pub worth: u8,
}

impl Default for FitThresholds {
    fn default() -> Self {
        Self { top: 80, worth: 60 }
    }
}

impl FitThresholds {
    /// Bucket a score
    pub fn bucket(&self, score: FitScore) -> FitBucket {
        if score.value() >= self.top {
            FitBucket::TopRecommendation
        } else if score.value() >= self.worth {
            FitBucket::WorthALook
        } else {
            FitBucket::Maybe
        }
    }

    /// Bounds must satisfy worth < top <= 100
    pub fn validate(&self) -> Result<(), String> {
        if self.worth >= self.top || self.top > FitScore::MAX {
            return Err(format!(
                "fit thresholds must satisfy worth < top <= 100, got worth={} top={}",
                self.worth, self.top
            ));
        }
        Ok(())
    }
}

/// Fit score plus the reasoning behind it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FitAssessment {
    /// Validated score
    pub score: FitScore,
    /// Bucket derived from the score
    pub bucket: FitBucket,
    /// Rationale bullets
    pub rationale: Vec<String>,
    /// What to check next; always present for Maybe
    pub next_action: Option<String>,
}

impl FitAssessment {
    /// Bucket a score and attach its rationale
    pub fn new(
        score: FitScore,
        rationale: Vec<String>,
        next_action: Option<String>,
        thresholds: &FitThresholds,
    ) -> Self {
        let bucket = thresholds.bucket(score);
        let next_action = next_action
            .map(|a| a.trim().to_string())
            .filter(|a| !a.is_empty());
        let next_action = match bucket {
            FitBucket::Maybe => Some(next_action.unwrap_or_else(|| DEFAULT_NEXT_ACTION.to_string())),
            _ => next_action,
        };

        Self {
            score,
            bucket,
            rationale,
            next_action,
        }
    }
}

/// Companies split into fit buckets
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RankedCompanies {
    /// Top recommendations, at most the cap
    pub top: Vec<Company>,
    /// Worth a look, including Top overflow
    pub worth_a_look: Vec<Company>,
    /// Maybe, including companies with no assessment
    pub maybe: Vec<Company>,
}

/// Sort by score (descending, name tie-break) and split into buckets
///
/// The Top bucket holds at most `top_cap` companies; the rest fall to
/// Worth a Look.
pub fn rank_companies(mut companies: Vec<Company>, top_cap: usize) -> RankedCompanies {
    companies.sort_by(|a, b| {
        b.fit_score()
            .cmp(&a.fit_score())
            .then_with(|| a.name.to_lowercase().cmp(&b.name.to_lowercase()))
    });

    let mut ranked = RankedCompanies::default();
    for company in companies {
        match company.fit.as_ref().map(|f| f.bucket) {
            Some(FitBucket::TopRecommendation) if ranked.top.len() < top_cap => {
                ranked.top.push(company)
            }
            Some(FitBucket::TopRecommendation) | Some(FitBucket::WorthALook) => {
                ranked.worth_a_look.push(company)
            }
            _ => ranked.maybe.push(company),
        }
    }
    ranked
}
