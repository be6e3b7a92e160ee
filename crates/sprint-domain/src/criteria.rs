//! Sprint criteria and the checks a company must pass
//!
//! Criteria never reject a company on missing information: a company with no
//! known location passes the geography check, one with no known round date
//! passes the age check, and so on.

use crate::company::Company;
use crate::error::ValidationInputError;
use crate::stage::RoundType;
use chrono::{DateTime, Datelike, Months, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Inclusive range of funding stages
///
/// Serialized as its display text, e.g. "Seed – Series B" or "Series B+".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct StageRange {
    /// Lowest stage included, `None` for no lower bound
    pub min: Option<RoundType>,
    /// Highest stage included, `None` for no upper bound
    pub max: Option<RoundType>,
}

impl StageRange {
    /// Every stage
    pub const ALL: StageRange = StageRange { min: None, max: None };

    /// Range between two stages
    pub fn between(min: RoundType, max: RoundType) -> Self {
        Self {
            min: Some(min.min(max)),
            max: Some(min.max(max)),
        }
    }

    /// Open-ended range starting at `min`
    pub fn from_stage(min: RoundType) -> Self {
        Self { min: Some(min), max: None }
    }

    /// Parse "All Stages", "Series B+", "Seed – Series B", "Seed to Series A" or a
    /// single stage
    pub fn parse(text: &str) -> Result<Self, ValidationInputError> {
        let trimmed = text.trim();
        let lower = trimmed.to_lowercase();
        if lower.is_empty() || matches!(lower.as_str(), "all" | "all stages" | "any" | "any stage") {
            return Ok(Self::ALL);
        }

        let stage = |s: &str| {
            RoundType::parse(s).ok_or_else(|| {
                ValidationInputError::invalid("stage", format!("unknown stage '{}'", s.trim()))
            })
        };

        if let Some(head) = trimmed.strip_suffix('+') {
            return Ok(Self::from_stage(stage(head)?));
        }
        for separator in ["–", "—", " - ", " to "] {
            if let Some((low, high)) = lower.split_once(separator) {
                return Ok(Self::between(stage(low)?, stage(high)?));
            }
        }

        let single = stage(trimmed)?;
        if single == RoundType::SeriesCPlus {
            return Ok(Self::from_stage(single));
        }
        Ok(Self::between(single, single))
    }

    /// Whether a stage falls inside the range
    pub fn contains(&self, stage: RoundType) -> bool {
        self.min.map_or(true, |min| stage >= min) && self.max.map_or(true, |max| stage <= max)
    }
}

impl fmt::Display for StageRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.min, self.max) {
            (None, None) => f.write_str("All Stages"),
            (Some(min), None) if min == RoundType::SeriesCPlus => f.write_str(min.as_str()),
            (Some(min), None) => write!(f, "{}+", min),
            (None, Some(max)) => write!(f, "{} – {}", RoundType::Seed, max),
            (Some(min), Some(max)) if min == max => write!(f, "{}", min),
            (Some(min), Some(max)) => write!(f, "{} – {}", min, max),
        }
    }
}

impl TryFrom<String> for StageRange {
    type Error = ValidationInputError;

    fn try_from(text: String) -> Result<Self, Self::Error> {
        Self::parse(&text)
    }
}

impl From<StageRange> for String {
    fn from(range: StageRange) -> Self {
        range.to_string()
    }
}

/// A failed criteria check
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "check", rename_all = "snake_case")]
pub enum CriteriaMiss {
    /// Last round is older than the allowed window
    RaiseTooOld {
        /// Whole months since the last round
        months: u32,
        /// Allowed window in months
        limit: u32,
    },
    /// Stage outside the sprint's stage range
    StageOutOfRange {
        /// Company stage
        stage: RoundType,
    },
    /// Location outside every listed region
    OutsideGeography {
        /// Company location
        location: String,
    },
    /// An excluded keyword appears in the company's name, description or tags
    ExcludedKeyword {
        /// The matching keyword
        keyword: String,
    },
}

impl fmt::Display for CriteriaMiss {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CriteriaMiss::RaiseTooOld { months, limit } => {
                write!(f, "last raised {} months ago (limit {})", months, limit)
            }
            CriteriaMiss::StageOutOfRange { stage } => write!(f, "stage {} outside range", stage),
            CriteriaMiss::OutsideGeography { location } => {
                write!(f, "location {} outside geography", location)
            }
            CriteriaMiss::ExcludedKeyword { keyword } => {
                write!(f, "matches excluded keyword '{}'", keyword)
            }
        }
    }
}

/// Investment criteria of a sprint
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SprintCriteria {
    /// Stage range
    pub stage: StageRange,
    /// Regions such as "US", "EU", "Canada" or "Global"; empty means anywhere
    pub geography: Vec<String>,
    /// Keywords describing the thesis
    pub keywords_include: Vec<String>,
    /// Keywords that rule a company out
    pub keywords_exclude: Vec<String>,
    /// Maximum months since the last round
    pub max_months_since_raise: Option<u32>,
}

impl SprintCriteria {
    /// Run every check, returning the ones that failed
    pub fn evaluate(&self, company: &Company, now: DateTime<Utc>) -> Vec<CriteriaMiss> {
        let mut misses = Vec::new();

        if let (Some(limit), Some(raised)) = (self.max_months_since_raise, company.last_round_date()) {
            let today = now.date_naive();
            let expired = raised
                .checked_add_months(Months::new(limit))
                .map_or(false, |deadline| deadline < today);
            if expired {
                let months = (today.year() * 12 + today.month() as i32)
                    - (raised.year() * 12 + raised.month() as i32);
                misses.push(CriteriaMiss::RaiseTooOld {
                    months: months.max(0) as u32,
                    limit,
                });
            }
        }

        if let Some(stage) = company.current_stage() {
            if !self.stage.contains(stage) {
                misses.push(CriteriaMiss::StageOutOfRange { stage });
            }
        }

        if let Some(location) = company.location.as_deref().filter(|l| is_known_location(l)) {
            let regions: Vec<&String> = self.geography.iter().filter(|r| !r.trim().is_empty()).collect();
            if !regions.is_empty() && !regions.iter().any(|r| region_contains(r, location)) {
                misses.push(CriteriaMiss::OutsideGeography {
                    location: location.to_string(),
                });
            }
        }

        let haystack = format!(
            "{} {} {}",
            company.name,
            company.description,
            company.tags.join(" ")
        )
        .to_lowercase();
        for keyword in &self.keywords_exclude {
            let needle = keyword.trim().to_lowercase();
            if !needle.is_empty() && haystack.contains(&needle) {
                misses.push(CriteriaMiss::ExcludedKeyword {
                    keyword: keyword.trim().to_string(),
                });
            }
        }

        misses
    }

    /// Convenience wrapper over [`SprintCriteria::evaluate`]
    pub fn admits(&self, company: &Company, now: DateTime<Utc>) -> bool {
        self.evaluate(company, now).is_empty()
    }

    /// Split a comma separated region list such as "US, EU"
    pub fn parse_geography(text: &str) -> Vec<String> {
        text.split([',', ';', '/'])
            .map(str::trim)
            .filter(|r| !r.is_empty())
            .map(str::to_string)
            .collect()
    }

    /// One-line summary for prompts and exports
    pub fn summary(&self) -> String {
        let geography = if self.geography.is_empty() {
            "Global".to_string()
        } else {
            self.geography.join(", ")
        };
        let mut parts = vec![self.stage.to_string(), geography];
        if let Some(months) = self.max_months_since_raise {
            parts.push(format!("raised within {} months", months));
        }
        parts.join(" · ")
    }
}

const US_STATES: &[&str] = &[
    "AL", "AK", "AZ", "AR", "CA", "CO", "CT", "DE", "FL", "GA", "HI", "ID", "IL", "IN", "IA", "KS",
    "KY", "LA", "ME", "MD", "MA", "MI", "MN", "MS", "MO", "MT", "NE", "NV", "NH", "NJ", "NM", "NY",
    "NC", "ND", "OH", "OK", "OR", "PA", "RI", "SC", "SD", "TN", "TX", "UT", "VT", "VA", "WA", "WV",
    "WI", "WY", "DC",
];

const EUROPE: &[&str] = &[
    "germany", "france", "netherlands", "spain", "italy", "sweden", "denmark", "finland",
    "norway", "ireland", "belgium", "austria", "portugal", "poland", "estonia", "switzerland",
    "united kingdom", "uk", "england", "scotland", "berlin", "paris", "london", "amsterdam",
    "stockholm", "dublin", "munich", "barcelona", "madrid", "copenhagen", "helsinki", "zurich",
];

fn is_known_location(location: &str) -> bool {
    let lower = location.trim().to_lowercase();
    !lower.is_empty() && lower != "unknown" && lower != "n/a"
}

const US_NAMES: &[&str] = &["usa", "u.s.", "u.s.a.", "united states", "united states of america"];

fn in_us(location: &str) -> bool {
    let parts: Vec<&str> = location.split(',').map(str::trim).collect();
    if parts.iter().any(|part| US_STATES.contains(part)) {
        return true;
    }
    parts.iter().any(|part| {
        let lower = part.to_lowercase();
        US_NAMES.contains(&lower.as_str())
            || lower.split_whitespace().any(|token| US_NAMES.contains(&token))
    })
}

fn in_europe(location: &str) -> bool {
    location
        .to_lowercase()
        .split(|c: char| c == ',' || c == '(' || c == ')')
        .map(str::trim)
        .any(|part| EUROPE.contains(&part))
}

fn in_canada(location: &str) -> bool {
    let lower = location.to_lowercase();
    ["canada", "toronto", "vancouver", "montreal", "ontario", "quebec", "british columbia"]
        .iter()
        .any(|m| lower.contains(m))
}

/// Whether a region name covers a free-text location
fn region_contains(region: &str, location: &str) -> bool {
    match region.trim().to_lowercase().as_str() {
        "global" | "worldwide" | "any" => true,
        "us" | "usa" | "united states" => in_us(location),
        "eu" | "europe" => in_europe(location),
        "canada" => in_canada(location),
        "north america" | "na" => in_us(location) || in_canada(location),
        other => location.to_lowercase().contains(other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::claim::{Basis, Claim, FundingField};
    use crate::fit::{FitAssessment, FitScore, FitThresholds};
    use crate::ids::SprintId;
    use crate::resolver::resolve;
    use crate::source::Source;
    use crate::trust::{SourceType, TrustTable};
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 1, 0, 0, 0).unwrap()
    }

    fn company_with_round(date: &str, round: &str, location: &str) -> Company {
        let mut company = Company::new(SprintId::from("s"), "Acme");
        company.location = Some(location.to_string());
        for (field, value) in [(FundingField::RoundDate, date), (FundingField::RoundType, round)] {
            let source = Source::new("https://acme.com/press", SourceType::PressRelease, "t", now(), value);
            let resolution = resolve(field, vec![source], Basis::Direct, &TrustTable::default());
            company
                .claims
                .push(Claim::from_resolution(company.id.clone(), resolution, now()));
        }
        company
    }

    #[test]
    fn test_stage_range_parse() {
        assert_eq!(StageRange::parse("All Stages").unwrap(), StageRange::ALL);
        assert_eq!(
            StageRange::parse("Seed – Series B").unwrap(),
            StageRange::between(RoundType::Seed, RoundType::SeriesB)
        );
        assert_eq!(
            StageRange::parse("Series B+").unwrap(),
            StageRange::from_stage(RoundType::SeriesB)
        );
        assert_eq!(
            StageRange::parse("Series C+").unwrap(),
            StageRange::from_stage(RoundType::SeriesCPlus)
        );
        assert_eq!(
            StageRange::parse("seed to series a").unwrap(),
            StageRange::between(RoundType::Seed, RoundType::SeriesA)
        );
        assert!(StageRange::parse("Pre-IPO unicorns").is_err());
    }

    #[test]
    fn test_stage_range_display_round_trips() {
        for text in ["All Stages", "Seed – Series B", "Series B+", "Series C+", "Series A"] {
            assert_eq!(StageRange::parse(text).unwrap().to_string(), text);
        }
    }

    #[test]
    fn test_stage_range_contains() {
        let range = StageRange::parse("Seed – Series B").unwrap();
        assert!(range.contains(RoundType::SeriesA));
        assert!(range.contains(RoundType::SeriesB));
        assert!(!range.contains(RoundType::SeriesCPlus));
    }

    #[test]
    fn test_old_raise_excluded_despite_high_fit() {
        let criteria = SprintCriteria {
            stage: StageRange::parse("Series B+").unwrap(),
            geography: vec!["US".into()],
            max_months_since_raise: Some(18),
            ..Default::default()
        };
        let mut company = company_with_round("2022-12-01", "Series B", "San Francisco, CA");
        company.fit = Some(FitAssessment::new(
            FitScore::new(95).unwrap(),
            vec![],
            None,
            &FitThresholds::default(),
        ));

        let misses = criteria.evaluate(&company, now());
        assert_eq!(misses, vec![CriteriaMiss::RaiseTooOld { months: 30, limit: 18 }]);
        assert!(!criteria.admits(&company, now()));
    }

    #[test]
    fn test_recent_raise_admitted() {
        let criteria = SprintCriteria {
            max_months_since_raise: Some(18),
            ..Default::default()
        };
        let company = company_with_round("2024-12-01", "Series A", "Berlin, Germany");
        assert!(criteria.admits(&company, now()));
    }

    #[test]
    fn test_geography_regions() {
        let criteria = SprintCriteria {
            geography: SprintCriteria::parse_geography("US, EU"),
            ..Default::default()
        };
        let sf = company_with_round("2025-01-01", "Seed", "San Francisco, CA");
        let berlin = company_with_round("2025-01-01", "Seed", "Berlin, Germany");
        let tokyo = company_with_round("2025-01-01", "Seed", "Tokyo, Japan");
        let austin = company_with_round("2025-01-01", "Seed", "Austin, Texas, United States");
        let jerusalem = company_with_round("2025-01-01", "Seed", "Jerusalem, Israel");
        let busan = company_with_round("2025-01-01", "Seed", "Busan, South Korea");
        let unknown = company_with_round("2025-01-01", "Seed", "Unknown");

        assert!(criteria.admits(&sf, now()));
        assert!(criteria.admits(&berlin, now()));
        assert!(criteria.admits(&unknown, now()));
        assert!(criteria.admits(&austin, now()));
        assert!(!criteria.admits(&jerusalem, now()));
        assert!(!criteria.admits(&busan, now()));
        assert_eq!(
            criteria.evaluate(&tokyo, now()),
            vec![CriteriaMiss::OutsideGeography { location: "Tokyo, Japan".into() }]
        );

        let global = SprintCriteria {
            geography: vec!["Global".into()],
            ..Default::default()
        };
        assert!(global.admits(&tokyo, now()));
    }

    #[test]
    fn test_excluded_keyword() {
        let criteria = SprintCriteria {
            keywords_exclude: vec!["crypto".into()],
            ..Default::default()
        };
        let mut company = Company::new(SprintId::from("s"), "ChainCo");
        company.tags = vec!["Crypto".into()];
        assert_eq!(
            criteria.evaluate(&company, now()),
            vec![CriteriaMiss::ExcludedKeyword { keyword: "crypto".into() }]
        );
    }

    #[test]
    fn test_unknown_facts_pass() {
        let criteria = SprintCriteria {
            stage: StageRange::parse("Series B+").unwrap(),
            geography: vec!["US".into()],
            max_months_since_raise: Some(6),
            ..Default::default()
        };
        let company = Company::new(SprintId::from("s"), "Mystery");
        assert!(criteria.admits(&company, now()));
    }

    #[test]
    fn test_criteria_json_shape() {
        let json = r#"{"stage":"Seed – Series B","geography":["US"],"max_months_since_raise":18}"#;
        let criteria: SprintCriteria = serde_json::from_str(json).unwrap();
        assert_eq!(criteria.stage.max, Some(RoundType::SeriesB));
        assert!(criteria.keywords_exclude.is_empty());
    }
}
