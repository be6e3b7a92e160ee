//! Stage module - funding round types in ladder order

use serde::{Deserialize, Serialize};
use std::fmt;

/// Funding round type
///
/// Rounds progress through a fixed ladder; everything past Series B
/// (Series C, D, growth rounds) collapses into `SeriesCPlus`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoundType {
    /// Pre-seed and seed rounds
    Seed,

    /// Series A
    SeriesA,

    /// Series B
    SeriesB,

    /// Series C and later, including growth rounds
    SeriesCPlus,
}

impl RoundType {
    /// All round types in ladder order
    pub const ALL: [RoundType; 4] = [
        RoundType::Seed,
        RoundType::SeriesA,
        RoundType::SeriesB,
        RoundType::SeriesCPlus,
    ];

    /// Get the display label
    pub fn as_str(&self) -> &'static str {
        match self {
            RoundType::Seed => "Seed",
            RoundType::SeriesA => "Series A",
            RoundType::SeriesB => "Series B",
            RoundType::SeriesCPlus => "Series C+",
        }
    }

    /// Parse a round type from free text such as "Series B", "seed (rumored)"
    /// or "Growth"
    pub fn parse(s: &str) -> Option<Self> {
        let lower = s.trim().to_lowercase().replace(['_', '-'], " ");
        let lower = lower.trim_end_matches('+').trim();

        if lower.contains("seed") || lower == "angel" {
            return Some(RoundType::Seed);
        }
        if lower.contains("growth") || lower.contains("late") {
            return Some(RoundType::SeriesCPlus);
        }

        let letter = lower
            .strip_prefix("series")
            .map(str::trim)
            .and_then(|rest| rest.chars().next())?;

        match letter {
            'a' => Some(RoundType::SeriesA),
            'b' => Some(RoundType::SeriesB),
            'c'..='h' => Some(RoundType::SeriesCPlus),
            _ => None,
        }
    }
}

impl fmt::Display for RoundType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for RoundType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("Invalid round type: {}", s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_variants() {
        assert_eq!(RoundType::parse("Series B"), Some(RoundType::SeriesB));
        assert_eq!(RoundType::parse("series_a"), Some(RoundType::SeriesA));
        assert_eq!(RoundType::parse("Seed (rumored)"), Some(RoundType::Seed));
        assert_eq!(RoundType::parse("Pre-Seed"), Some(RoundType::Seed));
        assert_eq!(RoundType::parse("Series D"), Some(RoundType::SeriesCPlus));
        assert_eq!(RoundType::parse("Series C+"), Some(RoundType::SeriesCPlus));
        assert_eq!(RoundType::parse("Growth"), Some(RoundType::SeriesCPlus));
        assert_eq!(RoundType::parse("series_c_plus"), Some(RoundType::SeriesCPlus));
        assert_eq!(RoundType::parse("IPO"), None);
        assert_eq!(RoundType::parse(""), None);
    }

    #[test]
    fn test_ladder_ordering() {
        assert!(RoundType::Seed < RoundType::SeriesA);
        assert!(RoundType::SeriesB < RoundType::SeriesCPlus);
    }
}
