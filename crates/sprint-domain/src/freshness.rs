//! Freshness classification of funding timestamps

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Recency bucket of a timestamp
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Freshness {
    /// Younger than the fresh threshold
    Fresh,
    /// Younger than the recent threshold
    Recent,
    /// Younger than the stale threshold
    Stale,
    /// Everything older
    Old,
}

impl Freshness {
    /// Get the canonical key
    pub fn as_str(&self) -> &'static str {
        match self {
            Freshness::Fresh => "fresh",
            Freshness::Recent => "recent",
            Freshness::Stale => "stale",
            Freshness::Old => "old",
        }
    }
}

impl fmt::Display for Freshness {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Day thresholds separating the freshness buckets (exclusive upper bounds)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FreshnessThresholds {
    /// Ages below this many days are Fresh
    pub fresh_days: i64,
    /// Ages below this many days are Recent
    pub recent_days: i64,
    /// Ages below this many days are Stale
    pub stale_days: i64,
}

impl Default for FreshnessThresholds {
    fn default() -> Self {
        Self {
            fresh_days: 90,
            recent_days: 270,
            stale_days: 540,
        }
    }
}

impl FreshnessThresholds {
    /// Classify a timestamp relative to `now`
    ///
    /// Future-dated timestamps count as Fresh.
    pub fn classify(&self, at: DateTime<Utc>, now: DateTime<Utc>) -> Freshness {
        let age_days = (now - at).num_days();
        if age_days < self.fresh_days {
            Freshness::Fresh
        } else if age_days < self.recent_days {
            Freshness::Recent
        } else if age_days < self.stale_days {
            Freshness::Stale
        } else {
            Freshness::Old
        }
    }

    /// Thresholds must be positive and strictly increasing
    pub fn validate(&self) -> Result<(), String> {
        if self.fresh_days <= 0 {
            return Err(format!("fresh_days must be positive, got {}", self.fresh_days));
        }
        if self.recent_days <= self.fresh_days || self.stale_days <= self.recent_days {
            return Err(format!(
                "freshness thresholds must increase: {} < {} < {}",
                self.fresh_days, self.recent_days, self.stale_days
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_default_buckets() {
        let t = FreshnessThresholds::default();
        let now = Utc::now();
        assert_eq!(t.classify(now - Duration::days(10), now), Freshness::Fresh);
        assert_eq!(t.classify(now - Duration::days(89), now), Freshness::Fresh);
        assert_eq!(t.classify(now - Duration::days(90), now), Freshness::Recent);
        assert_eq!(t.classify(now - Duration::days(270), now), Freshness::Stale);
        assert_eq!(t.classify(now - Duration::days(540), now), Freshness::Old);
    }

    #[test]
    fn test_future_is_fresh() {
        let now = Utc::now();
        let t = FreshnessThresholds::default();
        assert_eq!(t.classify(now + Duration::days(30), now), Freshness::Fresh);
    }

    #[test]
    fn test_validate_rejects_unordered() {
        assert!(FreshnessThresholds::default().validate().is_ok());
        let bad = FreshnessThresholds {
            fresh_days: 100,
            recent_days: 90,
            stale_days: 540,
        };
        assert!(bad.validate().is_err());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let t: FreshnessThresholds = toml::from_str("fresh_days = 30").unwrap();
        assert_eq!(t.fresh_days, 30);
        assert_eq!(t.recent_days, 270);
    }
}
