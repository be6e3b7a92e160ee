//! Rule tables
//!
//! Trust ranks, freshness thresholds and fit thresholds are configuration
//! with documented defaults. They load from the `[rules]` section of the
//! server configuration.

use crate::fit::FitThresholds;
use crate::freshness::FreshnessThresholds;
use crate::trust::TrustTable;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Invalid rule table
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RulesError {
    /// Trust ranks are not injective or name an unknown type
    #[error("Invalid trust table: {0}")]
    Trust(String),

    /// Freshness thresholds are not increasing
    #[error("Invalid freshness thresholds: {0}")]
    Freshness(String),

    /// Fit thresholds are out of order or range
    #[error("Invalid fit thresholds: {0}")]
    Fit(String),
}

/// All rule tables
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RulesConfig {
    /// Rank per source type
    pub trust: TrustTable,
    /// Freshness day thresholds
    pub freshness: FreshnessThresholds,
    /// Fit bucket bounds
    pub fit: FitThresholds,
}

impl RulesConfig {
    /// Validate every table
    pub fn validate(&self) -> Result<(), RulesError> {
        self.trust.validate().map_err(RulesError::Trust)?;
        self.freshness.validate().map_err(RulesError::Freshness)?;
        self.fit.validate().map_err(RulesError::Fit)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::trust::SourceType;

    #[test]
    fn test_defaults_are_valid() {
        assert!(RulesConfig::default().validate().is_ok());
    }

    #[test]
    fn test_load_from_toml() {
        let toml = r#"
[trust]
social = 25
wikipedia = 45

[freshness]
fresh_days = 60

[fit]
top = 85
"#;
        let rules: RulesConfig = toml::from_str(toml).unwrap();
        assert_eq!(rules.trust.rank(SourceType::Social), 25);
        assert_eq!(rules.trust.rank(SourceType::PressRelease), 100);
        assert_eq!(rules.freshness.fresh_days, 60);
        assert_eq!(rules.fit.top, 85);
        assert_eq!(rules.fit.worth, 60);
        assert!(rules.validate().is_ok());
    }

    #[test]
    fn test_duplicate_rank_rejected() {
        let rules = RulesConfig {
            trust: TrustTable::default().with_rank(SourceType::Social, 100),
            ..Default::default()
        };
        assert!(matches!(rules.validate(), Err(RulesError::Trust(_))));
    }

    #[test]
    fn test_bad_fit_rejected() {
        let rules = RulesConfig {
            fit: FitThresholds { top: 50, worth: 70 },
            ..Default::default()
        };
        assert!(matches!(rules.validate(), Err(RulesError::Fit(_))));
    }
}
