//! Thesis sprint aggregate

use crate::criteria::SprintCriteria;
use crate::error::ValidationInputError;
use crate::ids::{CompanyId, SprintId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Lifecycle state of a sprint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SprintStatus {
    /// Open for discovery and review
    #[default]
    Active,
    /// Kept for reference
    Archived,
}

/// A time-boxed search for companies matching one investment thesis
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sprint {
    /// Unique identifier
    pub id: SprintId,
    /// Sprint name
    pub name: String,
    /// Thesis text
    pub thesis: String,
    /// Investment criteria
    pub criteria: SprintCriteria,
    /// Lifecycle state
    pub status: SprintStatus,
    /// Member companies in insertion order
    pub company_ids: Vec<CompanyId>,
    /// Creation time
    pub created_at: DateTime<Utc>,
}

/// Input for creating a sprint
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewSprint {
    /// Sprint name
    pub name: String,
    /// Thesis text
    #[serde(default)]
    pub thesis: String,
    /// Investment criteria
    #[serde(default)]
    pub criteria: SprintCriteria,
}

/// Partial update of a sprint
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SprintUpdate {
    /// New name
    pub name: Option<String>,
    /// New thesis text
    pub thesis: Option<String>,
    /// Replacement criteria
    pub criteria: Option<SprintCriteria>,
    /// New lifecycle state
    pub status: Option<SprintStatus>,
}

fn required(field: &str, value: &str) -> Result<String, ValidationInputError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ValidationInputError::MissingField(field.to_string()));
    }
    Ok(trimmed.to_string())
}

impl Sprint {
    /// Create a sprint from user input
    pub fn create(input: NewSprint, now: DateTime<Utc>) -> Result<Self, ValidationInputError> {
        Ok(Self {
            id: SprintId::new(),
            name: required("name", &input.name)?,
            thesis: input.thesis.trim().to_string(),
            criteria: input.criteria,
            status: SprintStatus::Active,
            company_ids: Vec::new(),
            created_at: now,
        })
    }

    /// Apply a partial update; nothing changes if any part is invalid
    pub fn apply(&mut self, update: SprintUpdate) -> Result<(), ValidationInputError> {
        let name = update.name.as_deref().map(|n| required("name", n)).transpose()?;

        if let Some(name) = name {
            self.name = name;
        }
        if let Some(thesis) = update.thesis {
            self.thesis = thesis.trim().to_string();
        }
        if let Some(criteria) = update.criteria {
            self.criteria = criteria;
        }
        if let Some(status) = update.status {
            self.status = status;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::criteria::StageRange;

    #[test]
    fn test_create_requires_name() {
        let err = Sprint::create(NewSprint::default(), Utc::now()).unwrap_err();
        assert_eq!(err, ValidationInputError::MissingField("name".into()));

        let sprint = Sprint::create(
            NewSprint {
                name: "  Climate Fintech ".into(),
                ..Default::default()
            },
            Utc::now(),
        )
        .unwrap();
        assert_eq!(sprint.name, "Climate Fintech");
        assert_eq!(sprint.status, SprintStatus::Active);
    }

    #[test]
    fn test_apply_update() {
        let mut sprint = Sprint::create(
            NewSprint {
                name: "AI Dev Tools".into(),
                ..Default::default()
            },
            Utc::now(),
        )
        .unwrap();

        let criteria = SprintCriteria {
            stage: StageRange::parse("Series B+").unwrap(),
            ..Default::default()
        };
        sprint
            .apply(SprintUpdate {
                thesis: Some("Agents for code review".into()),
                criteria: Some(criteria.clone()),
                ..Default::default()
            })
            .unwrap();

        assert_eq!(sprint.name, "AI Dev Tools");
        assert_eq!(sprint.criteria, criteria);

        let before = sprint.clone();
        assert!(sprint
            .apply(SprintUpdate {
                name: Some(" ".into()),
                thesis: Some("changed".into()),
                ..Default::default()
            })
            .is_err());
        assert_eq!(sprint, before);
    }
}
