//! Request and response bodies of the JSON API

use serde::{Deserialize, Serialize};
use sprint_domain::traits::{CompanyFilter, CompanyQuery, SortKey};
use sprint_domain::{
    Company, FitAssessment, FitScore, FitThresholds, FundingField, FundingSnapshot, NewSprint,
    RankedCompanies, RoundType, Sprint, SprintCriteria, SprintId, SprintUpdate, StageRange,
    ValidationInputError,
};
use sprint_research::{AdjustedScore, RejectedCandidate};

/// Health check response
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Always "healthy" when the server answers
    pub status: String,
    /// Number of sprints in the store
    pub sprints: usize,
    /// Number of companies in the store
    pub companies: usize,
    /// Model used by the collaborators
    pub model: String,
}

/// Criteria as entered in a form
///
/// `stage` takes text such as "Seed – Series B" or "Series B+", and
/// `geography` a comma-separated list.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CriteriaForm {
    /// Stage range text
    pub stage: Option<String>,
    /// Comma-separated regions
    pub geography: Option<String>,
    /// Keywords a company should match
    pub keywords_include: Vec<String>,
    /// Keywords that rule a company out
    pub keywords_exclude: Vec<String>,
    /// Maximum age of the last raise
    pub max_months_since_raise: Option<u32>,
}

impl CriteriaForm {
    /// Parse into criteria
    pub fn into_criteria(self) -> Result<SprintCriteria, ValidationInputError> {
        let stage = match self.stage.as_deref() {
            Some(text) => StageRange::parse(text)?,
            None => StageRange::ALL,
        };
        Ok(SprintCriteria {
            stage,
            geography: self
                .geography
                .as_deref()
                .map(SprintCriteria::parse_geography)
                .unwrap_or_default(),
            keywords_include: clean_list(self.keywords_include),
            keywords_exclude: clean_list(self.keywords_exclude),
            max_months_since_raise: self.max_months_since_raise,
        })
    }
}

fn clean_list(items: Vec<String>) -> Vec<String> {
    items
        .into_iter()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

/// Body of `POST /sprints`
#[derive(Debug, Deserialize)]
pub struct CreateSprintRequest {
    /// Sprint name
    pub name: String,
    /// Thesis text
    #[serde(default)]
    pub thesis: String,
    /// Screening criteria
    #[serde(default)]
    pub criteria: Option<CriteriaForm>,
}

impl CreateSprintRequest {
    /// Convert into store input
    pub fn into_new_sprint(self) -> Result<NewSprint, ValidationInputError> {
        Ok(NewSprint {
            name: self.name,
            thesis: self.thesis,
            criteria: self.criteria.unwrap_or_default().into_criteria()?,
        })
    }
}

/// Body of `PUT /sprints/:id/criteria`
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct UpdateSprintRequest {
    /// New name
    pub name: Option<String>,
    /// New thesis
    pub thesis: Option<String>,
    /// New criteria
    pub criteria: Option<CriteriaForm>,
}

impl UpdateSprintRequest {
    /// Convert into a store update
    pub fn into_update(self) -> Result<SprintUpdate, ValidationInputError> {
        Ok(SprintUpdate {
            name: self.name,
            thesis: self.thesis,
            criteria: self.criteria.map(CriteriaForm::into_criteria).transpose()?,
            status: None,
        })
    }
}

/// A sprint with display fields
#[derive(Debug, Serialize)]
pub struct SprintView {
    /// The sprint
    #[serde(flatten)]
    pub sprint: Sprint,
    /// One-line criteria description
    pub criteria_summary: String,
    /// Number of companies
    pub company_count: usize,
}

impl From<Sprint> for SprintView {
    fn from(sprint: Sprint) -> Self {
        SprintView {
            criteria_summary: sprint.criteria.summary(),
            company_count: sprint.company_ids.len(),
            sprint,
        }
    }
}

/// Query string of `GET /sprints/:id/companies`
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct CompanyListParams {
    /// all, needs_review, conflicts, shortlisted
    pub filter: Option<String>,
    /// confidence, last_raised, amount, name
    pub sort: Option<String>,
    /// Text search
    pub q: Option<String>,
    /// Drop companies failing the sprint criteria
    pub criteria: Option<bool>,
    /// Maximum results
    pub limit: Option<usize>,
}

impl CompanyListParams {
    /// Parse into a store query
    pub fn into_query(self) -> Result<CompanyQuery, ValidationInputError> {
        Ok(CompanyQuery {
            filter: CompanyFilter::parse(self.filter.as_deref().unwrap_or_default())?,
            sort: SortKey::parse(self.sort.as_deref().unwrap_or_default())?,
            search: self.q.filter(|q| !q.trim().is_empty()),
            enforce_criteria: self.criteria.unwrap_or(false),
            as_of: None,
            limit: self.limit,
        })
    }
}

/// A company with its derived funding view
#[derive(Debug, Serialize)]
pub struct CompanyView {
    /// The company
    #[serde(flatten)]
    pub company: Company,
    /// Consolidated funding facts and labels
    pub funding: FundingSnapshot,
}

/// Body of `POST /sprints/:id/companies`
#[derive(Debug, Deserialize)]
pub struct NewCompanyRequest {
    /// Company name
    pub name: String,
    /// Description
    #[serde(default)]
    pub description: String,
    /// Website or domain
    #[serde(default)]
    pub website: Option<String>,
    /// Headquarters
    #[serde(default)]
    pub location: Option<String>,
    /// Tags
    #[serde(default)]
    pub tags: Vec<String>,
    /// Stage text, e.g. "Series A"
    #[serde(default)]
    pub stage: Option<String>,
    /// Fit score in [0, 100]
    #[serde(default)]
    pub fit_score: Option<i64>,
    /// Rationale bullets
    #[serde(default)]
    pub fit_reasons: Vec<String>,
    /// What to check next
    #[serde(default)]
    pub next_action: Option<String>,
}

impl NewCompanyRequest {
    /// Build an unstored company, rejecting a blank name, an unknown stage
    /// or a score outside [0, 100]
    pub fn into_company(
        self,
        sprint_id: SprintId,
        thresholds: &FitThresholds,
    ) -> Result<Company, ValidationInputError> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(ValidationInputError::MissingField("name".to_string()));
        }

        let stage = match self.stage.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            Some(text) => Some(RoundType::parse(text).ok_or_else(|| {
                ValidationInputError::invalid("stage", format!("unknown stage '{}'", text))
            })?),
            None => None,
        };

        let mut company = Company::new(sprint_id, name);
        company.description = self.description.trim().to_string();
        company.website = self.website.filter(|w| !w.trim().is_empty());
        company.location = self.location.filter(|l| !l.trim().is_empty());
        company.tags = clean_list(self.tags);
        company.stage = stage;
        if let Some(raw) = self.fit_score {
            company.fit = Some(FitAssessment::new(
                FitScore::new(raw)?,
                clean_list(self.fit_reasons),
                self.next_action,
                thresholds,
            ));
        }
        Ok(company)
    }
}

/// Body of `POST /sprints/:id/discover`
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct DiscoverRequest {
    /// Number of candidates wanted
    pub count: Option<usize>,
}

/// Result of a discovery run
#[derive(Debug, Serialize)]
pub struct DiscoverResponse {
    /// Number of companies added to the sprint
    pub added: usize,
    /// New companies split into fit buckets
    pub ranked: RankedCompanies,
    /// Scores clamped into range
    pub adjustments: Vec<AdjustedScore>,
    /// Entries skipped
    pub rejected: Vec<RejectedCandidate>,
}

/// Result of a validation run
#[derive(Debug, Serialize)]
pub struct ValidateResponse {
    /// The company with its new claims
    pub company: CompanyView,
    /// Malformed sources skipped
    pub dropped_sources: usize,
    /// Fields where the model's summary disagreed with its sources
    pub summary_mismatches: Vec<FundingField>,
}

/// Body of `PUT /companies/:id/shortlist`
#[derive(Debug, Deserialize)]
pub struct ShortlistRequest {
    /// none, pursue, watch, dismiss
    pub status: String,
}

/// Body of `POST /companies/:id/notes`
#[derive(Debug, Deserialize)]
pub struct NoteRequest {
    /// Note text
    pub text: String,
}

/// Query string of `GET /sprints/:id/export`
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ExportParams {
    /// csv, memo, email
    pub format: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_criteria_form() {
        let criteria = CriteriaForm {
            stage: Some("Series B+".into()),
            geography: Some("US, Europe".into()),
            keywords_include: vec![" AI ".into(), "".into()],
            ..Default::default()
        }
        .into_criteria()
        .unwrap();
        assert_eq!(criteria.geography, vec!["US".to_string(), "Europe".to_string()]);
        assert_eq!(criteria.keywords_include, vec!["AI".to_string()]);
        assert_eq!(criteria.stage, StageRange::parse("Series B+").unwrap());
    }

    #[test]
    fn test_new_company_rejects_bad_input() {
        let request = |name: &str, score: Option<i64>, stage: Option<&str>| NewCompanyRequest {
            name: name.into(),
            description: String::new(),
            website: None,
            location: None,
            tags: vec![],
            stage: stage.map(str::to_string),
            fit_score: score,
            fit_reasons: vec![],
            next_action: None,
        };
        let sprint = SprintId::from("s");
        let thresholds = FitThresholds::default();

        assert!(request("  ", None, None).into_company(sprint.clone(), &thresholds).is_err());
        assert!(matches!(
            request("Acme", Some(140), None).into_company(sprint.clone(), &thresholds),
            Err(ValidationInputError::ScoreOutOfRange { raw: 140 })
        ));
        assert!(request("Acme", None, Some("Series Z")).into_company(sprint.clone(), &thresholds).is_err());

        let company = request("Acme", Some(65), Some("Seed"))
            .into_company(sprint, &thresholds)
            .unwrap();
        assert_eq!(company.fit_score(), Some(65));
        assert_eq!(company.stage, Some(RoundType::Seed));
    }

    #[test]
    fn test_list_params() {
        let query = CompanyListParams {
            filter: Some("conflicts".into()),
            q: Some("  ".into()),
            criteria: Some(true),
            ..Default::default()
        }
        .into_query()
        .unwrap();
        assert_eq!(query.filter, CompanyFilter::Conflicts);
        assert_eq!(query.sort, SortKey::Confidence);
        assert!(query.search.is_none());
        assert!(query.enforce_criteria);
    }
}
