//! Candidate generation from a thesis

use crate::call::call_llm;
use crate::config::ResearchConfig;
use crate::error::ResearchError;
use crate::parser::parse_candidates;
use crate::prompt::DiscoveryPrompt;
use crate::types::{AdjustedScore, CandidateRecord, DiscoveryReport, DiscoveryRequest, RejectedCandidate};
use sprint_domain::traits::LlmProvider;
use sprint_domain::{rank_companies, Company, FitAssessment, FitScore, FitThresholds, RankedCompanies, RoundType, SprintId};
use std::collections::HashSet;
use std::fmt::Display;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Generates candidate companies for a sprint
pub struct Discovery<L: ?Sized> {
    llm: Arc<L>,
    config: ResearchConfig,
    thresholds: FitThresholds,
}

impl<L> Discovery<L>
where
    L: LlmProvider + Send + Sync + ?Sized + 'static,
    L::Error: Display,
{
    /// Create a new Discovery
    pub fn new(llm: Arc<L>, config: ResearchConfig, thresholds: FitThresholds) -> Self {
        Self {
            llm,
            config,
            thresholds,
        }
    }

    /// Ask the model for candidates and turn them into unstored companies
    ///
    /// Candidates without a name, duplicates (by case-insensitive name,
    /// including companies already in the sprint) and entries beyond the
    /// requested count are reported in `rejected`.
    pub async fn discover(&self, request: &DiscoveryRequest) -> Result<DiscoveryReport, ResearchError> {
        let count = self.config.effective_target(request.target_count);
        let prompt = DiscoveryPrompt::new(&request.thesis, &request.criteria, count)
            .excluding(&request.exclude_names, self.config.context_names_limit)
            .build();

        info!(sprint = %request.sprint_id, count, "Starting discovery");

        let response = call_llm(&self.llm, prompt, self.config.call_timeout()).await?;
        let (records, mut rejected) = parse_candidates(&response)?;

        let mut seen: HashSet<String> = request
            .exclude_names
            .iter()
            .map(|n| n.trim().to_lowercase())
            .collect();
        let mut companies = Vec::new();
        let mut adjustments = Vec::new();

        for record in records {
            let reject = |reason: &str| RejectedCandidate {
                index: record.index,
                name: Some(record.name.clone()),
                reason: reason.to_string(),
            };
            if !seen.insert(record.name.to_lowercase()) {
                debug!("Skipping duplicate candidate '{}'", record.name);
                rejected.push(reject("Duplicate company"));
                continue;
            }
            if companies.len() >= count {
                rejected.push(reject("Beyond requested count"));
                continue;
            }

            let (company, adjustment) = self.build_company(&request.sprint_id, record);
            if let Some(adjustment) = adjustment {
                warn!(
                    "Clamped fit score for '{}' from {} to {}",
                    company.name,
                    adjustment.raw,
                    adjustment.applied.value()
                );
                adjustments.push(AdjustedScore {
                    company: company.name.clone(),
                    adjustment,
                });
            }
            companies.push(company);
        }

        rejected.sort_by_key(|r| r.index);
        info!(
            "Discovery complete: {} companies, {} adjusted, {} rejected",
            companies.len(),
            adjustments.len(),
            rejected.len()
        );

        Ok(DiscoveryReport {
            companies,
            adjustments,
            rejected,
        })
    }

    fn build_company(
        &self,
        sprint_id: &SprintId,
        record: CandidateRecord,
    ) -> (Company, Option<sprint_domain::ScoreAdjustment>) {
        let mut company = Company::new(sprint_id.clone(), record.name);
        company.description = record.description;
        company.website = record.domain;
        company.location = record.location;
        company.tags = record.tags;
        company.stage = record.stage.as_deref().and_then(RoundType::parse);

        let Some(raw) = record.fit_score else {
            debug!("No fit score for '{}'", company.name);
            return (company, None);
        };
        let (score, adjustment) = FitScore::clamped(raw);
        company.fit = Some(FitAssessment::new(
            score,
            record.fit_reasons,
            record.next_action,
            &self.thresholds,
        ));
        (company, adjustment)
    }
}

impl DiscoveryReport {
    /// Split the generated companies into fit buckets
    pub fn ranked(&self, top_cap: usize) -> RankedCompanies {
        rank_companies(self.companies.clone(), top_cap)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sprint_domain::{FitBucket, SprintCriteria};
    use sprint_llm::MockProvider;

    fn request() -> DiscoveryRequest {
        DiscoveryRequest {
            sprint_id: SprintId::from("ai-dev-tools"),
            thesis: "AI developer tools".to_string(),
            criteria: SprintCriteria::default(),
            target_count: Some(3),
            exclude_names: vec!["Cursor".to_string()],
        }
    }

    fn discovery(response: &str) -> Discovery<MockProvider> {
        Discovery::new(
            Arc::new(MockProvider::new(response)),
            ResearchConfig::default(),
            FitThresholds::default(),
        )
    }

    #[tokio::test]
    async fn test_builds_companies() {
        let discovery = discovery(
            r#"[{"name": "Tabnine", "domain": "tabnine.com", "stage": "Series B", "fit_score": 81,
                 "fit_reasons": ["Enterprise focus"], "tags": ["ai"], "location": "Tel Aviv, Israel"}]"#,
        );
        let report = discovery.discover(&request()).await.unwrap();
        assert_eq!(report.companies.len(), 1);

        let company = &report.companies[0];
        assert_eq!(company.sprint_id, SprintId::from("ai-dev-tools"));
        assert_eq!(company.website.as_deref(), Some("tabnine.com"));
        assert_eq!(company.stage, Some(RoundType::SeriesB));
        let fit = company.fit.as_ref().unwrap();
        assert_eq!(fit.bucket, FitBucket::TopRecommendation);
        assert_eq!(fit.rationale, vec!["Enterprise focus"]);
    }

    #[tokio::test]
    async fn test_duplicates_and_overflow_rejected() {
        let discovery = discovery(
            r#"[{"name": "cursor", "fit_score": 90},
                {"name": "A", "fit_score": 50},
                {"name": "a", "fit_score": 55},
                {"name": "B", "fit_score": 60},
                {"name": "C", "fit_score": 70},
                {"name": "D", "fit_score": 75}]"#,
        );
        let report = discovery.discover(&request()).await.unwrap();
        let names: Vec<_> = report.companies.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["A", "B", "C"]);

        let reasons: Vec<_> = report.rejected.iter().map(|r| (r.index, r.reason.as_str())).collect();
        assert_eq!(
            reasons,
            vec![
                (0, "Duplicate company"),
                (2, "Duplicate company"),
                (5, "Beyond requested count"),
            ]
        );
    }

    #[tokio::test]
    async fn test_missing_score_leaves_fit_unassessed() {
        let discovery = discovery(r#"[{"name": "Warp"}]"#);
        let report = discovery.discover(&request()).await.unwrap();
        assert!(report.companies[0].fit.is_none());
        assert!(report.adjustments.is_empty());

        let ranked = report.ranked(10);
        assert_eq!(ranked.maybe.len(), 1);
    }
}
