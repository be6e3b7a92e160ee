//! Funding validation for one company
//!
//! The model's top-level summary is never trusted. Each claim is re-derived
//! by the resolver from the individual sources the model cites.

use crate::call::call_llm;
use crate::config::ResearchConfig;
use crate::error::ResearchError;
use crate::parser::parse_funding_record;
use crate::prompt::FundingPrompt;
use crate::types::{FundingRecord, ValidationOutcome};
use chrono::{DateTime, Utc};
use sprint_domain::normalize::normalize_value;
use sprint_domain::traits::LlmProvider;
use sprint_domain::{resolve, Basis, Claim, Company, FundingField, RulesConfig, Source};
use std::fmt::Display;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Researches and resolves a company's funding claims
pub struct Researcher<L: ?Sized> {
    llm: Arc<L>,
    config: ResearchConfig,
    rules: RulesConfig,
}

impl<L> Researcher<L>
where
    L: LlmProvider + Send + Sync + ?Sized + 'static,
    L::Error: Display,
{
    /// Create a new Researcher
    pub fn new(llm: Arc<L>, config: ResearchConfig, rules: RulesConfig) -> Self {
        Self { llm, config, rules }
    }

    /// Research a company and resolve one claim per funding field
    ///
    /// Nothing is stored; the caller records the outcome.
    pub async fn validate(
        &self,
        company: &Company,
        now: DateTime<Utc>,
    ) -> Result<ValidationOutcome, ResearchError> {
        info!(company = %company.id, name = %company.name, "Researching funding");

        let prompt = FundingPrompt::new(&company.name, company.website.as_deref()).build();
        let response = call_llm(&self.llm, prompt, self.config.call_timeout()).await?;
        let record = parse_funding_record(&response)?;

        let outcome = self.resolve_record(company, record, now);
        info!(
            company = %company.id,
            confidence = outcome.snapshot.confidence.as_str(),
            dropped = outcome.dropped_sources,
            "Validation complete"
        );
        Ok(outcome)
    }

    fn resolve_record(&self, company: &Company, record: FundingRecord, now: DateTime<Utc>) -> ValidationOutcome {
        let claims: Vec<Claim> = FundingField::ALL
            .iter()
            .map(|&field| {
                let sources: Vec<Source> = record
                    .sources
                    .iter()
                    .flat_map(|s| {
                        s.claims
                            .iter()
                            .filter(move |(f, _)| *f == field)
                            .map(move |(_, value)| {
                                Source::new(&s.url, s.source_type, &s.title, s.observed_at, value.clone())
                            })
                    })
                    .collect();
                debug!("{}: {} source(s)", field, sources.len());

                let resolution = resolve(field, sources, basis_for(field, &record), &self.rules.trust);
                Claim::from_resolution(company.id.clone(), resolution, now)
            })
            .collect();

        let summary_mismatches = record
            .summary
            .iter()
            .filter(|(field, value)| {
                let agrees = claims.iter().any(|c| {
                    c.field == *field
                        && c.is_known()
                        && normalize_value(*field, &c.value) == normalize_value(*field, value)
                });
                if !agrees {
                    warn!(company = %company.id, "Summary {} '{}' is not backed by the sources", field, value);
                }
                !agrees
            })
            .map(|(field, _)| *field)
            .collect();

        let mut validated = company.clone();
        validated.claims = claims.clone();
        let snapshot = validated.snapshot(&self.rules.freshness, now);

        ValidationOutcome {
            claims,
            dropped_sources: record.dropped_sources,
            snapshot,
            summary_mismatches,
        }
    }
}

/// Basis tag for a field; valuations default to an estimate
fn basis_for(field: FundingField, record: &FundingRecord) -> Basis {
    let tagged = record
        .bases
        .iter()
        .find(|(f, _)| *f == field)
        .map(|(_, tag)| tag.as_str());
    let tag = match field {
        FundingField::Valuation => record.valuation_basis.as_deref().or(tagged),
        _ => tagged,
    };

    match (tag.and_then(Basis::parse), field) {
        (Some(basis), _) => basis,
        (None, FundingField::Valuation) => Basis::Estimate,
        (None, _) => Basis::Direct,
    }
}
