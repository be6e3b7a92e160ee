//! Demo seed data
//!
//! One populated "AI Developer Tools" sprint and two empty sprints. Every demo
//! claim runs through the resolver, so the seeded labels follow the same rules
//! as validated data.

use crate::StoreError;
use chrono::{DateTime, Duration, Utc};
use sprint_domain::{
    resolve, Basis, Claim, Company, CompanyId, FitAssessment, FitScore, FitThresholds,
    FundingField, NewSprint, RoundType, ShortlistStatus, Source, SourceType, Sprint,
    SprintCriteria, SprintId, StageRange, TrustTable, ValidationState,
};

/// (url, type, title, days ago, value)
type Evidence<'a> = (&'a str, SourceType, &'a str, i64, &'a str);

struct Seeder<'a> {
    trust: &'a TrustTable,
    now: DateTime<Utc>,
    fit: FitThresholds,
}

impl Seeder<'_> {
    fn claim(&self, company: &CompanyId, field: FundingField, basis: Basis, evidence: &[Evidence]) -> Claim {
        let sources = evidence
            .iter()
            .map(|(url, source_type, title, days_ago, value)| {
                Source::new(*url, *source_type, *title, self.now - Duration::days(*days_ago), *value)
            })
            .collect();
        Claim::from_resolution(company.clone(), resolve(field, sources, basis, self.trust), self.now)
    }

    fn company(
        &self,
        sprint: &SprintId,
        id: &str,
        name: &str,
        description: &str,
        location: &str,
        tags: &[&str],
    ) -> Company {
        let mut company = Company::new(sprint.clone(), name);
        company.id = CompanyId::from(id);
        company.description = description.to_string();
        company.location = Some(location.to_string());
        company.tags = tags.iter().map(|t| t.to_string()).collect();
        company.created_at = self.now;
        company
    }

    fn assess(
        &self,
        company: &mut Company,
        score: i64,
        rationale: &[&str],
        next_action: Option<&str>,
    ) -> Result<(), StoreError> {
        company.fit = Some(FitAssessment::new(
            FitScore::new(score)?,
            rationale.iter().map(|r| r.to_string()).collect(),
            next_action.map(str::to_string),
            &self.fit,
        ));
        Ok(())
    }

    fn validated(&self, company: &mut Company, claims: Vec<Claim>) {
        company.claims = claims;
        company.validation = ValidationState::Validated;
        company.validated_at = Some(self.now);
    }

    fn shortlist(&self, company: &mut Company, status: ShortlistStatus, days_ago: i64) {
        company.shortlist = status;
        company.shortlisted_at = Some(self.now - Duration::days(days_ago));
    }
}

pub(crate) fn fixtures(
    trust: &TrustTable,
    now: DateTime<Utc>,
) -> Result<(Vec<Sprint>, Vec<Company>), StoreError> {
    let seed = Seeder {
        trust,
        now,
        fit: FitThresholds::default(),
    };
    let sprint_id = SprintId::from("ai-dev-tools");

    // Cursor: every required field backed by a press release
    let mut cursor = seed.company(
        &sprint_id,
        "cursor",
        "Cursor",
        "AI-first code editor built on VS Code, featuring native AI code generation, chat, and codebase understanding.",
        "San Francisco, CA",
        &["AI coding", "IDE", "Developer Tools"],
    );
    cursor.website = Some("cursor.sh".into());
    cursor.stage = Some(RoundType::SeriesB);
    seed.assess(
        &mut cursor,
        92,
        &["Direct AI coding tool", "High growth trajectory", "Strong technical team"],
        None,
    )?;
    let id = cursor.id.clone();
    let claims = vec![
        seed.claim(&id, FundingField::RoundDate, Basis::Direct, &[
            ("https://cursor.sh/blog/series-b", SourceType::PressRelease, "Cursor blog post", 11, "2025-01-16"),
            ("https://techcrunch.com/cursor-series-b", SourceType::BusinessPress, "TechCrunch article", 11, "January 16, 2025"),
        ]),
        seed.claim(&id, FundingField::RoundType, Basis::Direct, &[
            ("https://cursor.sh/blog/series-b", SourceType::PressRelease, "Cursor blog post", 11, "Series B"),
            ("https://crunchbase.com/cursor", SourceType::DataPlatform, "Crunchbase", 10, "Series B"),
        ]),
        seed.claim(&id, FundingField::Amount, Basis::Direct, &[
            ("https://cursor.sh/blog/series-b", SourceType::PressRelease, "Cursor blog post", 11, "$105M"),
            ("https://techcrunch.com/cursor-series-b", SourceType::BusinessPress, "TechCrunch article", 11, "$105 million"),
            ("https://twitter.com/cursor", SourceType::Social, "Cursor Twitter", 12, "$100M"),
        ]),
        seed.claim(&id, FundingField::LeadInvestor, Basis::Direct, &[
            ("https://cursor.sh/blog/series-b", SourceType::PressRelease, "Cursor blog post", 11, "Thrive Capital"),
        ]),
    ];
    seed.validated(&mut cursor, claims);
    seed.shortlist(&mut cursor, ShortlistStatus::Pursue, 2);

    // Codeium: the two data platforms disagree on the round size
    let mut codeium = seed.company(
        &sprint_id,
        "codeium",
        "Codeium",
        "Free AI-powered code completion and search tool supporting 70+ languages with enterprise features.",
        "Mountain View, CA",
        &["AI coding", "Code completion", "Enterprise"],
    );
    codeium.website = Some("codeium.com".into());
    codeium.stage = Some(RoundType::SeriesCPlus);
    seed.assess(
        &mut codeium,
        85,
        &["Broad language coverage", "Enterprise traction"],
        None,
    )?;
    let id = codeium.id.clone();
    let claims = vec![
        seed.claim(&id, FundingField::RoundDate, Basis::Direct, &[
            ("https://techcrunch.com/codeium", SourceType::BusinessPress, "TechCrunch", 160, "2024-08-15"),
        ]),
        seed.claim(&id, FundingField::RoundType, Basis::Direct, &[
            ("https://techcrunch.com/codeium", SourceType::BusinessPress, "TechCrunch", 160, "Series C"),
        ]),
        seed.claim(&id, FundingField::Amount, Basis::Direct, &[
            ("https://crunchbase.com/codeium", SourceType::DataPlatform, "Crunchbase", 158, "$150M"),
            ("https://pitchbook.com/codeium", SourceType::DataPlatform, "PitchBook", 155, "$165M"),
        ]),
        seed.claim(&id, FundingField::LeadInvestor, Basis::Direct, &[
            ("https://techcrunch.com/codeium", SourceType::BusinessPress, "TechCrunch", 160, "Greenoaks"),
        ]),
    ];
    seed.validated(&mut codeium, claims);
    seed.shortlist(&mut codeium, ShortlistStatus::Pursue, 3);

    // Replit: agreeing secondary sources only
    let mut replit = seed.company(
        &sprint_id,
        "replit",
        "Replit",
        "Browser-based IDE with AI coding assistant, multiplayer collaboration, and instant deployment.",
        "San Francisco, CA",
        &["AI coding", "Cloud IDE", "Education"],
    );
    replit.website = Some("replit.com".into());
    replit.stage = Some(RoundType::SeriesB);
    seed.assess(
        &mut replit,
        74,
        &["Large developer community", "AI assistant bundled into the IDE"],
        None,
    )?;
    let id = replit.id.clone();
    let claims = vec![
        seed.claim(&id, FundingField::RoundDate, Basis::Direct, &[
            ("https://a16z.com/announcement/investing-in-replit", SourceType::InvestorBlog, "a16z announcement", 640, "April 2023"),
            ("https://crunchbase.com/replit", SourceType::DataPlatform, "Crunchbase", 635, "2023-04-01"),
        ]),
        seed.claim(&id, FundingField::RoundType, Basis::Direct, &[
            ("https://a16z.com/announcement/investing-in-replit", SourceType::InvestorBlog, "a16z announcement", 640, "Series B"),
        ]),
        seed.claim(&id, FundingField::Amount, Basis::Direct, &[
            ("https://a16z.com/announcement/investing-in-replit", SourceType::InvestorBlog, "a16z announcement", 640, "$97.4M"),
            ("https://crunchbase.com/replit", SourceType::DataPlatform, "Crunchbase", 635, "$97,400,000"),
        ]),
        seed.claim(&id, FundingField::LeadInvestor, Basis::Direct, &[
            ("https://a16z.com/announcement/investing-in-replit", SourceType::InvestorBlog, "a16z announcement", 640, "a16z"),
        ]),
    ];
    seed.validated(&mut replit, claims);
    seed.shortlist(&mut replit, ShortlistStatus::Watch, 1);

    // CodeWhisperer Labs: a single tweet, no amount
    let mut codewhisperer = seed.company(
        &sprint_id,
        "codewhisperer-labs",
        "CodeWhisperer Labs",
        "Stealth-mode AI debugging platform with automated root cause analysis.",
        "Unknown",
        &["AI coding", "Debugging", "Stealth"],
    );
    codewhisperer.stage = Some(RoundType::Seed);
    seed.assess(
        &mut codewhisperer,
        55,
        &["Debugging is underserved by current assistants"],
        Some("Confirm the seed round with a second source"),
    )?;
    let id = codewhisperer.id.clone();
    let claims = vec![
        seed.claim(&id, FundingField::RoundDate, Basis::Rumor, &[
            ("https://twitter.com/vcinsider", SourceType::Social, "VC Insider tweet", 120, "2024-09"),
        ]),
        seed.claim(&id, FundingField::RoundType, Basis::Rumor, &[
            ("https://twitter.com/vcinsider", SourceType::Social, "VC Insider tweet", 120, "Seed"),
        ]),
        seed.claim(&id, FundingField::Amount, Basis::Direct, &[]),
    ];
    seed.validated(&mut codewhisperer, claims);

    // Sourcegraph: well documented but old
    let mut sourcegraph = seed.company(
        &sprint_id,
        "sourcegraph",
        "Sourcegraph",
        "Code intelligence platform with universal code search and AI-powered coding assistant (Cody).",
        "San Francisco, CA",
        &["AI coding", "Code Search", "Enterprise"],
    );
    sourcegraph.website = Some("sourcegraph.com".into());
    sourcegraph.stage = Some(RoundType::SeriesCPlus);
    seed.assess(
        &mut sourcegraph,
        68,
        &["Code search moat", "Cody assistant"],
        None,
    )?;
    let id = sourcegraph.id.clone();
    let claims = vec![
        seed.claim(&id, FundingField::RoundDate, Basis::Direct, &[
            ("https://sourcegraph.com/blog/series-d", SourceType::PressRelease, "Sourcegraph Blog", 1300, "2021-07-13"),
            ("https://techcrunch.com/sourcegraph", SourceType::BusinessPress, "TechCrunch", 1298, "July 13, 2021"),
        ]),
        seed.claim(&id, FundingField::RoundType, Basis::Direct, &[
            ("https://sourcegraph.com/blog/series-d", SourceType::PressRelease, "Sourcegraph Blog", 1300, "Series D"),
        ]),
        seed.claim(&id, FundingField::Amount, Basis::Direct, &[
            ("https://sourcegraph.com/blog/series-d", SourceType::PressRelease, "Sourcegraph Blog", 1300, "$125M"),
            ("https://crunchbase.com/sourcegraph", SourceType::DataPlatform, "Crunchbase", 1295, "$125M"),
        ]),
        seed.claim(&id, FundingField::LeadInvestor, Basis::Direct, &[
            ("https://sourcegraph.com/blog/series-d", SourceType::PressRelease, "Sourcegraph Blog", 1300, "Andreessen Horowitz"),
        ]),
    ];
    seed.validated(&mut sourcegraph, claims);
    seed.shortlist(&mut sourcegraph, ShortlistStatus::Pursue, 4);

    let companies = vec![cursor, codeium, replit, codewhisperer, sourcegraph];

    let mut ai_dev_tools = Sprint::create(
        NewSprint {
            name: "AI Developer Tools".into(),
            thesis: "Companies building AI-powered tools that augment software developers' productivity, \
                     including code generation, code review, debugging assistants, and intelligent IDE \
                     features. Focus on Series A–B stage with demonstrated traction."
                .into(),
            criteria: SprintCriteria {
                stage: StageRange::parse("Seed – Series B")?,
                geography: SprintCriteria::parse_geography("US, EU"),
                keywords_include: vec![
                    "AI coding".into(),
                    "copilot".into(),
                    "code generation".into(),
                    "IDE".into(),
                ],
                keywords_exclude: vec!["blockchain".into(), "crypto".into()],
                max_months_since_raise: Some(18),
            },
        },
        now,
    )?;
    ai_dev_tools.id = sprint_id;
    ai_dev_tools.company_ids = companies.iter().map(|c| c.id.clone()).collect();

    let mut climate = Sprint::create(
        NewSprint {
            name: "Climate Fintech".into(),
            thesis: "Financial technology solutions focused on climate and sustainability.".into(),
            criteria: SprintCriteria {
                keywords_include: vec![
                    "climate".into(),
                    "carbon".into(),
                    "ESG".into(),
                    "sustainability".into(),
                ],
                ..Default::default()
            },
        },
        now,
    )?;
    climate.id = SprintId::from("climate-fintech");

    let mut healthcare = Sprint::create(
        NewSprint {
            name: "Healthcare LLMs".into(),
            thesis: "Large language models and AI applications in healthcare.".into(),
            criteria: SprintCriteria {
                keywords_include: vec![
                    "healthcare".into(),
                    "medical AI".into(),
                    "clinical".into(),
                ],
                ..Default::default()
            },
        },
        now,
    )?;
    healthcare.id = SprintId::from("healthcare-llms");

    Ok((vec![ai_dev_tools, climate, healthcare], companies))
}
