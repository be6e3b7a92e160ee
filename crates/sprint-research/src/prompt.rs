//! Prompt construction for discovery and funding research

use sprint_domain::SprintCriteria;

/// Builds the candidate-generation prompt
pub struct DiscoveryPrompt<'a> {
    thesis: &'a str,
    criteria: &'a SprintCriteria,
    count: usize,
    exclude_names: Vec<&'a str>,
}

impl<'a> DiscoveryPrompt<'a> {
    /// Create a new discovery prompt
    pub fn new(thesis: &'a str, criteria: &'a SprintCriteria, count: usize) -> Self {
        Self {
            thesis,
            criteria,
            count,
            exclude_names: Vec::new(),
        }
    }

    /// List companies the model should not suggest again
    pub fn excluding(mut self, names: &'a [String], limit: usize) -> Self {
        self.exclude_names = names.iter().take(limit).map(String::as_str).collect();
        self
    }

    /// Build the complete prompt
    pub fn build(&self) -> String {
        let include = join_or(&self.criteria.keywords_include, "none specified");
        let exclude = join_or(&self.criteria.keywords_exclude, "none");
        let geography = join_or(&self.criteria.geography, "Global");
        let recency = match self.criteria.max_months_since_raise {
            Some(months) => format!("last raised within {} months", months),
            None => "any".to_string(),
        };

        let mut prompt = format!(
            "You are a senior VC researcher. Generate a list of {count} companies that match this investment thesis.\n\n\
             THESIS:\n{thesis}\n\n\
             CRITERIA:\n\
             - Stage preference: {stage}\n\
             - Geography: {geography}\n\
             - Funding recency: {recency}\n\
             - Include keywords: {include}\n\
             - Exclude keywords: {exclude}\n\n",
            count = self.count,
            thesis = self.thesis.trim(),
            stage = self.criteria.stage,
        );

        if !self.exclude_names.is_empty() {
            prompt.push_str("Already in the sprint (do not repeat):\n");
            for name in &self.exclude_names {
                prompt.push_str(&format!("- {}\n", name));
            }
            prompt.push('\n');
        }

        prompt.push_str(DISCOVERY_REQUIREMENTS);
        prompt
    }
}

/// Builds the funding-research prompt for one company
pub struct FundingPrompt<'a> {
    name: &'a str,
    website: Option<&'a str>,
}

impl<'a> FundingPrompt<'a> {
    /// Create a new funding prompt
    pub fn new(name: &'a str, website: Option<&'a str>) -> Self {
        Self { name, website }
    }

    /// Build the complete prompt
    pub fn build(&self) -> String {
        let mut prompt = format!("Research the most recent funding round of {}", self.name.trim());
        if let Some(website) = self.website.filter(|w| !w.trim().is_empty()) {
            prompt.push_str(&format!(" ({})", website.trim()));
        }
        prompt.push_str(".\n\n");
        prompt.push_str(FUNDING_REQUIREMENTS);
        prompt
    }
}

fn join_or(items: &[String], empty: &str) -> String {
    if items.is_empty() {
        empty.to_string()
    } else {
        items.join(", ")
    }
}

const DISCOVERY_REQUIREMENTS: &str = r#"REQUIREMENTS:
1. Ensure companies are real, findable businesses (not hypothetical)
2. Prefer companies with recent funding activity
3. Include a mix of well-known and emerging players
4. Vary the fit scores realistically (not all 90+)
5. For each company, provide:
   - name
   - domain (if publicly known, or "unknown")
   - 1-line description (15-25 words)
   - stage estimate (Seed / Series A / Series B / Series C+)
   - headquarters location
   - fit_score (0-100, where 100 is a perfect thesis fit)
   - 2-3 fit_reasons (10-15 words each)
   - tags
   - next_action: what to validate next, for fits below 70

OUTPUT FORMAT:
[
  {
    "name": "Company Name",
    "domain": "company.com",
    "description": "What they do",
    "stage": "Series B",
    "location": "San Francisco, CA",
    "fit_score": 85,
    "fit_reasons": ["Reason 1", "Reason 2"],
    "tags": ["tag1", "tag2"],
    "next_action": "Verify enterprise focus vs SMB"
  }
]

Return ONLY the JSON array, no markdown formatting or explanation."#;

const FUNDING_REQUIREMENTS: &str = r#"Report every source you relied on. Each source states only the values it
actually contains; do not copy values between sources.

Fields: round_date (YYYY-MM-DD), round_type, amount, lead_investor, valuation.
Source types: press_release, regulatory_filing, business_press,
investor_blog, data_platform, wikipedia, directory, social.
For the valuation, give valuation_basis: direct, secondary, implied,
rumor or estimate. Use "basis" to flag any other field that is only a rumor
or an estimate.

OUTPUT FORMAT:
{
  "round_date": "2025-01-16",
  "round_type": "Series B",
  "amount": "$105M",
  "lead_investor": "Thrive Capital",
  "valuation": "$2.5B",
  "valuation_basis": "secondary",
  "basis": {"lead_investor": "direct"},
  "sources": [
    {
      "url": "https://example.com/news/series-b",
      "type": "press_release",
      "title": "Example raises $105M Series B",
      "timestamp": "2025-01-16T00:00:00Z",
      "claims": {"round_date": "2025-01-16", "round_type": "Series B", "amount": "$105M"}
    }
  ]
}

Return ONLY the JSON object, no markdown formatting or explanation."#;
