//! CSV rows for CRM import

use crate::{Result, ShortlistExport};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sprint_domain::{Company, CompanyId, FreshnessThresholds, ShortlistStatus};
use std::io::{Read, Write};

/// Maximum source links per row
const MAX_SOURCE_LINKS: usize = 3;

/// One shortlisted company as a spreadsheet row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShortlistRow {
    /// Stable company identifier
    #[serde(rename = "Company ID")]
    pub company_id: CompanyId,
    /// Company name
    #[serde(rename = "Company")]
    pub company: String,
    /// Shortlist decision
    #[serde(rename = "Status")]
    pub status: ShortlistStatus,
    /// Current stage
    #[serde(rename = "Stage")]
    pub stage: String,
    /// Last round type
    #[serde(rename = "Last Round")]
    pub last_round: String,
    /// Last round date (YYYY-MM-DD)
    #[serde(rename = "Date")]
    pub date: String,
    /// Last round amount
    #[serde(rename = "Amount")]
    pub amount: String,
    /// Lead investor
    #[serde(rename = "Lead Investor")]
    pub lead_investor: String,
    /// Valuation
    #[serde(rename = "Valuation")]
    pub valuation: String,
    /// Company confidence label
    #[serde(rename = "Confidence")]
    pub confidence: String,
    /// Freshness of the last round
    #[serde(rename = "Freshness")]
    pub freshness: String,
    /// Fit score, if assessed
    #[serde(rename = "Fit Score")]
    pub fit_score: Option<u8>,
    /// Fit notes, oldest first
    #[serde(rename = "Notes")]
    pub notes: String,
    /// Up to three cited URLs
    #[serde(rename = "Source Links")]
    pub source_links: String,
}

impl ShortlistRow {
    /// Build the row for a company
    pub fn from_company(company: &Company, freshness: &FreshnessThresholds, now: DateTime<Utc>) -> Self {
        let snapshot = company.snapshot(freshness, now);

        let mut links: Vec<&str> = Vec::new();
        for source in company.claims.iter().flat_map(|c| c.sources.iter()) {
            if links.len() == MAX_SOURCE_LINKS {
                break;
            }
            if !links.contains(&source.url.as_str()) {
                links.push(&source.url);
            }
        }

        Self {
            company_id: company.id.clone(),
            company: company.name.clone(),
            status: company.shortlist,
            stage: company
                .current_stage()
                .map(|s| s.as_str().to_string())
                .unwrap_or_default(),
            last_round: snapshot.last_round_type.unwrap_or_default(),
            date: snapshot
                .last_round_date
                .map(|d| d.format("%Y-%m-%d").to_string())
                .unwrap_or_default(),
            amount: snapshot.amount.unwrap_or_default(),
            lead_investor: snapshot.lead_investor.unwrap_or_default(),
            valuation: snapshot.valuation.unwrap_or_default(),
            confidence: snapshot.confidence.as_str().to_string(),
            freshness: snapshot
                .freshness
                .map(|f| f.as_str().to_string())
                .unwrap_or_default(),
            fit_score: company.fit_score(),
            notes: company
                .notes
                .iter()
                .map(|n| n.text.as_str())
                .collect::<Vec<_>>()
                .join("; "),
            source_links: links.join("; "),
        }
    }
}

/// Write the shortlist as CSV with a header row
pub fn write_shortlist_csv<W: Write>(export: &ShortlistExport<'_>, writer: W) -> Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    for company in export.companies {
        csv_writer.serialize(ShortlistRow::from_company(company, export.freshness, export.generated_at))?;
    }
    if export.companies.is_empty() {
        // serialize() writes the header lazily; an empty export still gets one
        csv_writer.write_record(HEADERS)?;
    }
    csv_writer.flush()?;
    Ok(())
}

/// Read rows previously written by [`write_shortlist_csv`]
pub fn read_shortlist_csv<R: Read>(reader: R) -> Result<Vec<ShortlistRow>> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut rows = Vec::new();
    for result in csv_reader.deserialize() {
        let row: ShortlistRow = result?;
        rows.push(row);
    }
    Ok(rows)
}

const HEADERS: [&str; 14] = [
    "Company ID",
    "Company",
    "Status",
    "Stage",
    "Last Round",
    "Date",
    "Amount",
    "Lead Investor",
    "Valuation",
    "Confidence",
    "Freshness",
    "Fit Score",
    "Notes",
    "Source Links",
];
