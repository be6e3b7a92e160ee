//! Markdown investment memo

use crate::{capitalize, ShortlistExport};
use sprint_domain::{Company, FundingSnapshot};
use std::fmt::Write;
use tabled::{builder::Builder, settings::Style};

/// Companies covered in the memo body
pub const MEMO_COMPANY_LIMIT: usize = 10;

const NOT_AVAILABLE: &str = "N/A";

/// Render the memo: executive summary table, thesis and criteria,
/// per-company detail, then an appendix of sources and resolution notes
pub fn render_memo(export: &ShortlistExport<'_>) -> String {
    let sprint = export.sprint;
    let shown = &export.companies[..export.companies.len().min(MEMO_COMPANY_LIMIT)];
    let snapshots: Vec<FundingSnapshot> = shown
        .iter()
        .map(|c| c.snapshot(export.freshness, export.generated_at))
        .collect();

    let mut out = String::new();
    let _ = writeln!(out, "# Investment Memo: {}\n", sprint.name);
    let _ = writeln!(out, "Generated: {}\n", export.generated_at.format("%B %d, %Y"));

    out.push_str("## Executive Summary\n\n");
    if shown.is_empty() {
        out.push_str("No companies in shortlist.\n\n");
    } else {
        out.push_str(&summary_table(shown, &snapshots));
        out.push_str("\n\n");
        if export.companies.len() > shown.len() {
            let _ = writeln!(
                out,
                "_{} more shortlisted companies are omitted._\n",
                export.companies.len() - shown.len()
            );
        }
    }

    out.push_str("## Thesis\n\n### Overview\n\n");
    let thesis = sprint.thesis.trim();
    out.push_str(if thesis.is_empty() { "No thesis recorded." } else { thesis });
    out.push_str("\n\n### Investment Criteria\n\n");
    let criteria = &sprint.criteria;
    let _ = writeln!(out, "- Stage Focus: {}", criteria.stage);
    let _ = writeln!(out, "- Geography: {}", or_text(&criteria.geography.join(", "), "Global"));
    let _ = writeln!(
        out,
        "- Last Raise Filter: {}",
        criteria
            .max_months_since_raise
            .map(|m| format!("within {} months", m))
            .unwrap_or_else(|| "None".to_string())
    );
    if !criteria.keywords_include.is_empty() {
        let _ = writeln!(out, "- Include Keywords: {}", criteria.keywords_include.join(", "));
    }
    if !criteria.keywords_exclude.is_empty() {
        let _ = writeln!(out, "- Exclude Keywords: {}", criteria.keywords_exclude.join(", "));
    }
    out.push('\n');

    if !shown.is_empty() {
        out.push_str("## Shortlisted Companies\n\n");
        for (i, (company, snapshot)) in shown.iter().zip(&snapshots).enumerate() {
            if i > 0 {
                out.push_str("---\n\n");
            }
            company_detail(&mut out, i + 1, company, snapshot);
        }

        out.push_str("## Appendix: Sources & Validation Notes\n\n");
        for (company, snapshot) in shown.iter().zip(&snapshots) {
            appendix_entry(&mut out, company, snapshot);
        }
    }

    out
}

fn summary_table(companies: &[Company], snapshots: &[FundingSnapshot]) -> String {
    let mut builder = Builder::default();
    builder.push_record(["Company", "Stage", "Last Round", "Amount", "Confidence", "Status"]);
    for (company, snapshot) in companies.iter().zip(snapshots) {
        builder.push_record([
            cell(&company.name),
            company
                .current_stage()
                .map(|s| s.as_str().to_string())
                .unwrap_or_else(|| "Unknown".to_string()),
            cell(snapshot.last_round_type.as_deref().unwrap_or(NOT_AVAILABLE)),
            cell(snapshot.amount.as_deref().unwrap_or(NOT_AVAILABLE)),
            capitalize(snapshot.confidence.as_str()),
            capitalize(company.shortlist.as_str()),
        ]);
    }

    let mut table = builder.build();
    table.with(Style::markdown());
    table.to_string()
}

fn company_detail(out: &mut String, position: usize, company: &Company, snapshot: &FundingSnapshot) {
    let _ = writeln!(out, "### {}. {}\n", position, company.name);

    out.push_str("#### Overview\n\n");
    out.push_str(or_text(company.description.trim(), "No description available."));
    out.push_str("\n\n#### Thesis Fit\n\n");
    match company.fit.as_ref() {
        Some(fit) => {
            let _ = writeln!(out, "Fit score {} ({})\n", fit.score.value(), fit.bucket.label());
            for reason in &fit.rationale {
                let _ = writeln!(out, "- {}", reason);
            }
        }
        None => out.push_str("No fit assessment.\n"),
    }
    for note in &company.notes {
        let _ = writeln!(out, "- Note ({}): {}", note.created_at.format("%Y-%m-%d"), note.text);
    }
    out.push('\n');

    out.push_str("#### Funding Context\n\n");
    if company.claims.is_empty() {
        out.push_str("No funding information available.\n\n");
    } else {
        let _ = writeln!(out, "- **Last Round:** {}", snapshot.last_round_type.as_deref().unwrap_or(NOT_AVAILABLE));
        let _ = writeln!(
            out,
            "- **Date:** {}",
            snapshot
                .last_round_date
                .map(|d| d.format("%B %Y").to_string())
                .unwrap_or_else(|| NOT_AVAILABLE.to_string())
        );
        let _ = writeln!(out, "- **Amount:** {}", snapshot.amount.as_deref().unwrap_or(NOT_AVAILABLE));
        let _ = writeln!(out, "- **Lead:** {}", snapshot.lead_investor.as_deref().unwrap_or(NOT_AVAILABLE));
        if let Some(valuation) = &snapshot.valuation {
            let basis = snapshot.valuation_basis.map(|b| b.as_str()).unwrap_or("estimate");
            let _ = writeln!(out, "- **Valuation:** {} ({})", valuation, basis);
        }
        let _ = writeln!(out, "- **Confidence:** {}", capitalize(snapshot.confidence.as_str()));
        if let Some(freshness) = snapshot.freshness {
            let _ = writeln!(out, "- **Freshness:** {}", capitalize(freshness.as_str()));
        }
        out.push('\n');
    }

    out.push_str("#### Open Questions\n\n");
    let next = company
        .fit
        .as_ref()
        .and_then(|f| f.next_action.as_deref())
        .unwrap_or("TBD - requires deeper diligence");
    let _ = writeln!(out, "- {}\n", next);
}

fn appendix_entry(out: &mut String, company: &Company, snapshot: &FundingSnapshot) {
    let _ = writeln!(out, "### {}\n", company.name);

    let mut seen: Vec<&str> = Vec::new();
    let mut lines = Vec::new();
    for source in company.claims.iter().flat_map(|c| c.sources.iter()) {
        if seen.contains(&source.url.as_str()) {
            continue;
        }
        seen.push(&source.url);
        lines.push(format!(
            "- [{}]({}) ({}, {})",
            source.title,
            source.url,
            source.source_type.label(),
            source.observed_at.format("%Y-%m-%d")
        ));
    }

    if lines.is_empty() {
        out.push_str("No sources recorded.\n\n");
    } else {
        out.push_str("#### Sources\n\n");
        out.push_str(&lines.join("\n"));
        out.push_str("\n\n");
    }

    if let Some(note) = &snapshot.resolution_note {
        let _ = writeln!(out, "#### Conflict Resolution\n\n{}\n", note);
    }
}

fn cell(text: &str) -> String {
    text.replace('|', "\\|")
}

fn or_text<'a>(text: &'a str, fallback: &'a str) -> &'a str {
    if text.is_empty() {
        fallback
    } else {
        text
    }
}
