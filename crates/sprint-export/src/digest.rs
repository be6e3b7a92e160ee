//! Plain-text email digest

use crate::{capitalize, ShortlistExport};
use std::fmt::Write;

/// Render a short email body listing the shortlist
pub fn render_email(export: &ShortlistExport<'_>) -> String {
    let sprint = export.sprint;
    let mut out = String::new();

    let _ = writeln!(out, "Subject: {} - Shortlist Summary\n", sprint.name);
    out.push_str("Hi team,\n\n");

    let thesis = sprint.thesis.trim();
    if !thesis.is_empty() {
        let _ = writeln!(out, "Thesis: {}\n", thesis);
    }

    if export.companies.is_empty() {
        out.push_str("No companies have been shortlisted for this sprint yet.\n\n");
    } else {
        let _ = writeln!(
            out,
            "We've identified {} {} worth pursuing:\n",
            export.companies.len(),
            if export.companies.len() == 1 { "company" } else { "companies" }
        );
        for company in export.companies {
            let snapshot = company.snapshot(export.freshness, export.generated_at);
            let stage = company
                .current_stage()
                .map(|s| s.as_str())
                .unwrap_or("Unknown stage");
            let _ = write!(out, "• {} - {}", company.name, stage);
            if let Some(amount) = &snapshot.amount {
                let _ = write!(out, " ({})", amount);
            }
            let _ = writeln!(out, " [{}]", capitalize(company.shortlist.as_str()));
        }
        out.push('\n');
        out.push_str("See attached for full details.\n\n");
    }

    out.push_str("Best,\n");
    out
}
