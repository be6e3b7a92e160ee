//! Thesis Sprint Export
//!
//! Formatting of a sprint's shortlist for use outside the application:
//!
//! - CSV for CRM import (and re-import of shortlist decisions)
//! - Markdown investment memo
//! - Plain-text email digest
//!
//! Formatting only; nothing here reads or writes the store.

#![warn(missing_docs)]

mod digest;
mod memo;
mod rows;

use chrono::{DateTime, Utc};
use sprint_domain::{Company, FreshnessThresholds, Sprint};
use thiserror::Error;

pub use digest::render_email;
pub use memo::{render_memo, MEMO_COMPANY_LIMIT};
pub use rows::{read_shortlist_csv, write_shortlist_csv, ShortlistRow};

/// Errors that can occur while exporting
#[derive(Error, Debug)]
pub enum ExportError {
    /// CSV encoding or decoding failed
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Writing the output failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Output was not valid UTF-8
    #[error("Encoding error: {0}")]
    Encoding(#[from] std::string::FromUtf8Error),

    /// Unknown export format
    #[error("Unknown export format: {0}")]
    UnknownFormat(String),
}

/// Result type for export operations
pub type Result<T> = std::result::Result<T, ExportError>;

/// Export format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExportFormat {
    /// Spreadsheet rows
    #[default]
    Csv,
    /// Markdown investment memo
    Memo,
    /// Plain-text email digest
    Email,
}

impl ExportFormat {
    /// Parse a format tag
    pub fn parse(tag: &str) -> Result<Self> {
        match tag.trim().to_lowercase().as_str() {
            "" | "csv" => Ok(ExportFormat::Csv),
            "memo" | "md" | "markdown" => Ok(ExportFormat::Memo),
            "email" | "txt" => Ok(ExportFormat::Email),
            other => Err(ExportError::UnknownFormat(other.to_string())),
        }
    }

    /// MIME type of the rendered output
    pub fn content_type(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "text/csv; charset=utf-8",
            ExportFormat::Memo => "text/markdown; charset=utf-8",
            ExportFormat::Email => "text/plain; charset=utf-8",
        }
    }

    /// Download file name
    pub fn file_name(&self, sprint: &Sprint) -> String {
        match self {
            ExportFormat::Csv => format!("{}-shortlist.csv", sprint.id),
            ExportFormat::Memo => format!("{}-investment-memo.md", sprint.id),
            ExportFormat::Email => format!("{}-email-summary.txt", sprint.id),
        }
    }
}

/// A sprint's shortlist, ready to format
#[derive(Debug, Clone, Copy)]
pub struct ShortlistExport<'a> {
    /// The sprint
    pub sprint: &'a Sprint,
    /// Shortlisted companies in display order
    pub companies: &'a [Company],
    /// Thresholds for freshness labels
    pub freshness: &'a FreshnessThresholds,
    /// Time of export
    pub generated_at: DateTime<Utc>,
}

impl ShortlistExport<'_> {
    /// Render in the given format
    pub fn render(&self, format: ExportFormat) -> Result<String> {
        tracing::debug!(sprint = %self.sprint.id, ?format, companies = self.companies.len(), "Rendering export");
        match format {
            ExportFormat::Csv => {
                let mut buffer = Vec::new();
                write_shortlist_csv(self, &mut buffer)?;
                Ok(String::from_utf8(buffer)?)
            }
            ExportFormat::Memo => Ok(render_memo(self)),
            ExportFormat::Email => Ok(render_email(self)),
        }
    }
}

/// Capitalize a display key ("high" → "High")
pub(crate) fn capitalize(key: &str) -> String {
    let mut chars = key.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
