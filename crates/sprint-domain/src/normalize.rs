//! Value normalization for grouping agreeing sources
//!
//! Two sources agree when their values normalize to the same key. Amounts
//! compare as whole dollars, dates as ISO days, round types by ladder rung,
//! and everything else as case-folded text.

use crate::claim::FundingField;
use crate::stage::RoundType;
use chrono::{DateTime, NaiveDate};

const MULTIPLIERS: &[(&str, f64)] = &[
    ("billion", 1e9),
    ("bn", 1e9),
    ("b", 1e9),
    ("million", 1e6),
    ("mm", 1e6),
    ("m", 1e6),
    ("thousand", 1e3),
    ("k", 1e3),
];

/// Parse a money amount such as "$105M", "~$2.5B (signal)", "1,200,000" or
/// "50 million" into US dollars
pub fn parse_money(raw: &str) -> Option<f64> {
    let head = raw.split('(').next()?.trim().to_lowercase();
    let mut compact: String = head
        .chars()
        .filter(|c| !matches!(c, '$' | '€' | '£' | ',' | '~' | '_') && !c.is_whitespace())
        .collect();

    for prefix in ["approx.", "approx", "about", "usd"] {
        if let Some(rest) = compact.strip_prefix(prefix) {
            compact = rest.to_string();
        }
    }
    if let Some(rest) = compact.strip_suffix("usd") {
        compact = rest.to_string();
    }

    let (number, multiplier) = MULTIPLIERS
        .iter()
        .find_map(|(suffix, m)| compact.strip_suffix(suffix).map(|n| (n, *m)))
        .unwrap_or((compact.as_str(), 1.0));

    let value: f64 = number.parse().ok()?;
    if !value.is_finite() || value < 0.0 {
        return None;
    }
    Some(value * multiplier)
}

/// Render dollars compactly, e.g. 105_000_000 → "$105M"
pub fn format_money(usd: f64) -> String {
    let (scaled, suffix) = if usd >= 1e9 {
        (usd / 1e9, "B")
    } else if usd >= 1e6 {
        (usd / 1e6, "M")
    } else if usd >= 1e3 {
        (usd / 1e3, "K")
    } else {
        (usd, "")
    };
    let text = format!("{:.1}", scaled);
    let text = text.trim_end_matches(".0");
    format!("${}{}", text, suffix)
}

/// Parse a round date in any of the shapes collaborators produce
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Some(date);
    }
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.date_naive());
    }
    if let Ok(date) = NaiveDate::parse_from_str(&format!("{}-01", raw), "%Y-%m-%d") {
        return Some(date);
    }
    for format in ["%B %d, %Y", "%b %d, %Y", "%d %B %Y", "%m/%d/%Y"] {
        if let Ok(date) = NaiveDate::parse_from_str(raw, format) {
            return Some(date);
        }
    }
    // Month and year only ("January 2025", "Jan 2025")
    for format in ["%d %B %Y", "%d %b %Y"] {
        if let Ok(date) = NaiveDate::parse_from_str(&format!("1 {}", raw), format) {
            return Some(date);
        }
    }
    None
}

/// Case-fold and collapse whitespace
pub fn normalize_text(raw: &str) -> String {
    raw.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .trim_end_matches('.')
        .to_lowercase()
}

/// Grouping key for a value of the given field
pub fn normalize_value(field: FundingField, raw: &str) -> String {
    match field {
        FundingField::Amount | FundingField::Valuation => parse_money(raw)
            .map(|usd| format!("usd:{}", usd.round() as u64))
            .unwrap_or_else(|| normalize_text(raw)),
        FundingField::RoundDate => parse_date(raw)
            .map(|d| d.format("%Y-%m-%d").to_string())
            .unwrap_or_else(|| normalize_text(raw)),
        FundingField::RoundType => RoundType::parse(raw)
            .map(|r| r.as_str().to_lowercase())
            .unwrap_or_else(|| normalize_text(raw)),
        FundingField::LeadInvestor => normalize_text(raw),
    }
}
