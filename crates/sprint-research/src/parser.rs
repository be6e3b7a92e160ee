//! Parse model output into candidate and funding records
//!
//! Every response is untrusted. Whole-response problems (no JSON, wrong
//! top-level shape) are errors; problems with one entry skip that entry.

use crate::error::ResearchError;
use crate::types::{CandidateRecord, FundingRecord, RejectedCandidate, SourceRecord};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::{Map, Value};
use sprint_domain::normalize::parse_date;
use sprint_domain::{FundingField, SourceType};
use tracing::{debug, warn};

/// Parse a discovery response into candidates and rejected entries
pub(crate) fn parse_candidates(
    response: &str,
) -> Result<(Vec<CandidateRecord>, Vec<RejectedCandidate>), ResearchError> {
    let json = parse_json(response)?;

    // Accept a bare array or an object wrapping one
    let entries = match &json {
        Value::Array(items) => items,
        Value::Object(obj) => obj
            .get("companies")
            .and_then(Value::as_array)
            .ok_or_else(|| ResearchError::InvalidFormat("Expected JSON array of companies".to_string()))?,
        _ => return Err(ResearchError::InvalidFormat("Expected JSON array of companies".to_string())),
    };

    let mut candidates = Vec::new();
    let mut rejected = Vec::new();
    for (index, entry) in entries.iter().enumerate() {
        match parse_candidate(entry) {
            Ok(candidate) => candidates.push(CandidateRecord { index, ..candidate }),
            Err(reason) => {
                warn!("Skipping candidate {}: {}", index, reason);
                rejected.push(RejectedCandidate {
                    index,
                    name: entry.get("name").and_then(value_text),
                    reason,
                });
            }
        }
    }

    Ok((candidates, rejected))
}

/// Parse a funding response into summary fields and well-formed sources
pub(crate) fn parse_funding_record(response: &str) -> Result<FundingRecord, ResearchError> {
    let json = parse_json(response)?;

    let envelope: FundingEnvelope = match json {
        // A bare array is a source list with no summary
        Value::Array(sources) => FundingEnvelope {
            sources: Some(sources),
            ..Default::default()
        },
        Value::Object(_) => serde_json::from_value(json)?,
        _ => return Err(ResearchError::InvalidFormat("Expected JSON object".to_string())),
    };

    let summary = [
        (FundingField::RoundDate, &envelope.round_date),
        (FundingField::RoundType, &envelope.round_type),
        (FundingField::Amount, &envelope.amount),
        (FundingField::LeadInvestor, &envelope.lead_investor),
        (FundingField::Valuation, &envelope.valuation),
    ]
    .into_iter()
    .filter_map(|(field, value)| value.as_ref().and_then(value_text).map(|v| (field, v)))
    .collect();

    let bases = basis_tags(envelope.basis.as_ref());
    let valuation_basis = envelope.valuation_basis.as_ref().and_then(|value| match value {
        Value::String(tag) => Some(tag.trim().to_string()).filter(|t| !t.is_empty()),
        other => {
            warn!("Ignoring non-string valuation_basis: {}", other);
            None
        }
    });

    let mut sources = Vec::new();
    let mut dropped_sources = 0;
    for (index, entry) in envelope.sources.unwrap_or_default().iter().enumerate() {
        match parse_source(entry) {
            Ok(source) => sources.push(source),
            Err(reason) => {
                warn!("Dropping source {}: {}", index, reason);
                dropped_sources += 1;
            }
        }
    }

    Ok(FundingRecord {
        summary,
        valuation_basis,
        bases,
        sources,
        dropped_sources,
    })
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct FundingEnvelope {
    round_date: Option<Value>,
    round_type: Option<Value>,
    amount: Option<Value>,
    lead_investor: Option<Value>,
    valuation: Option<Value>,
    valuation_basis: Option<Value>,
    basis: Option<Value>,
    sources: Option<Vec<Value>>,
}

/// Per-field basis tags; anything but a map of strings is skipped
fn basis_tags(basis: Option<&Value>) -> Vec<(FundingField, String)> {
    let entries = match basis {
        None | Some(Value::Null) => return Vec::new(),
        Some(Value::Object(entries)) => entries,
        Some(other) => {
            warn!("Ignoring basis annotation that is not an object: {}", other);
            return Vec::new();
        }
    };

    entries
        .iter()
        .filter_map(|(key, tag)| {
            let field = FundingField::parse(key)?;
            match tag.as_str().map(str::trim).filter(|t| !t.is_empty()) {
                Some(tag) => Some((field, tag.to_string())),
                None => {
                    warn!("Ignoring basis for '{}': {}", key, tag);
                    None
                }
            }
        })
        .collect()
}

fn parse_json(response: &str) -> Result<Value, ResearchError> {
    let json_str = extract_json(response)?;
    serde_json::from_str(json_str)
        .map_err(|e| ResearchError::InvalidFormat(format!("JSON parse error: {}", e)))
}

/// Extract JSON from a response, handling markdown code blocks and
/// surrounding prose
pub(crate) fn extract_json(response: &str) -> Result<&str, ResearchError> {
    let trimmed = response.trim();

    let body = match trimmed.find("```") {
        Some(start) => {
            // Skip the fence line (```json or ```)
            let after = &trimmed[start + 3..];
            let after = after.find('\n').map(|nl| &after[nl + 1..]).unwrap_or("");
            after.find("```").map(|end| &after[..end]).unwrap_or(after)
        }
        None => trimmed,
    };

    let open = body
        .find(['[', '{'])
        .ok_or_else(|| ResearchError::InvalidFormat("No JSON found in response".to_string()))?;
    let close = body
        .rfind([']', '}'])
        .filter(|&close| close > open)
        .ok_or_else(|| ResearchError::InvalidFormat("Unterminated JSON in response".to_string()))?;

    Ok(&body[open..=close])
}

fn parse_candidate(json: &Value) -> Result<CandidateRecord, String> {
    let obj = json
        .as_object()
        .ok_or_else(|| "Candidate is not a JSON object".to_string())?;

    let name = field_text(obj, "name").ok_or_else(|| "Missing or blank 'name'".to_string())?;

    let domain = field_text(obj, "domain")
        .or_else(|| field_text(obj, "website"))
        .filter(|d| !d.eq_ignore_ascii_case("unknown"));

    Ok(CandidateRecord {
        index: 0,
        name,
        domain,
        description: field_text(obj, "description").unwrap_or_default(),
        stage: field_text(obj, "stage").filter(|s| !s.eq_ignore_ascii_case("unknown")),
        location: field_text(obj, "location").filter(|l| !l.eq_ignore_ascii_case("unknown")),
        fit_score: obj.get("fit_score").and_then(score_value),
        fit_reasons: string_list(obj, "fit_reasons"),
        tags: string_list(obj, "tags"),
        next_action: field_text(obj, "next_action"),
    })
}

fn parse_source(json: &Value) -> Result<SourceRecord, String> {
    let obj = json
        .as_object()
        .ok_or_else(|| "Source is not a JSON object".to_string())?;

    let url = field_text(obj, "url").ok_or_else(|| "Missing 'url'".to_string())?;
    if !is_http_url(&url) {
        return Err(format!("Invalid url '{}'", url));
    }

    let raw_timestamp = field_text(obj, "timestamp")
        .or_else(|| field_text(obj, "date"))
        .ok_or_else(|| "Missing 'timestamp'".to_string())?;
    let observed_at =
        parse_timestamp(&raw_timestamp).ok_or_else(|| format!("Invalid timestamp '{}'", raw_timestamp))?;

    let source_type = field_text(obj, "type")
        .and_then(|tag| SourceType::parse(&tag))
        .unwrap_or_else(|| SourceType::classify_url(&url));

    let claims: Vec<(FundingField, String)> = obj
        .get("claims")
        .and_then(Value::as_object)
        .map(|claims| {
            claims
                .iter()
                .filter_map(|(key, value)| {
                    let field = FundingField::parse(key);
                    if field.is_none() {
                        debug!("Ignoring unknown claim field '{}'", key);
                    }
                    Some((field?, value_text(value)?))
                })
                .collect()
        })
        .unwrap_or_default();
    if claims.is_empty() {
        return Err("No usable claims".to_string());
    }

    Ok(SourceRecord {
        title: field_text(obj, "title").unwrap_or_else(|| url.clone()),
        url,
        source_type,
        observed_at,
        claims,
    })
}

fn is_http_url(url: &str) -> bool {
    let rest = url
        .strip_prefix("https://")
        .or_else(|| url.strip_prefix("http://"));
    matches!(rest, Some(rest) if !rest.is_empty() && !rest.starts_with('/') && !rest.contains(char::is_whitespace))
}

/// RFC 3339 timestamps, or any date shape the normalizer knows (midnight UTC)
pub(crate) fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw.trim()) {
        return Some(ts.with_timezone(&Utc));
    }
    parse_date(raw)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|d| d.and_utc())
}

fn field_text(obj: &Map<String, Value>, key: &str) -> Option<String> {
    obj.get(key).and_then(value_text)
}

/// Non-blank string, or a number rendered as text
fn value_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.trim().to_string()).filter(|s| !s.is_empty()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn string_list(obj: &Map<String, Value>, key: &str) -> Vec<String> {
    match obj.get(key) {
        Some(Value::Array(items)) => items.iter().filter_map(value_text).collect(),
        Some(value) => value_text(value).into_iter().collect(),
        None => Vec::new(),
    }
}

fn score_value(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().and_then(finite_score)),
        Value::String(s) => s.trim().parse::<f64>().ok().and_then(finite_score),
        _ => None,
    }
}

fn finite_score(f: f64) -> Option<i64> {
    f.is_finite().then(|| f.round() as i64)
}
