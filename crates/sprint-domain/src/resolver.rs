//! Confidence resolver
//!
//! Picks the authoritative value for one funding field out of a set of cited
//! sources and labels it:
//! 1. Malformed sources are dropped and counted
//! 2. Sources are ordered by trust rank, newest first within a rank
//! 3. Disagreement at the top rank yields a Conflicting claim
//! 4. Otherwise the top source's value wins; confidence depends on whether a
//!    primary-tier source backs it and whether lower-trust sources dissent
//! 5. A non-direct basis caps confidence at Medium

use crate::claim::{Basis, ClaimStatus, FundingField, NOT_AVAILABLE};
use crate::confidence::ConfidenceLabel;
use crate::normalize::normalize_value;
use crate::source::Source;
use crate::trust::TrustTable;
use serde::{Deserialize, Serialize};
use std::cmp::Reverse;

/// Outcome of resolving one field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Resolution {
    /// Field that was resolved
    pub field: FundingField,
    /// Resolved value, or [`NOT_AVAILABLE`]
    pub value: String,
    /// Confidence label
    pub confidence: ConfidenceLabel,
    /// Resolution status
    pub status: ClaimStatus,
    /// Basis tag carried through from the input
    pub basis: Basis,
    /// Well-formed sources, most trusted first
    pub sources: Vec<Source>,
    /// Number of malformed sources that were dropped
    pub dropped: usize,
    /// Description of how the value was chosen
    pub note: Option<String>,
}

/// Resolve a field from its candidate sources
///
/// Sources may arrive in any order. The returned value is never invented:
/// it is either the original text of a source or [`NOT_AVAILABLE`].
pub fn resolve(
    field: FundingField,
    sources: Vec<Source>,
    basis: Basis,
    trust: &TrustTable,
) -> Resolution {
    let total = sources.len();
    let mut sources: Vec<Source> = sources.into_iter().filter(Source::is_well_formed).collect();
    let dropped = total - sources.len();

    if sources.is_empty() {
        return Resolution {
            field,
            value: NOT_AVAILABLE.to_string(),
            confidence: ConfidenceLabel::Low,
            status: ClaimStatus::Unverified,
            basis,
            sources,
            dropped,
            note: Some(with_dropped("No usable sources".to_string(), dropped)),
        };
    }

    sources.sort_by_key(|s| (Reverse(trust.rank(s.source_type)), Reverse(s.observed_at)));

    let keys: Vec<String> = sources.iter().map(|s| normalize_value(field, &s.value)).collect();
    let top = &sources[0];
    let top_rank = trust.rank(top.source_type);
    let top_key = &keys[0];

    let rival = sources
        .iter()
        .zip(&keys)
        .take_while(|(s, _)| trust.rank(s.source_type) == top_rank)
        .find(|(_, key)| *key != top_key);

    let value = top.value.clone();
    if let Some((rival, _)) = rival {
        let note = format!(
            "Conflict between {} sources: \"{}\" vs \"{}\"; showing the newest",
            top.source_type.label(),
            top.value,
            rival.value
        );
        return Resolution {
            field,
            value,
            confidence: ConfidenceLabel::Low,
            status: ClaimStatus::Conflicting,
            basis,
            sources,
            dropped,
            note: Some(with_dropped(note, dropped)),
        };
    }

    let backed_by_primary = sources
        .iter()
        .zip(&keys)
        .any(|(s, key)| key == top_key && s.source_type.is_primary());
    let dissent: Vec<&str> = sources
        .iter()
        .zip(&keys)
        .filter(|(_, key)| *key != top_key)
        .map(|(s, _)| s.value.as_str())
        .collect();

    let confidence = if backed_by_primary {
        ConfidenceLabel::High
    } else if dissent.is_empty() {
        ConfidenceLabel::Medium
    } else {
        ConfidenceLabel::Low
    };

    let mut note = format!("{} source \"{}\" is authoritative", top.source_type.label(), top.value);
    if !dissent.is_empty() {
        note.push_str(&format!(
            " over {} lower-trust dissent ({})",
            dissent.len(),
            dissent.join(", ")
        ));
    } else if sources.len() > 1 {
        note.push_str(&format!("; {} sources agree", sources.len()));
    }

    let capped = confidence.capped_at(basis.ceiling());
    if capped != confidence {
        note.push_str(&format!("; capped at {} (basis: {})", capped, basis));
    }

    Resolution {
        field,
        value,
        confidence: capped,
        status: ClaimStatus::Verified,
        basis,
        sources,
        dropped,
        note: Some(with_dropped(note, dropped)),
    }
}

fn with_dropped(note: String, dropped: usize) -> String {
    if dropped == 0 {
        note
    } else {
        format!("{}; {} malformed source(s) dropped", note, dropped)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::trust::SourceType;
    use chrono::{DateTime, Duration, Utc};

    fn at(days_ago: i64) -> DateTime<Utc> {
        Utc::now() - Duration::days(days_ago)
    }

    fn src(source_type: SourceType, value: &str, days_ago: i64) -> Source {
        Source::new(
            format!("https://{}.example/{}", source_type, days_ago),
            source_type,
            "title",
            at(days_ago),
            value,
        )
    }

    fn amount(sources: Vec<Source>) -> Resolution {
        resolve(FundingField::Amount, sources, Basis::Direct, &TrustTable::default())
    }

    #[test]
    fn test_press_release_beats_dissenting_blog() {
        let r = amount(vec![
            src(SourceType::InvestorBlog, "$45M", 3),
            src(SourceType::Social, "$50M", 1),
            src(SourceType::PressRelease, "$50M", 10),
        ]);

        assert_eq!(r.value, "$50M");
        assert_eq!(r.confidence, ConfidenceLabel::High);
        assert_eq!(r.status, ClaimStatus::Verified);
        assert_eq!(r.sources[0].source_type, SourceType::PressRelease);
        assert!(r.note.unwrap().contains("$45M"));
    }

    #[test]
    fn test_no_sources_is_unverified() {
        let r = amount(vec![]);
        assert_eq!(r.value, NOT_AVAILABLE);
        assert_eq!(r.status, ClaimStatus::Unverified);
        assert_eq!(r.confidence, ConfidenceLabel::Low);
    }

    #[test]
    fn test_malformed_sources_are_dropped_and_counted() {
        let mut blank_url = src(SourceType::PressRelease, "$90M", 1);
        blank_url.url = String::new();
        let r = amount(vec![
            blank_url,
            src(SourceType::PressRelease, " ", 1),
            src(SourceType::BusinessPress, "$80M", 2),
        ]);

        assert_eq!(r.dropped, 2);
        assert_eq!(r.value, "$80M");
        assert_eq!(r.confidence, ConfidenceLabel::Medium);
        assert_eq!(r.sources.len(), 1);
    }

    #[test]
    fn test_only_malformed_sources() {
        let r = amount(vec![src(SourceType::PressRelease, "", 1)]);
        assert_eq!(r.status, ClaimStatus::Unverified);
        assert_eq!(r.dropped, 1);
    }

    #[test]
    fn test_top_rank_disagreement_conflicts() {
        let r = resolve(
            FundingField::LeadInvestor,
            vec![
                src(SourceType::BusinessPress, "Greenoaks", 30),
                src(SourceType::BusinessPress, "Kleiner Perkins", 5),
                src(SourceType::PressRelease, "", 1),
            ],
            Basis::Direct,
            &TrustTable::default(),
        );

        assert_eq!(r.status, ClaimStatus::Conflicting);
        assert_eq!(r.confidence, ConfidenceLabel::Low);
        assert_eq!(r.value, "Kleiner Perkins");
    }

    #[test]
    fn test_equivalent_spellings_do_not_conflict() {
        let r = amount(vec![
            src(SourceType::BusinessPress, "$50M", 2),
            src(SourceType::BusinessPress, "50 million", 1),
        ]);
        assert_eq!(r.status, ClaimStatus::Verified);
        assert_eq!(r.value, "50 million");
        assert_eq!(r.confidence, ConfidenceLabel::Medium);
    }

    #[test]
    fn test_lower_trust_dissent_without_primary_is_low() {
        let r = amount(vec![
            src(SourceType::BusinessPress, "$50M", 2),
            src(SourceType::DataPlatform, "$48M", 1),
        ]);
        assert_eq!(r.status, ClaimStatus::Verified);
        assert_eq!(r.value, "$50M");
        assert_eq!(r.confidence, ConfidenceLabel::Low);
    }

    #[test]
    fn test_same_type_newest_wins() {
        let r = resolve(
            FundingField::RoundDate,
            vec![
                src(SourceType::BusinessPress, "2024-03-01", 200),
                src(SourceType::BusinessPress, "2024-03-01", 10),
            ],
            Basis::Direct,
            &TrustTable::default(),
        );
        assert!(r.sources[0].observed_at > r.sources[1].observed_at);
    }

    #[test]
    fn test_non_direct_basis_caps_confidence() {
        let r = resolve(
            FundingField::Valuation,
            vec![src(SourceType::PressRelease, "$2.5B", 1)],
            Basis::Estimate,
            &TrustTable::default(),
        );
        assert_eq!(r.confidence, ConfidenceLabel::Medium);
        assert!(r.note.unwrap().contains("capped"));
    }

    #[test]
    fn test_custom_trust_table_changes_winner() {
        let trust = TrustTable::default().with_rank(SourceType::Social, 200);
        let r = resolve(
            FundingField::Amount,
            vec![
                src(SourceType::PressRelease, "$50M", 1),
                src(SourceType::Social, "$60M", 1),
            ],
            Basis::Direct,
            &trust,
        );
        assert_eq!(r.value, "$60M");
        // Primary-tier support is judged by type, so a dissenting press release
        // leaves the social value unbacked.
        assert_eq!(r.confidence, ConfidenceLabel::Low);
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use crate::trust::SourceType;
    use chrono::{Duration, TimeZone, Utc};
    use proptest::prelude::*;

    const VALUES: [&str; 4] = ["$10M", "$20M", "$30M", "$40M"];

    fn build(entries: &[(usize, usize, i64)]) -> Vec<Source> {
        let base = Utc.with_ymd_and_hms(2025, 6, 1, 0, 0, 0).unwrap();
        entries
            .iter()
            .enumerate()
            .map(|(i, (t, v, age))| {
                Source::new(
                    format!("https://source{}.example", i),
                    SourceType::ALL[*t],
                    "t",
                    base - Duration::days(*age),
                    VALUES[*v],
                )
            })
            .collect()
    }

    proptest! {
        /// Property: a single most-trusted source always supplies the value
        #[test]
        fn test_distinct_top_source_wins(
            top_value in 0..VALUES.len(),
            others in prop::collection::vec((1..SourceType::ALL.len(), 0..VALUES.len(), 0i64..1000), 0..6),
        ) {
            let mut entries = vec![(0usize, top_value, 500i64)];
            entries.extend(others);
            let mut sources = build(&entries);
            sources.reverse();

            let r = resolve(FundingField::Amount, sources, Basis::Direct, &TrustTable::default());

            prop_assert_eq!(r.value, VALUES[top_value]);
            prop_assert_eq!(r.status, ClaimStatus::Verified);
            prop_assert_eq!(r.confidence, ConfidenceLabel::High);
        }

        /// Property: two top-rank sources with different values always conflict
        #[test]
        fn test_top_rank_disagreement_is_conflicting(
            type_idx in 0..SourceType::ALL.len(),
            a in 0..VALUES.len(),
            offset in 1..VALUES.len(),
            age_a in 0i64..1000,
            age_b in 0i64..1000,
        ) {
            let b = (a + offset) % VALUES.len();
            let sources = build(&[(type_idx, a, age_a), (type_idx, b, age_b)]);

            let r = resolve(FundingField::Amount, sources, Basis::Direct, &TrustTable::default());

            prop_assert_eq!(r.status, ClaimStatus::Conflicting);
            prop_assert_eq!(r.confidence, ConfidenceLabel::Low);
        }

        /// Property: resolution does not depend on input order
        #[test]
        fn test_order_independent(
            entries in prop::collection::vec((0..SourceType::ALL.len(), 0..VALUES.len(), 0i64..1000), 1..6),
        ) {
            let forward = build(&entries);
            let mut backward = forward.clone();
            backward.reverse();

            let r1 = resolve(FundingField::Amount, forward, Basis::Direct, &TrustTable::default());
            let r2 = resolve(FundingField::Amount, backward, Basis::Direct, &TrustTable::default());

            prop_assert_eq!(r1.status, r2.status);
            prop_assert_eq!(r1.confidence, r2.confidence);
            if r1.status == ClaimStatus::Verified {
                prop_assert_eq!(r1.value, r2.value);
            }
        }
    }
}
