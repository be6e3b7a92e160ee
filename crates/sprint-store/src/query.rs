//! Filtering and ordering of company listings

use sprint_domain::traits::{CompanyFilter, SortKey};
use sprint_domain::{Company, CompanyConfidence, ShortlistStatus};
use std::cmp::Ordering;

pub(crate) fn matches_filter(company: &Company, filter: CompanyFilter) -> bool {
    match filter {
        CompanyFilter::All => true,
        CompanyFilter::NeedsReview => company.confidence().needs_review(),
        CompanyFilter::Conflicts => company.confidence() == CompanyConfidence::Conflict,
        CompanyFilter::Shortlisted => company.shortlist.is_shortlisted(),
    }
}

/// Descending on known values, unknown values last
fn known_first_desc<T: PartialOrd>(a: Option<T>, b: Option<T>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => b.partial_cmp(&a).unwrap_or(Ordering::Equal),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

fn by_name(a: &Company, b: &Company) -> Ordering {
    a.name
        .to_lowercase()
        .cmp(&b.name.to_lowercase())
        .then_with(|| a.id.cmp(&b.id))
}

pub(crate) fn sort_companies(companies: &mut [Company], key: SortKey) {
    companies.sort_by(|a, b| {
        let primary = match key {
            SortKey::Confidence => a.confidence().sort_rank().cmp(&b.confidence().sort_rank()),
            SortKey::LastRaised => known_first_desc(a.last_round_date(), b.last_round_date()),
            SortKey::Amount => known_first_desc(a.last_round_amount_usd(), b.last_round_amount_usd()),
            SortKey::Name => Ordering::Equal,
        };
        primary.then_with(|| by_name(a, b))
    });
}

pub(crate) fn sort_shortlist(companies: &mut [Company]) {
    companies.sort_by(|a, b| {
        let rank = |c: &Company| match c.shortlist {
            ShortlistStatus::Pursue => 0,
            _ => 1,
        };
        rank(a).cmp(&rank(b)).then_with(|| by_name(a, b))
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_sorts_last() {
        assert_eq!(known_first_desc(Some(5), None), Ordering::Less);
        assert_eq!(known_first_desc(None, Some(5)), Ordering::Greater);
        assert_eq!(known_first_desc(Some(5), Some(9)), Ordering::Greater);
        assert_eq!(known_first_desc::<i32>(None, None), Ordering::Equal);
    }
}
