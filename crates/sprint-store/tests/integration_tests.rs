//! Integration tests for sprint-store
//!
//! These tests exercise the full sprint/company lifecycle and the listing
//! queries against the demo data.

use chrono::{TimeZone, Utc};
use sprint_domain::traits::{CompanyFilter, CompanyQuery, SortKey, SprintStore};
use sprint_domain::{
    resolve, Basis, Claim, Company, CompanyConfidence, CompanyId, FundingField, NewSprint,
    ShortlistStatus, Source, SourceType, SprintCriteria, SprintId, SprintUpdate, StageRange,
    TrustTable, ValidationState,
};
use sprint_store::{MemoryStore, StoreError};

fn demo() -> MemoryStore {
    MemoryStore::with_demo_data(&TrustTable::default()).unwrap()
}

fn names(companies: &[Company]) -> Vec<&str> {
    companies.iter().map(|c| c.name.as_str()).collect()
}

fn sprint_id() -> SprintId {
    SprintId::from("ai-dev-tools")
}

#[test]
fn test_demo_data_seeded() {
    let store = demo();
    let sprints = store.list_sprints().unwrap();
    assert_eq!(sprints.len(), 3);
    assert_eq!(sprints[0].name, "AI Developer Tools");
    assert_eq!(sprints[0].company_ids.len(), 5);
    assert!(sprints[1].company_ids.is_empty());
    assert_eq!(store.company_count().unwrap(), 5);
}

#[test]
fn test_demo_confidence_labels() {
    let store = demo();
    let label = |id: &str| {
        store
            .get_company(&CompanyId::from(id))
            .unwrap()
            .unwrap()
            .confidence()
    };
    assert_eq!(label("cursor"), CompanyConfidence::High);
    assert_eq!(label("codeium"), CompanyConfidence::Conflict);
    assert_eq!(label("replit"), CompanyConfidence::Medium);
    assert_eq!(label("codewhisperer-labs"), CompanyConfidence::Low);
    assert_eq!(label("sourcegraph"), CompanyConfidence::High);
}

#[test]
fn test_sort_by_confidence() {
    let store = demo();
    let companies = store
        .list_companies(&sprint_id(), &CompanyQuery::default())
        .unwrap();
    assert_eq!(
        names(&companies),
        vec!["Cursor", "Sourcegraph", "Replit", "Codeium", "CodeWhisperer Labs"]
    );
}

#[test]
fn test_sort_by_amount_and_date() {
    let store = demo();
    let by_amount = store
        .list_companies(
            &sprint_id(),
            &CompanyQuery {
                sort: SortKey::Amount,
                ..Default::default()
            },
        )
        .unwrap();
    // Codeium's conflicting amount still displays the newest value ($165M);
    // CodeWhisperer Labs has no amount and sorts last.
    assert_eq!(
        names(&by_amount),
        vec!["Codeium", "Sourcegraph", "Cursor", "Replit", "CodeWhisperer Labs"]
    );

    let by_date = store
        .list_companies(
            &sprint_id(),
            &CompanyQuery {
                sort: SortKey::LastRaised,
                ..Default::default()
            },
        )
        .unwrap();
    assert_eq!(
        names(&by_date),
        vec!["Cursor", "CodeWhisperer Labs", "Codeium", "Replit", "Sourcegraph"]
    );
}

#[test]
fn test_filters() {
    let store = demo();
    let query = |filter| CompanyQuery {
        filter,
        sort: SortKey::Name,
        ..Default::default()
    };

    let review = store.list_companies(&sprint_id(), &query(CompanyFilter::NeedsReview)).unwrap();
    assert_eq!(names(&review), vec!["CodeWhisperer Labs", "Replit"]);

    let conflicts = store.list_companies(&sprint_id(), &query(CompanyFilter::Conflicts)).unwrap();
    assert_eq!(names(&conflicts), vec!["Codeium"]);

    let shortlisted = store.list_companies(&sprint_id(), &query(CompanyFilter::Shortlisted)).unwrap();
    assert_eq!(shortlisted.len(), 4);
}

#[test]
fn test_search_and_limit() {
    let store = demo();
    let found = store
        .list_companies(
            &sprint_id(),
            &CompanyQuery {
                search: Some("enterprise".into()),
                sort: SortKey::Name,
                ..Default::default()
            },
        )
        .unwrap();
    assert_eq!(names(&found), vec!["Codeium", "Sourcegraph"]);

    let limited = store
        .list_companies(
            &sprint_id(),
            &CompanyQuery {
                limit: Some(2),
                ..Default::default()
            },
        )
        .unwrap();
    assert_eq!(limited.len(), 2);
}

#[test]
fn test_enforce_criteria() {
    let store = demo();
    let as_of = Utc.with_ymd_and_hms(2025, 3, 1, 0, 0, 0).unwrap();
    let admitted = store
        .list_companies(
            &sprint_id(),
            &CompanyQuery {
                enforce_criteria: true,
                as_of: Some(as_of),
                sort: SortKey::Name,
                ..Default::default()
            },
        )
        .unwrap();
    // Codeium and Sourcegraph are past Series B; Replit last raised in 2023.
    assert_eq!(names(&admitted), vec!["CodeWhisperer Labs", "Cursor"]);
}

#[test]
fn test_shortlist_order() {
    let store = demo();
    let shortlist = store.shortlist(&sprint_id()).unwrap();
    assert_eq!(
        names(&shortlist),
        vec!["Codeium", "Cursor", "Sourcegraph", "Replit"]
    );
}

#[test]
fn test_unknown_sprint() {
    let store = demo();
    let result = store.list_companies(&SprintId::from("nope"), &CompanyQuery::default());
    assert!(matches!(result, Err(StoreError::SprintNotFound(_))));
    assert!(store.get_sprint(&SprintId::from("nope")).unwrap().is_none());
}

#[test]
fn test_sprint_lifecycle() {
    let store = MemoryStore::new();
    let sprint = store
        .create_sprint(NewSprint {
            name: "Healthcare LLMs".into(),
            thesis: "Clinical copilots".into(),
            ..Default::default()
        })
        .unwrap();

    let updated = store
        .update_criteria(
            &sprint.id,
            SprintUpdate {
                criteria: Some(SprintCriteria {
                    stage: StageRange::parse("Series A").unwrap(),
                    geography: vec!["US".into()],
                    ..Default::default()
                }),
                ..Default::default()
            },
        )
        .unwrap();
    assert_eq!(updated.criteria.geography, vec!["US".to_string()]);
    assert_eq!(updated.thesis, "Clinical copilots");

    let err = store.create_sprint(NewSprint::default()).unwrap_err();
    assert!(matches!(err, StoreError::InvalidInput(_)));
}

#[test]
fn test_validation_replaces_claims() {
    let store = MemoryStore::new();
    let sprint = store
        .create_sprint(NewSprint {
            name: "Dev Tools".into(),
            ..Default::default()
        })
        .unwrap();
    let company = store.upsert_company(Company::new(sprint.id.clone(), "Acme")).unwrap();
    assert_eq!(company.validation, ValidationState::Pending);

    let now = Utc::now();
    let source = Source::new(
        "https://acme.com/press/series-a",
        SourceType::PressRelease,
        "Acme raises",
        now,
        "$12M",
    );
    let resolution = resolve(FundingField::Amount, vec![source], Basis::Direct, &TrustTable::default());
    let claim = Claim::from_resolution(company.id.clone(), resolution, now);

    let validated = store.record_validation(&company.id, vec![claim], now).unwrap();
    assert_eq!(validated.validation, ValidationState::Validated);
    assert_eq!(validated.claims.len(), 1);
    assert_eq!(validated.validated_at, Some(now));

    let stray = Claim::from_resolution(
        CompanyId::from("someone-else"),
        resolve(FundingField::Amount, vec![], Basis::Direct, &TrustTable::default()),
        now,
    );
    assert!(store.record_validation(&company.id, vec![stray], now).is_err());
    assert_eq!(store.get_company(&company.id).unwrap().unwrap().claims.len(), 1);
}

#[test]
fn test_shortlist_and_notes() {
    let store = demo();
    let id = CompanyId::from("codewhisperer-labs");
    let at = Utc::now();

    let company = store.set_shortlist(&id, ShortlistStatus::Watch, at).unwrap();
    assert_eq!(company.shortlist, ShortlistStatus::Watch);
    assert_eq!(company.shortlisted_at, Some(at));

    store.append_note(&id, "Met the founders", at).unwrap();
    let company = store.append_note(&id, "Waiting on deck", at).unwrap();
    assert_eq!(company.notes.len(), 2);
    assert_eq!(company.notes[1].text, "Waiting on deck");
}

#[test]
fn test_removed_company_is_unreachable() {
    let store = demo();
    let id = CompanyId::from("replit");
    let removed = store.remove_company(&id).unwrap();
    assert_eq!(removed.name, "Replit");

    assert!(store.get_company(&id).unwrap().is_none());
    let listed = store.list_companies(&sprint_id(), &CompanyQuery::default()).unwrap();
    assert!(!names(&listed).contains(&"Replit"));
    assert!(!store.shortlist(&sprint_id()).unwrap().iter().any(|c| c.id == id));
    assert!(matches!(
        store.remove_company(&id),
        Err(StoreError::CompanyNotFound(_))
    ));
}

#[test]
fn test_concurrent_readers_and_writers() {
    use std::sync::Arc;
    use std::thread;

    let store = Arc::new(demo());
    let handles: Vec<_> = (0..8)
        .map(|i| {
            let store = Arc::clone(&store);
            thread::spawn(move || {
                let id = CompanyId::from("cursor");
                store
                    .append_note(&id, &format!("note {}", i), Utc::now())
                    .unwrap();
                store
                    .list_companies(&SprintId::from("ai-dev-tools"), &CompanyQuery::default())
                    .unwrap()
                    .len()
            })
        })
        .collect();

    for handle in handles {
        assert_eq!(handle.join().unwrap(), 5);
    }
    let cursor = store.get_company(&CompanyId::from("cursor")).unwrap().unwrap();
    assert_eq!(cursor.notes.len(), 8);
}
