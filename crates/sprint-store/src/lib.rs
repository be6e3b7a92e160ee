//! Thesis Sprint Storage Layer
//!
//! Implements the [`SprintStore`] trait with a process-scoped in-memory store.
//!
//! # Architecture
//!
//! - One `RwLock` around all sprints and companies; each call is atomic
//! - Queries return owned copies, never references into the store
//! - No persistence: a restart loses all state
//!
//! # Examples
//!
//! ```
//! use sprint_domain::traits::SprintStore;
//! use sprint_domain::NewSprint;
//! use sprint_store::MemoryStore;
//!
//! let store = MemoryStore::new();
//! let sprint = store
//!     .create_sprint(NewSprint { name: "Climate Fintech".into(), ..Default::default() })
//!     .unwrap();
//! assert_eq!(store.list_sprints().unwrap().len(), 1);
//! # let _ = sprint;
//! ```

#![warn(missing_docs)]

mod demo;
mod query;

use chrono::{DateTime, Utc};
use sprint_domain::traits::{CompanyQuery, SprintStore};
use sprint_domain::{
    Claim, Company, CompanyId, FitNote, NewSprint, ShortlistStatus, Sprint, SprintId,
    SprintUpdate, TrustTable, ValidationInputError, ValidationState,
};
use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use thiserror::Error;
use tracing::{debug, info};

/// Errors that can occur during storage operations
#[derive(Error, Debug)]
pub enum StoreError {
    /// Sprint not found
    #[error("Sprint not found: {0}")]
    SprintNotFound(SprintId),

    /// Company not found
    #[error("Company not found: {0}")]
    CompanyNotFound(CompanyId),

    /// Rejected input
    #[error("Invalid input: {0}")]
    InvalidInput(#[from] ValidationInputError),

    /// A writer panicked while holding the lock
    #[error("Store lock poisoned")]
    Poisoned,
}

#[derive(Debug, Default)]
struct Inner {
    sprint_order: Vec<SprintId>,
    sprints: HashMap<SprintId, Sprint>,
    companies: HashMap<CompanyId, Company>,
}

impl Inner {
    fn sprint(&self, id: &SprintId) -> Result<&Sprint, StoreError> {
        self.sprints
            .get(id)
            .ok_or_else(|| StoreError::SprintNotFound(id.clone()))
    }

    fn company_mut(&mut self, id: &CompanyId) -> Result<&mut Company, StoreError> {
        self.companies
            .get_mut(id)
            .ok_or_else(|| StoreError::CompanyNotFound(id.clone()))
    }

    fn sprint_companies(&self, sprint: &Sprint) -> Vec<Company> {
        sprint
            .company_ids
            .iter()
            .filter_map(|id| self.companies.get(id))
            .cloned()
            .collect()
    }

    fn insert_sprint(&mut self, sprint: Sprint) {
        if !self.sprints.contains_key(&sprint.id) {
            self.sprint_order.push(sprint.id.clone());
        }
        self.sprints.insert(sprint.id.clone(), sprint);
    }
}

/// In-memory implementation of [`SprintStore`]
///
/// Construct once at startup and share behind an `Arc`.
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: RwLock<Inner>,
}

impl MemoryStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store seeded with the demo sprints and companies
    ///
    /// Demo claims are produced by the resolver under `trust`.
    pub fn with_demo_data(trust: &TrustTable) -> Result<Self, StoreError> {
        let store = Self::new();
        {
            let mut inner = store.write()?;
            let (sprints, companies) = demo::fixtures(trust, Utc::now())?;
            for sprint in sprints {
                inner.insert_sprint(sprint);
            }
            for company in companies {
                inner.companies.insert(company.id.clone(), company);
            }
            info!(
                "Seeded demo data: {} sprints, {} companies",
                inner.sprints.len(),
                inner.companies.len()
            );
        }
        Ok(store)
    }

    /// Number of companies across all sprints
    pub fn company_count(&self) -> Result<usize, StoreError> {
        Ok(self.read()?.companies.len())
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Inner>, StoreError> {
        self.inner.read().map_err(|_| StoreError::Poisoned)
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Inner>, StoreError> {
        self.inner.write().map_err(|_| StoreError::Poisoned)
    }
}

impl SprintStore for MemoryStore {
    type Error = StoreError;

    fn create_sprint(&self, input: NewSprint) -> Result<Sprint, Self::Error> {
        let sprint = Sprint::create(input, Utc::now())?;
        let mut inner = self.write()?;
        inner.insert_sprint(sprint.clone());
        info!("Created sprint {} ({})", sprint.id, sprint.name);
        Ok(sprint)
    }

    fn get_sprint(&self, id: &SprintId) -> Result<Option<Sprint>, Self::Error> {
        Ok(self.read()?.sprints.get(id).cloned())
    }

    fn list_sprints(&self) -> Result<Vec<Sprint>, Self::Error> {
        let inner = self.read()?;
        Ok(inner
            .sprint_order
            .iter()
            .filter_map(|id| inner.sprints.get(id))
            .cloned()
            .collect())
    }

    fn update_criteria(&self, id: &SprintId, update: SprintUpdate) -> Result<Sprint, Self::Error> {
        let mut inner = self.write()?;
        let sprint = inner
            .sprints
            .get_mut(id)
            .ok_or_else(|| StoreError::SprintNotFound(id.clone()))?;
        sprint.apply(update)?;
        debug!("Updated sprint {}", id);
        Ok(sprint.clone())
    }

    fn upsert_company(&self, company: Company) -> Result<Company, Self::Error> {
        if company.name.trim().is_empty() {
            return Err(ValidationInputError::MissingField("name".to_string()).into());
        }

        let mut inner = self.write()?;
        inner.sprint(&company.sprint_id)?;

        let previous_sprint = inner
            .companies
            .get(&company.id)
            .map(|existing| existing.sprint_id.clone())
            .filter(|sprint_id| *sprint_id != company.sprint_id);
        if let Some(previous) = previous_sprint {
            if let Some(sprint) = inner.sprints.get_mut(&previous) {
                sprint.company_ids.retain(|id| *id != company.id);
            }
        }

        if let Some(sprint) = inner.sprints.get_mut(&company.sprint_id) {
            if !sprint.company_ids.contains(&company.id) {
                sprint.company_ids.push(company.id.clone());
            }
        }

        debug!("Upserted company {} into sprint {}", company.id, company.sprint_id);
        inner.companies.insert(company.id.clone(), company.clone());
        Ok(company)
    }

    fn get_company(&self, id: &CompanyId) -> Result<Option<Company>, Self::Error> {
        Ok(self.read()?.companies.get(id).cloned())
    }

    fn remove_company(&self, id: &CompanyId) -> Result<Company, Self::Error> {
        let mut inner = self.write()?;
        let company = inner
            .companies
            .remove(id)
            .ok_or_else(|| StoreError::CompanyNotFound(id.clone()))?;
        if let Some(sprint) = inner.sprints.get_mut(&company.sprint_id) {
            sprint.company_ids.retain(|c| c != id);
        }
        info!("Removed company {} ({})", company.id, company.name);
        Ok(company)
    }

    fn list_companies(
        &self,
        sprint_id: &SprintId,
        query: &CompanyQuery,
    ) -> Result<Vec<Company>, Self::Error> {
        let inner = self.read()?;
        let sprint = inner.sprint(sprint_id)?;
        let now = query.as_of.unwrap_or_else(Utc::now);

        let mut companies: Vec<Company> = inner
            .sprint_companies(sprint)
            .into_iter()
            .filter(|c| query::matches_filter(c, query.filter))
            .filter(|c| query.search.as_deref().map_or(true, |q| c.matches_search(q)))
            .filter(|c| !query.enforce_criteria || sprint.criteria.admits(c, now))
            .collect();

        query::sort_companies(&mut companies, query.sort);
        if let Some(limit) = query.limit {
            companies.truncate(limit);
        }

        debug!(
            "Listed {} companies for sprint {} ({:?}, {:?})",
            companies.len(),
            sprint_id,
            query.filter,
            query.sort
        );
        Ok(companies)
    }

    fn shortlist(&self, sprint_id: &SprintId) -> Result<Vec<Company>, Self::Error> {
        let inner = self.read()?;
        let sprint = inner.sprint(sprint_id)?;
        let mut companies: Vec<Company> = inner
            .sprint_companies(sprint)
            .into_iter()
            .filter(|c| c.shortlist.is_shortlisted())
            .collect();
        query::sort_shortlist(&mut companies);
        Ok(companies)
    }

    fn record_validation(
        &self,
        id: &CompanyId,
        claims: Vec<Claim>,
        at: DateTime<Utc>,
    ) -> Result<Company, Self::Error> {
        if let Some(stray) = claims.iter().find(|c| c.company_id != *id) {
            return Err(ValidationInputError::invalid(
                "claims",
                format!("claim {} belongs to company {}", stray.id, stray.company_id),
            )
            .into());
        }

        let mut inner = self.write()?;
        let company = inner.company_mut(id)?;
        company.claims = claims;
        company.validation = ValidationState::Validated;
        company.validated_at = Some(at);
        info!(
            "Recorded validation for {}: {} claims, confidence {}",
            company.name,
            company.claims.len(),
            company.confidence()
        );
        Ok(company.clone())
    }

    fn set_shortlist(
        &self,
        id: &CompanyId,
        status: ShortlistStatus,
        at: DateTime<Utc>,
    ) -> Result<Company, Self::Error> {
        let mut inner = self.write()?;
        let company = inner.company_mut(id)?;
        company.shortlist = status;
        company.shortlisted_at = Some(at);
        debug!("Shortlist status of {} set to {}", company.name, status);
        Ok(company.clone())
    }

    fn append_note(&self, id: &CompanyId, text: &str, at: DateTime<Utc>) -> Result<Company, Self::Error> {
        let text = text.trim();
        if text.is_empty() {
            return Err(ValidationInputError::MissingField("text".to_string()).into());
        }
        let mut inner = self.write()?;
        let company = inner.company_mut(id)?;
        company.notes.push(FitNote {
            text: text.to_string(),
            created_at: at,
        });
        Ok(company.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sprint_domain::traits::CompanyFilter;

    fn store_with_sprint() -> (MemoryStore, Sprint) {
        let store = MemoryStore::new();
        let sprint = store
            .create_sprint(NewSprint {
                name: "AI Dev Tools".into(),
                ..Default::default()
            })
            .unwrap();
        (store, sprint)
    }

    #[test]
    fn test_upsert_requires_existing_sprint() {
        let store = MemoryStore::new();
        let company = Company::new(SprintId::from("missing"), "Acme");
        assert!(matches!(
            store.upsert_company(company),
            Err(StoreError::SprintNotFound(_))
        ));
    }

    #[test]
    fn test_upsert_replaces_without_duplicating() {
        let (store, sprint) = store_with_sprint();
        let mut company = Company::new(sprint.id.clone(), "Acme");
        store.upsert_company(company.clone()).unwrap();
        company.description = "Updated".into();
        store.upsert_company(company.clone()).unwrap();

        let sprint = store.get_sprint(&sprint.id).unwrap().unwrap();
        assert_eq!(sprint.company_ids.len(), 1);
        assert_eq!(
            store.get_company(&company.id).unwrap().unwrap().description,
            "Updated"
        );
    }

    #[test]
    fn test_upsert_moves_between_sprints() {
        let (store, first) = store_with_sprint();
        let second = store
            .create_sprint(NewSprint {
                name: "Second".into(),
                ..Default::default()
            })
            .unwrap();
        let mut company = Company::new(first.id.clone(), "Acme");
        store.upsert_company(company.clone()).unwrap();
        company.sprint_id = second.id.clone();
        store.upsert_company(company).unwrap();

        assert!(store.get_sprint(&first.id).unwrap().unwrap().company_ids.is_empty());
        assert_eq!(store.get_sprint(&second.id).unwrap().unwrap().company_ids.len(), 1);
    }

    #[test]
    fn test_blank_note_rejected() {
        let (store, sprint) = store_with_sprint();
        let company = store.upsert_company(Company::new(sprint.id, "Acme")).unwrap();
        assert!(matches!(
            store.append_note(&company.id, "   ", Utc::now()),
            Err(StoreError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_queries_return_copies() {
        let (store, sprint) = store_with_sprint();
        let company = store.upsert_company(Company::new(sprint.id.clone(), "Acme")).unwrap();

        let mut listed = store
            .list_companies(&sprint.id, &CompanyQuery::default())
            .unwrap();
        listed[0].name = "Mutated".into();

        assert_eq!(store.get_company(&company.id).unwrap().unwrap().name, "Acme");
        let shortlisted = store
            .list_companies(
                &sprint.id,
                &CompanyQuery {
                    filter: CompanyFilter::Shortlisted,
                    ..Default::default()
                },
            )
            .unwrap();
        assert!(shortlisted.is_empty());
    }
}
