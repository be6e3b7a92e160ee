//! HTTP request handlers.
//!
//! Every route is an independent unit of work against the shared store.
//! Collaborator calls (discover, validate) write to the store only after
//! they succeed, so a failed call leaves existing data untouched.

use crate::api::{
    CompanyListParams, CompanyView, CreateSprintRequest, DiscoverRequest, DiscoverResponse,
    ExportParams, HealthResponse, NewCompanyRequest, NoteRequest, ShortlistRequest, SprintView,
    UpdateSprintRequest, ValidateResponse,
};
use crate::error::AppError;
use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Json, Response},
    routing::{get, post, put},
    Router as AxumRouter,
};
use chrono::Utc;
use sprint_domain::traits::{CompanyQuery, LlmProvider, SprintStore};
use sprint_domain::{Company, CompanyId, RulesConfig, ShortlistStatus, Sprint, SprintId, ValidationInputError};
use sprint_export::{ExportFormat, ShortlistExport};
use sprint_llm::{LlmError, SharedProvider};
use sprint_research::{Discovery, DiscoveryRequest, ResearchConfig, Researcher};
use sprint_store::{MemoryStore, StoreError};
use std::sync::Arc;
use tracing::{info, warn};

/// Provider type shared by both collaborators
pub type DynProvider = dyn LlmProvider<Error = LlmError> + Send + Sync;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Sprint and company store
    pub store: Arc<MemoryStore>,
    /// Candidate generation collaborator
    pub discovery: Arc<Discovery<DynProvider>>,
    /// Funding validation collaborator
    pub researcher: Arc<Researcher<DynProvider>>,
    /// Trust, freshness and fit rules
    pub rules: Arc<RulesConfig>,
    /// Maximum size of the Top Recommendation bucket
    pub top_cap: usize,
    /// Model name, for the health check
    pub model: String,
}

impl AppState {
    /// Wire the collaborators around a store and provider
    pub fn new(
        store: Arc<MemoryStore>,
        llm: SharedProvider,
        research: ResearchConfig,
        rules: RulesConfig,
    ) -> Self {
        let model = llm.model_name().to_string();
        let discovery = Discovery::new(Arc::clone(&llm), research.clone(), rules.fit);
        let top_cap = research.top_cap;
        let researcher = Researcher::new(llm, research, rules.clone());
        AppState {
            store,
            discovery: Arc::new(discovery),
            researcher: Arc::new(researcher),
            rules: Arc::new(rules),
            top_cap,
            model,
        }
    }

    fn sprint(&self, id: &SprintId) -> Result<Sprint, AppError> {
        self.store
            .get_sprint(id)?
            .ok_or_else(|| StoreError::SprintNotFound(id.clone()).into())
    }

    fn company(&self, id: &CompanyId) -> Result<Company, AppError> {
        self.store
            .get_company(id)?
            .ok_or_else(|| StoreError::CompanyNotFound(id.clone()).into())
    }

    fn view(&self, company: Company) -> CompanyView {
        let funding = company.snapshot(&self.rules.freshness, Utc::now());
        CompanyView { company, funding }
    }

    fn views(&self, companies: Vec<Company>) -> Vec<CompanyView> {
        companies.into_iter().map(|c| self.view(c)).collect()
    }
}

/// GET /health
async fn health_check(State(state): State<AppState>) -> Result<Json<HealthResponse>, AppError> {
    Ok(Json(HealthResponse {
        status: "healthy".to_string(),
        sprints: state.store.list_sprints()?.len(),
        companies: state.store.company_count()?,
        model: state.model.clone(),
    }))
}

/// GET /sprints
async fn list_sprints(State(state): State<AppState>) -> Result<Json<Vec<SprintView>>, AppError> {
    let sprints = state.store.list_sprints()?;
    Ok(Json(sprints.into_iter().map(SprintView::from).collect()))
}

/// POST /sprints
async fn create_sprint(
    State(state): State<AppState>,
    Json(request): Json<CreateSprintRequest>,
) -> Result<(StatusCode, Json<SprintView>), AppError> {
    let sprint = state.store.create_sprint(request.into_new_sprint()?)?;
    info!(sprint = %sprint.id, name = %sprint.name, "Sprint created");
    Ok((StatusCode::CREATED, Json(sprint.into())))
}

/// GET /sprints/:id
async fn get_sprint(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<SprintView>, AppError> {
    Ok(Json(state.sprint(&SprintId::from(id))?.into()))
}

/// PUT /sprints/:id/criteria
async fn update_criteria(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<UpdateSprintRequest>,
) -> Result<Json<SprintView>, AppError> {
    let sprint = state
        .store
        .update_criteria(&SprintId::from(id), request.into_update()?)?;
    Ok(Json(sprint.into()))
}

/// GET /sprints/:id/companies
async fn list_companies(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(params): Query<CompanyListParams>,
) -> Result<Json<Vec<CompanyView>>, AppError> {
    let companies = state
        .store
        .list_companies(&SprintId::from(id), &params.into_query()?)?;
    Ok(Json(state.views(companies)))
}

/// POST /sprints/:id/companies
async fn add_company(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<NewCompanyRequest>,
) -> Result<(StatusCode, Json<CompanyView>), AppError> {
    let sprint = state.sprint(&SprintId::from(id))?;
    let company = request.into_company(sprint.id, &state.rules.fit)?;
    let company = state.store.upsert_company(company)?;
    info!(company = %company.id, name = %company.name, "Company added manually");
    Ok((StatusCode::CREATED, Json(state.view(company))))
}

/// POST /sprints/:id/discover
async fn discover(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Option<Json<DiscoverRequest>>,
) -> Result<Json<DiscoverResponse>, AppError> {
    let sprint = state.sprint(&SprintId::from(id))?;
    let existing = state.store.list_companies(&sprint.id, &CompanyQuery::default())?;

    let mut request = DiscoveryRequest::for_sprint(&sprint, &existing);
    if let Some(count) = body.and_then(|Json(b)| b.count) {
        request = request.with_target_count(count);
    }

    let report = state.discovery.discover(&request).await?;
    for company in &report.companies {
        state.store.upsert_company(company.clone())?;
    }
    if !report.rejected.is_empty() {
        warn!(sprint = %sprint.id, rejected = report.rejected.len(), "Discovery skipped entries");
    }

    Ok(Json(DiscoverResponse {
        added: report.companies.len(),
        ranked: report.ranked(state.top_cap),
        adjustments: report.adjustments,
        rejected: report.rejected,
    }))
}

/// GET /sprints/:id/shortlist
async fn shortlist(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Vec<CompanyView>>, AppError> {
    let companies = state.store.shortlist(&SprintId::from(id))?;
    Ok(Json(state.views(companies)))
}

/// GET /sprints/:id/export
async fn export_shortlist(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(params): Query<ExportParams>,
) -> Result<Response, AppError> {
    let format = ExportFormat::parse(params.format.as_deref().unwrap_or_default())?;
    let sprint = state.sprint(&SprintId::from(id))?;
    let companies = state.store.shortlist(&sprint.id)?;

    let export = ShortlistExport {
        sprint: &sprint,
        companies: &companies,
        freshness: &state.rules.freshness,
        generated_at: Utc::now(),
    };
    let body = export.render(format)?;
    info!(sprint = %sprint.id, ?format, companies = companies.len(), "Shortlist exported");

    let headers = [
        (header::CONTENT_TYPE, format.content_type().to_string()),
        (
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", format.file_name(&sprint)),
        ),
    ];
    Ok((headers, body).into_response())
}

/// GET /companies/:id
async fn get_company(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<CompanyView>, AppError> {
    let company = state.company(&CompanyId::from(id))?;
    Ok(Json(state.view(company)))
}

/// DELETE /companies/:id
async fn delete_company(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    let removed = state.store.remove_company(&CompanyId::from(id))?;
    info!(company = %removed.id, name = %removed.name, "Company removed");
    Ok(StatusCode::NO_CONTENT)
}

/// POST /companies/:id/validate
async fn validate_company(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ValidateResponse>, AppError> {
    let company = state.company(&CompanyId::from(id))?;
    let now = Utc::now();

    let outcome = state.researcher.validate(&company, now).await?;
    if outcome.dropped_sources > 0 {
        warn!(company = %company.id, dropped = outcome.dropped_sources, "Dropped malformed sources");
    }
    let updated = state.store.record_validation(&company.id, outcome.claims, now)?;

    Ok(Json(ValidateResponse {
        company: state.view(updated),
        dropped_sources: outcome.dropped_sources,
        summary_mismatches: outcome.summary_mismatches,
    }))
}

/// PUT /companies/:id/shortlist
async fn set_shortlist(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<ShortlistRequest>,
) -> Result<Json<CompanyView>, AppError> {
    let status = ShortlistStatus::parse(&request.status).ok_or_else(|| {
        ValidationInputError::invalid("status", format!("unknown shortlist status '{}'", request.status))
    })?;
    let company = state
        .store
        .set_shortlist(&CompanyId::from(id), status, Utc::now())?;
    Ok(Json(state.view(company)))
}

/// POST /companies/:id/notes
async fn add_note(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<NoteRequest>,
) -> Result<Json<CompanyView>, AppError> {
    let text = request.text.trim();
    if text.is_empty() {
        return Err(ValidationInputError::MissingField("text".to_string()).into());
    }
    let company = state.store.append_note(&CompanyId::from(id), text, Utc::now())?;
    Ok(Json(state.view(company)))
}

/// Create the axum router with all routes
pub fn create_router(state: AppState) -> AxumRouter {
    AxumRouter::new()
        .route("/health", get(health_check))
        .route("/sprints", get(list_sprints).post(create_sprint))
        .route("/sprints/:id", get(get_sprint))
        .route("/sprints/:id/criteria", put(update_criteria))
        .route("/sprints/:id/companies", get(list_companies).post(add_company))
        .route("/sprints/:id/discover", post(discover))
        .route("/sprints/:id/shortlist", get(shortlist))
        .route("/sprints/:id/export", get(export_shortlist))
        .route("/companies/:id", get(get_company).delete(delete_company))
        .route("/companies/:id/validate", post(validate_company))
        .route("/companies/:id/shortlist", put(set_shortlist))
        .route("/companies/:id/notes", post(add_note))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use sprint_domain::TrustTable;
    use sprint_llm::MockProvider;
    use tower::ServiceExt; // for oneshot

    fn create_test_state() -> AppState {
        let store = Arc::new(MemoryStore::with_demo_data(&TrustTable::default()).unwrap());
        AppState::new(
            store,
            Arc::new(MockProvider::default()),
            ResearchConfig::default(),
            RulesConfig::default(),
        )
    }

    #[tokio::test]
    async fn test_health_check() {
        let app = create_router(create_test_state());

        let request = Request::builder()
            .uri("/health")
            .body(Body::empty())
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_unknown_company() {
        let app = create_router(create_test_state());

        let request = Request::builder()
            .uri("/companies/nope")
            .body(Body::empty())
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
