//! Mapping of library errors to HTTP responses

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::{Deserialize, Serialize};
use sprint_domain::ValidationInputError;
use sprint_export::ExportError;
use sprint_research::ResearchError;
use sprint_store::StoreError;
use tracing::{error, warn};

/// Error body returned by every failing route
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error message
    pub error: String,
    /// Whether repeating the request may succeed
    pub retryable: bool,
}

/// Application error type
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Rejected user input
    #[error(transparent)]
    Input(#[from] ValidationInputError),

    /// Store failure
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Discovery or validation collaborator failure
    #[error(transparent)]
    Research(#[from] ResearchError),

    /// Export rendering failure
    #[error(transparent)]
    Export(#[from] ExportError),
}

impl AppError {
    fn status(&self) -> StatusCode {
        match self {
            AppError::Input(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Store(StoreError::SprintNotFound(_) | StoreError::CompanyNotFound(_)) => {
                StatusCode::NOT_FOUND
            }
            AppError::Store(StoreError::InvalidInput(_)) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Store(StoreError::Poisoned) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Research(e) if e.is_unavailable() => StatusCode::SERVICE_UNAVAILABLE,
            AppError::Research(_) => StatusCode::BAD_GATEWAY,
            AppError::Export(ExportError::UnknownFormat(_)) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Export(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn retryable(&self) -> bool {
        matches!(self, AppError::Research(_))
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!(status = status.as_u16(), "{}", self);
        } else {
            warn!(status = status.as_u16(), "{}", self);
        }

        let body = Json(ErrorResponse {
            error: self.to_string(),
            retryable: self.retryable(),
        });
        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sprint_domain::SprintId;

    #[test]
    fn test_status_mapping() {
        let not_found = AppError::from(StoreError::SprintNotFound(SprintId::from("x")));
        assert_eq!(not_found.status(), StatusCode::NOT_FOUND);

        let input = AppError::from(ValidationInputError::MissingField("name".into()));
        assert_eq!(input.status(), StatusCode::UNPROCESSABLE_ENTITY);

        let timeout = AppError::from(ResearchError::Timeout);
        assert_eq!(timeout.status(), StatusCode::SERVICE_UNAVAILABLE);
        assert!(timeout.retryable());

        let garbled = AppError::from(ResearchError::InvalidFormat("no JSON".into()));
        assert_eq!(garbled.status(), StatusCode::BAD_GATEWAY);
        assert!(garbled.retryable());

        let format = AppError::from(ExportError::UnknownFormat("docx".into()));
        assert_eq!(format.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert!(!format.retryable());
    }
}
