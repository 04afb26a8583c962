//! Error handling for the application

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use uuid::Uuid;

use crate::quote::responses::ErrorResponse;
use crate::quote::EditError;

/// Application error type
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Quote session {0} not found")]
    SessionNotFound(Uuid),

    #[error("{0}")]
    Edit(#[from] EditError),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_type) = match &self {
            AppError::SessionNotFound(_) => (StatusCode::NOT_FOUND, "session_not_found"),
            AppError::Edit(e) => {
                tracing::warn!("Rejected quote edit: {}", e);
                (StatusCode::UNPROCESSABLE_ENTITY, "invalid_edit")
            }
        };

        let body = ErrorResponse {
            error_type: error_type.to_string(),
            message: self.to_string(),
            details: None,
        };

        (status, Json(body)).into_response()
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
