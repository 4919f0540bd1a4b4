use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::dto::{ErrorBody, ErrorResponse};

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Validation error: {0}")]
    InvalidFields(#[from] validator::ValidationErrors),

    #[error("Invalid reference: {0}")]
    InvalidReference(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    fn status(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Validation(_)
            | AppError::InvalidFields(_)
            | AppError::InvalidReference(_) => StatusCode::BAD_REQUEST,
            AppError::Database(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn code(&self) -> &'static str {
        match self {
            AppError::NotFound(_) => "not_found",
            AppError::Validation(_) | AppError::InvalidFields(_) => "validation_error",
            AppError::InvalidReference(_) => "invalid_reference",
            AppError::Database(_) | AppError::Internal(_) => "internal_error",
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let (message, details) = match &self {
            AppError::NotFound(msg)
            | AppError::Validation(msg)
            | AppError::InvalidReference(msg) => (msg.clone(), None),
            AppError::InvalidFields(errors) => (
                "One or more fields are invalid".to_string(),
                serde_json::to_value(errors).ok(),
            ),
            AppError::Database(e) => {
                tracing::error!(error = %e, "Database error");
                ("Internal server error".to_string(), None)
            }
            AppError::Internal(e) => {
                tracing::error!(error = %e, "Internal error");
                ("Internal server error".to_string(), None)
            }
        };

        let body = ErrorResponse {
            error: ErrorBody {
                code: self.code().to_string(),
                message,
                status: status.as_u16(),
                details,
            },
        };

        (status, Json(body)).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;
