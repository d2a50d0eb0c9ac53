use axum::Json;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use crate::auth::AuthRejection;
use crate::database::StoreError;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    Auth(AuthRejection),
    #[error("invalid credentials")]
    InvalidCredentials,
    #[error("validation failed")]
    Validation(Vec<String>),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Conflict(String),
    #[error("store unavailable: {0}")]
    StoreUnavailable(String),
    #[error("internal error: {0}")]
    Internal(String),
}

impl From<StoreError> for AppError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::Conflict(msg) => AppError::Conflict(msg),
            StoreError::Unavailable(msg) => AppError::StoreUnavailable(msg),
        }
    }
}

#[derive(Serialize)]
struct ErrorResponse {
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    reason: Option<AuthRejection>,
}

#[derive(Serialize)]
struct ValidationResponse {
    errors: Vec<String>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message, reason) = match self {
            AppError::Auth(AuthRejection::MissingToken) => (
                StatusCode::UNAUTHORIZED,
                AuthRejection::MissingToken.to_string(),
                Some(AuthRejection::MissingToken),
            ),
            AppError::Auth(rejection) => {
                (StatusCode::FORBIDDEN, rejection.to_string(), Some(rejection))
            }
            AppError::InvalidCredentials => (
                StatusCode::UNAUTHORIZED,
                "invalid credentials".to_string(),
                None,
            ),
            AppError::Validation(errors) => {
                return (StatusCode::BAD_REQUEST, Json(ValidationResponse { errors }))
                    .into_response();
            }
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg, None),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, msg, None),
            // Store and internal details stay in the log.
            AppError::StoreUnavailable(detail) | AppError::Internal(detail) => {
                tracing::error!("request failed: {}", detail);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal server error".to_string(),
                    None,
                )
            }
        };

        (status, Json(ErrorResponse { message, reason })).into_response()
    }
}
