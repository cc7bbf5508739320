//! Application error types.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use hearth_core::assistant::AssistantError;
use hearth_core::auth::AuthError;
use hearth_core::feed::FeedError;
use hearth_core::help::HelpError;
use hearth_core::store::StoreError;
use thiserror::Error;
use tracing::error;

use crate::models::ErrorResponse;

/// Convenience alias for handler return types.
pub type AppResult<T> = Result<T, AppError>;

/// Application-level errors with HTTP status mapping.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Dependency failure: {0}")]
    DependencyFailure(String),

    #[error("Internal server error")]
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error, message) = match &self {
            AppError::Validation(m) => (StatusCode::BAD_REQUEST, "validation_error", m.as_str()),
            AppError::Unauthorized(m) => (StatusCode::UNAUTHORIZED, "unauthorized", m.as_str()),
            AppError::NotFound(m) => (StatusCode::NOT_FOUND, "not_found", m.as_str()),
            AppError::Conflict(m) => (StatusCode::CONFLICT, "conflict", m.as_str()),
            AppError::DependencyFailure(m) => {
                error!("dependency failure: {m}");
                (
                    StatusCode::BAD_GATEWAY,
                    "dependency_failure",
                    "External service unavailable",
                )
            }
            AppError::Internal(m) => {
                error!("internal error: {m}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    "Internal server error",
                )
            }
        };
        let body = Json(ErrorResponse {
            error: error.to_string(),
            message: message.to_string(),
        });
        (status, body).into_response()
    }
}

impl From<StoreError> for AppError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::NotFound(msg) => AppError::NotFound(msg),
            StoreError::Conflict(msg) => AppError::Conflict(msg),
            StoreError::Corrupt(_) | StoreError::Db(_) => AppError::Internal(e.to_string()),
        }
    }
}

impl From<AuthError> for AppError {
    fn from(e: AuthError) -> Self {
        match e {
            AuthError::CredentialError => AppError::Unauthorized("Invalid credentials".into()),
            AuthError::Unauthorized(msg) => AppError::Unauthorized(msg),
            AuthError::TokenError(msg) => AppError::Internal(msg),
            AuthError::Conflict(msg) => AppError::Conflict(msg),
            AuthError::ValidationError(msg) => AppError::Validation(msg),
            AuthError::Store(e) => AppError::from(e),
            AuthError::Internal(msg) => AppError::Internal(msg),
        }
    }
}

impl From<HelpError> for AppError {
    fn from(e: HelpError) -> Self {
        match e {
            HelpError::Validation(msg) => AppError::Validation(msg),
            HelpError::NotFound(msg) => AppError::NotFound(msg),
            HelpError::InvalidTransition { .. } => AppError::Conflict(e.to_string()),
            HelpError::Store(e) => AppError::from(e),
            HelpError::Auth(e) => AppError::from(e),
        }
    }
}

impl From<FeedError> for AppError {
    fn from(e: FeedError) -> Self {
        match e {
            FeedError::Store(e) => AppError::from(e),
        }
    }
}

impl From<AssistantError> for AppError {
    fn from(e: AssistantError) -> Self {
        match e {
            AssistantError::Validation(msg) => AppError::Validation(msg),
            AssistantError::Dependency(e) => AppError::DependencyFailure(e.to_string()),
            AssistantError::Io(e) => AppError::Internal(e.to_string()),
        }
    }
}
