//! API error handling
//!
//! Maps layer errors to HTTP statuses with JSON bodies. Authentication
//! failures stay opaque; authorization failures name the rule violated.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use ev_auth::GuardError;
use ev_db::RepositoryError;
use serde::Serialize;

/// API error types
#[derive(Debug)]
pub enum ApiError {
    NotFound { resource: &'static str },
    Unauthorized(String),
    Forbidden(String),
    BadRequest(String),
    Conflict(String),
    Internal(String),
}

impl ApiError {
    pub fn unauthorized(msg: impl Into<String>) -> Self {
        ApiError::Unauthorized(msg.into())
    }

    pub fn bad_request(msg: impl Into<String>) -> Self {
        ApiError::BadRequest(msg.into())
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::NotFound { .. } => StatusCode::NOT_FOUND,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            ApiError::NotFound { .. } => "not_found",
            ApiError::Unauthorized(_) => "unauthenticated",
            ApiError::Forbidden(_) => "forbidden",
            ApiError::BadRequest(_) => "bad_request",
            ApiError::Conflict(_) => "conflict",
            ApiError::Internal(_) => "internal_error",
        }
    }
}

#[derive(Serialize)]
struct ErrorBody {
    error: &'static str,
    message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let message = match &self {
            ApiError::NotFound { resource } => format!("{} not found", resource),
            ApiError::Unauthorized(msg) => msg.clone(),
            ApiError::Forbidden(msg) => msg.clone(),
            ApiError::BadRequest(msg) => msg.clone(),
            ApiError::Conflict(msg) => msg.clone(),
            // Internal detail stays in the logs, not the response.
            ApiError::Internal(_) => "internal server error".to_string(),
        };

        if let ApiError::Internal(detail) = &self {
            tracing::error!(%detail, "internal error");
        }

        let body = ErrorBody {
            error: self.error_code(),
            message,
        };

        (status, Json(body)).into_response()
    }
}

impl From<GuardError> for ApiError {
    fn from(err: GuardError) -> Self {
        match err {
            GuardError::InvalidCredentials => {
                ApiError::Unauthorized("Invalid email or password".into())
            }
            GuardError::InvalidToken | GuardError::UnknownSubject => {
                ApiError::Unauthorized("Not authenticated".into())
            }
            GuardError::Forbidden(msg) => ApiError::Forbidden(msg),
            GuardError::NotFound => ApiError::NotFound { resource: "event" },
            GuardError::Store(e) => ApiError::Internal(e.to_string()),
            GuardError::Issuance(e) => ApiError::Internal(e),
        }
    }
}

impl From<RepositoryError> for ApiError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound(msg) => {
                tracing::debug!(%msg, "repository lookup missed");
                ApiError::NotFound { resource: "entity" }
            }
            RepositoryError::Conflict(msg) => ApiError::Conflict(msg),
            RepositoryError::Database(e) => ApiError::Internal(e.to_string()),
        }
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
