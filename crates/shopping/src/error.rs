//! Unified error handling with Sentry integration.
//!
//! Every handler returns `Result<T, AppError>`. Errors render as
//! `{"error": "<message>"}`; server errors are captured to Sentry and their
//! details are not exposed to clients.

use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use cartpay_backend::services::{AuthError, ServiceError};
use serde::Serialize;
use thiserror::Error;
use utoipa::ToSchema;

/// Body of every error response.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
}

/// Application-level error type for the REST gateway.
#[derive(Debug, Error)]
pub enum AppError {
    /// Service operation failed.
    #[error(transparent)]
    Service(#[from] ServiceError),

    /// Token missing, invalid, or could not be issued.
    #[error(transparent)]
    Auth(#[from] AuthError),

    /// Request body could not be decoded.
    #[error("{0}")]
    BadRequest(String),
}

impl AppError {
    const fn status(&self) -> StatusCode {
        match self {
            Self::Service(ServiceError::InvalidInput(_)) | Self::BadRequest(_) => {
                StatusCode::BAD_REQUEST
            }
            Self::Service(ServiceError::NotFound(_)) => StatusCode::NOT_FOUND,
            Self::Auth(AuthError::MissingToken | AuthError::InvalidToken) => {
                StatusCode::UNAUTHORIZED
            }
            Self::Service(ServiceError::Storage(_)) | Self::Auth(AuthError::Signing(_)) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        // Capture server errors to Sentry
        if status.is_server_error() {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        // Don't expose internal error details to clients
        let message = match &self {
            Self::Service(ServiceError::Storage(_)) => "internal server error".to_string(),
            Self::Auth(AuthError::Signing(_)) => "failed to generate token".to_string(),
            _ => self.to_string(),
        };

        (status, Json(ErrorResponse { error: message })).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;
    use cartpay_backend::db::RepositoryError;

    fn get_status(err: AppError) -> StatusCode {
        err.into_response().status()
    }

    #[test]
    fn test_app_error_display() {
        let err = AppError::Service(ServiceError::NotFound("payment not found".to_string()));
        assert_eq!(err.to_string(), "payment not found");

        let err = AppError::Auth(AuthError::MissingToken);
        assert_eq!(err.to_string(), "missing authorization token");
    }

    #[test]
    fn test_app_error_status_codes() {
        assert_eq!(
            get_status(AppError::Service(ServiceError::InvalidInput("x".to_string()))),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            get_status(AppError::Service(ServiceError::NotFound("x".to_string()))),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            get_status(AppError::Service(ServiceError::Storage(
                RepositoryError::NotFound
            ))),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            get_status(AppError::Auth(AuthError::InvalidToken)),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            get_status(AppError::BadRequest("x".to_string())),
            StatusCode::BAD_REQUEST
        );
    }
}
