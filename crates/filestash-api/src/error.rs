//! Maps domain `AppError` to HTTP responses.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use filestash_core::error::{AppError, ErrorKind};

use crate::dto::response::ApiErrorResponse;

/// Status code and machine-readable code for an error kind.
pub fn status_for(kind: ErrorKind) -> (StatusCode, &'static str) {
    match kind {
        ErrorKind::NotFound => (StatusCode::NOT_FOUND, "NOT_FOUND"),
        ErrorKind::Unauthorized => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED"),
        ErrorKind::AlreadyConsumed => (StatusCode::GONE, "LINK_CONSUMED"),
        ErrorKind::Expired => (StatusCode::GONE, "LINK_EXPIRED"),
        ErrorKind::Validation => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR"),
        ErrorKind::PayloadTooLarge => (StatusCode::PAYLOAD_TOO_LARGE, "PAYLOAD_TOO_LARGE"),
        ErrorKind::Conflict => (StatusCode::CONFLICT, "CONFLICT"),
        ErrorKind::Database | ErrorKind::ServiceUnavailable => {
            (StatusCode::SERVICE_UNAVAILABLE, "SERVICE_UNAVAILABLE")
        }
        ErrorKind::Internal
        | ErrorKind::Storage
        | ErrorKind::Configuration
        | ErrorKind::Serialization => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let err = self.0;
        let (status, code) = status_for(err.kind);
        let retryable = err.is_retryable();

        // Server-side details stay in the log.
        let message = if status.is_server_error() {
            tracing::error!(kind = %err.kind, error = %err, "Request failed");
            match status {
                StatusCode::SERVICE_UNAVAILABLE => "Service temporarily unavailable".to_string(),
                _ => "Internal server error".to_string(),
            }
        } else {
            err.message
        };

        let body = ApiErrorResponse {
            error: code.to_string(),
            message,
            retryable,
        };

        (status, Json(body)).into_response()
    }
}

/// Handler error type. Wraps `AppError` so it can implement `IntoResponse`.
#[derive(Debug)]
pub struct ApiError(pub AppError);

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        Self(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_link_errors_are_distinct() {
        let consumed = status_for(ErrorKind::AlreadyConsumed);
        let expired = status_for(ErrorKind::Expired);
        assert_eq!(consumed.0, StatusCode::GONE);
        assert_eq!(expired.0, StatusCode::GONE);
        assert_ne!(consumed.1, expired.1);
        assert_eq!(status_for(ErrorKind::NotFound).0, StatusCode::NOT_FOUND);
        assert_eq!(status_for(ErrorKind::Unauthorized).0, StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn test_internal_message_is_hidden() {
        let response =
            ApiError::from(AppError::storage("disk /var/lib/filestash is full")).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_database_errors_are_unavailable() {
        let response = ApiError::from(AppError::database("pool timed out")).into_response();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }
}
