//! Error types for web handlers.
//!
//! Bridges domain errors to HTTP responses via Axum's `IntoResponse`.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use dearly_booking::BookingError;
use serde::Serialize;

/// Application error type for web handlers.
///
/// Wraps domain errors into HTTP-friendly responses. User-facing categories
/// keep their message; internal failures are logged and masked.
#[derive(Debug)]
pub struct AppError {
    /// HTTP status code
    status: StatusCode,
    /// Error message (user-facing)
    message: String,
    /// Error code (for client error handling)
    code: String,
    /// Internal detail (for logging, not exposed to the client)
    detail: Option<String>,
}

impl AppError {
    /// Create a new application error.
    #[must_use]
    pub const fn new(status: StatusCode, message: String, code: String) -> Self {
        Self {
            status,
            message,
            code,
            detail: None,
        }
    }

    /// Create a 401 Unauthorized error.
    #[must_use]
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(
            StatusCode::UNAUTHORIZED,
            message.into(),
            "UNAUTHORIZED".to_string(),
        )
    }

    /// Create a 403 Forbidden error.
    #[must_use]
    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::new(
            StatusCode::FORBIDDEN,
            message.into(),
            "FORBIDDEN".to_string(),
        )
    }

    /// Create a 422 Unprocessable Entity error.
    #[must_use]
    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(
            StatusCode::UNPROCESSABLE_ENTITY,
            message.into(),
            "VALIDATION_ERROR".to_string(),
        )
    }

    /// Create a 500 Internal Server Error, keeping the detail for logs.
    #[must_use]
    pub fn internal(detail: impl Into<String>) -> Self {
        let mut err = Self::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            "An internal error occurred".to_string(),
            "INTERNAL_ERROR".to_string(),
        );
        err.detail = Some(detail.into());
        err
    }
}

/// Error response body sent to clients.
#[derive(Debug, Serialize)]
struct ErrorResponse {
    /// Machine-readable error code
    code: String,
    /// Human-readable message
    message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            tracing::error!(
                status = %self.status,
                code = %self.code,
                message = %self.message,
                detail = self.detail.as_deref().unwrap_or(""),
                "Internal server error"
            );
        }

        let body = ErrorResponse {
            code: self.code,
            message: self.message,
        };
        (self.status, Json(body)).into_response()
    }
}

impl From<BookingError> for AppError {
    fn from(err: BookingError) -> Self {
        match err {
            BookingError::Validation(msg) => Self::validation(msg),
            BookingError::Conflict(msg) => {
                Self::new(StatusCode::CONFLICT, msg, "CONFLICT".to_string())
            }
            BookingError::NotFound(resource) => Self::new(
                StatusCode::NOT_FOUND,
                format!("{resource} not found"),
                "NOT_FOUND".to_string(),
            ),
            BookingError::Unauthorized(msg) => Self::forbidden(msg),
            BookingError::Internal(detail) => Self::internal(detail),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn booking_errors_map_to_expected_statuses() {
        let cases = [
            (BookingError::Validation("x".into()), StatusCode::UNPROCESSABLE_ENTITY),
            (BookingError::Conflict("x".into()), StatusCode::CONFLICT),
            (BookingError::NotFound("Slot"), StatusCode::NOT_FOUND),
            (BookingError::Unauthorized("x".into()), StatusCode::FORBIDDEN),
            (BookingError::database("x"), StatusCode::INTERNAL_SERVER_ERROR),
        ];
        for (err, status) in cases {
            assert_eq!(AppError::from(err).status, status);
        }
    }

    #[test]
    fn internal_detail_is_not_the_client_message() {
        let err = AppError::internal("connection refused");
        assert_eq!(err.message, "An internal error occurred");
        assert_eq!(err.detail.as_deref(), Some("connection refused"));
    }
}
