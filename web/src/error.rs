//! Error types for web handlers.
//!
//! This module bridges dispatch errors and HTTP responses, implementing
//! Axum's `IntoResponse` trait.

use crate::routing::RouteError;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use composable_mvc_core::DispatchError;
use serde::Serialize;
use std::fmt;

/// Application error type for web handlers.
///
/// Carries a status, a user-facing message and code, and optionally the
/// internal error for logging.
#[derive(Debug)]
pub struct AppError {
    /// HTTP status code
    status: StatusCode,
    /// Error message (user-facing)
    message: String,
    /// Error code (for client error handling)
    code: String,
    /// Internal error (for logging, not exposed to client)
    source: Option<anyhow::Error>,
}

impl AppError {
    /// Create a new application error.
    #[must_use]
    pub const fn new(status: StatusCode, message: String, code: String) -> Self {
        Self {
            status,
            message,
            code,
            source: None,
        }
    }

    /// Create a new error with a source error.
    #[must_use]
    pub fn with_source(mut self, source: anyhow::Error) -> Self {
        self.source = Some(source);
        self
    }

    /// HTTP status of this error.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        self.status
    }

    /// Machine-readable error code.
    #[must_use]
    pub fn code(&self) -> &str {
        &self.code
    }

    /// Create a 403 Forbidden error.
    #[must_use]
    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::new(StatusCode::FORBIDDEN, message.into(), "FORBIDDEN".to_string())
    }

    /// Create a 404 Not Found error.
    #[must_use]
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message.into(), "NOT_FOUND".to_string())
    }

    /// Create a 500 Internal Server Error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            message.into(),
            "INTERNAL_SERVER_ERROR".to_string(),
        )
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_ref()
            .map(|e| e.as_ref() as &(dyn std::error::Error + 'static))
    }
}

/// Error response body (JSON).
#[derive(Debug, Serialize)]
struct ErrorResponse {
    /// Error code (for client error handling).
    code: String,
    /// Human-readable error message.
    message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            if let Some(source) = &self.source {
                tracing::error!(
                    status = %self.status,
                    code = %self.code,
                    message = %self.message,
                    error = %source,
                    "Internal server error"
                );
            } else {
                tracing::error!(
                    status = %self.status,
                    code = %self.code,
                    message = %self.message,
                    "Internal server error"
                );
            }
        }

        let body = ErrorResponse {
            code: self.code,
            message: self.message,
        };

        (self.status, Json(body)).into_response()
    }
}

/// Convert `anyhow::Error` to `AppError`.
impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        Self::internal("An internal error occurred").with_source(err)
    }
}

/// Not-found dispatch errors become 404; everything else is a 500 whose
/// details stay in the logs.
impl From<DispatchError> for AppError {
    fn from(err: DispatchError) -> Self {
        if err.is_not_found() {
            return Self::not_found(err.to_string());
        }
        let message = match &err {
            DispatchError::ForwardLoopDetected { .. } => "Too many forwards",
            _ => "An internal error occurred",
        };
        Self::internal(message).with_source(err.into())
    }
}

impl From<RouteError> for AppError {
    fn from(err: RouteError) -> Self {
        Self::not_found(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = AppError::forbidden("Access denied");
        assert_eq!(err.to_string(), "[FORBIDDEN] Access denied");
    }

    #[test]
    fn test_not_found_dispatch_errors() {
        let err = AppError::from(DispatchError::ActionNotFound {
            controller: "blog".to_string(),
            action: "missing".to_string(),
        });
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
        assert_eq!(err.code(), "NOT_FOUND");

        let err = AppError::from(DispatchError::ControllerNotFound {
            controller: "ghost".to_string(),
        });
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_other_dispatch_errors_are_internal() {
        let err = AppError::from(DispatchError::ForwardLoopDetected {
            depth: 16,
            chain: vec!["a.ping".to_string(), "b.pong".to_string()],
        });
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.to_string(), "[INTERNAL_SERVER_ERROR] Too many forwards");
        assert!(std::error::Error::source(&err).is_some());

        let err = AppError::from(DispatchError::Action(anyhow::anyhow!("db down")));
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(!err.to_string().contains("db down"));
    }

    #[test]
    fn test_route_errors_are_not_found() {
        let err = AppError::from(RouteError::InvalidSegment("..".to_string()));
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
    }
}
