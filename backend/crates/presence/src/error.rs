//! Presence Error Types
//!
//! Store operations never fail; these errors only come from the HTTP
//! surface (unknown game, disabled debug view).

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use kernel::error::{app_error::AppError, kind::ErrorKind};
use thiserror::Error;

/// Presence-specific result type alias
pub type PresenceResult<T> = Result<T, PresenceError>;

#[derive(Debug, Error)]
pub enum PresenceError {
    /// Game key is malformed or not in the active catalog
    #[error("Game not found: {0}")]
    GameNotFound(String),

    /// Request body is present but not a valid registration
    #[error("Invalid request body: {0}")]
    InvalidBody(String),

    /// Debug snapshot requested while debug endpoints are off
    #[error("Debug endpoint not available in production")]
    DebugDisabled,

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl PresenceError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            PresenceError::GameNotFound(_) => StatusCode::NOT_FOUND,
            PresenceError::InvalidBody(_) => StatusCode::BAD_REQUEST,
            PresenceError::DebugDisabled => StatusCode::FORBIDDEN,
            PresenceError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the ErrorKind for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            PresenceError::GameNotFound(_) => ErrorKind::NotFound,
            PresenceError::InvalidBody(_) => ErrorKind::BadRequest,
            PresenceError::DebugDisabled => ErrorKind::Forbidden,
            PresenceError::Internal(_) => ErrorKind::InternalServerError,
        }
    }

    /// Message safe to return to the client
    pub fn public_message(&self) -> &'static str {
        match self {
            PresenceError::GameNotFound(_) => "Game not found",
            PresenceError::InvalidBody(_) => "Invalid request body",
            PresenceError::DebugDisabled => "Debug endpoint not available in production",
            PresenceError::Internal(_) => "Internal server error",
        }
    }

    /// Convert to AppError
    pub fn to_app_error(&self) -> AppError {
        AppError::new(self.kind(), self.public_message())
    }

    fn log(&self) {
        match self {
            PresenceError::Internal(msg) => {
                tracing::error!(message = %msg, "Presence internal error");
            }
            PresenceError::GameNotFound(key) => {
                tracing::debug!(game_key = %key, "Unknown game requested");
            }
            PresenceError::InvalidBody(detail) => {
                tracing::debug!(detail = %detail, "Rejected presence request body");
            }
            PresenceError::DebugDisabled => {
                tracing::warn!("Debug snapshot requested while disabled");
            }
        }
    }
}

impl IntoResponse for PresenceError {
    fn into_response(self) -> Response {
        self.log();
        self.to_app_error().into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(
            PresenceError::GameNotFound("nope".into()).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            PresenceError::InvalidBody("eof".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(PresenceError::DebugDisabled.status_code(), StatusCode::FORBIDDEN);
        assert_eq!(
            PresenceError::Internal("boom".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_internal_detail_is_not_public() {
        let err = PresenceError::Internal("mutex poisoned".into());
        assert_eq!(err.public_message(), "Internal server error");
        assert_eq!(err.to_app_error().message(), "Internal server error");
    }
}
