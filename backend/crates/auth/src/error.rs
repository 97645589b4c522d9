//! Auth Error Types
//!
//! This module provides auth-specific error variants that integrate
//! with the unified `kernel::error::AppError` system.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use kernel::error::{app_error::AppError, kind::ErrorKind};
use platform::rate_limit::RateLimitStoreError;
use thiserror::Error;

/// Auth-specific result type alias
pub type AuthResult<T> = Result<T, AuthError>;

/// Public body for every rejected sign-in
pub const AUTHENTICATION_FAILED: &str = "Authentication failed";
/// Public body when a route needs a session and none is present
pub const AUTHENTICATION_REQUIRED: &str = "Authentication required";
/// Public body when the session wallet does not own the resource
pub const OWNERSHIP_REQUIRED: &str = "Access denied: wallet ownership required";

/// Why a sign-in attempt was rejected.
///
/// Only ever logged. Clients see [`AUTHENTICATION_FAILED`] for all of them.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RejectReason {
    #[error("malformed message")]
    MalformedMessage,

    #[error("rate limited")]
    RateLimited,

    #[error("validation failed: {}", .0.join(", "))]
    ValidationFailed(Vec<String>),

    #[error("bad signature")]
    BadSignature,

    #[error("stale or replayed challenge")]
    StaleChallenge,
}

/// Auth-specific error variants
#[derive(Debug, Error)]
pub enum AuthError {
    /// Sign-in attempt rejected
    #[error("Sign-in rejected: {0}")]
    Rejected(RejectReason),

    /// Session cookie missing, forged or expired
    #[error("Session not found or expired")]
    SessionInvalid,

    /// Session wallet differs from the requested resource owner
    #[error("Wallet ownership required")]
    OwnershipRequired,

    /// Identity not found
    #[error("Identity not found")]
    IdentityNotFound,

    /// Rate limit backend failure
    #[error(transparent)]
    RateLimitStore(#[from] RateLimitStoreError),

    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AuthError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            AuthError::Rejected(_) | AuthError::SessionInvalid => StatusCode::UNAUTHORIZED,
            AuthError::OwnershipRequired => StatusCode::FORBIDDEN,
            AuthError::IdentityNotFound => StatusCode::NOT_FOUND,
            AuthError::RateLimitStore(_) | AuthError::Database(_) | AuthError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Get the ErrorKind for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            AuthError::Rejected(_) | AuthError::SessionInvalid => ErrorKind::Unauthorized,
            AuthError::OwnershipRequired => ErrorKind::Forbidden,
            AuthError::IdentityNotFound => ErrorKind::NotFound,
            AuthError::RateLimitStore(_) | AuthError::Database(_) | AuthError::Internal(_) => {
                ErrorKind::InternalServerError
            }
        }
    }

    /// Message safe to return to the client
    pub fn public_message(&self) -> &'static str {
        match self {
            AuthError::Rejected(_) => AUTHENTICATION_FAILED,
            AuthError::SessionInvalid => AUTHENTICATION_REQUIRED,
            AuthError::OwnershipRequired => OWNERSHIP_REQUIRED,
            AuthError::IdentityNotFound => "Identity not found",
            AuthError::RateLimitStore(_) | AuthError::Database(_) | AuthError::Internal(_) => {
                "Internal server error"
            }
        }
    }

    /// Convert to AppError
    pub fn to_app_error(&self) -> AppError {
        AppError::new(self.kind(), self.public_message())
    }

    /// Log the error with appropriate level
    fn log(&self) {
        match self {
            AuthError::Database(e) => {
                tracing::error!(error = %e, "Auth database error");
            }
            AuthError::RateLimitStore(e) => {
                tracing::error!(error = %e, "Auth rate limit store error");
            }
            AuthError::Internal(msg) => {
                tracing::error!(message = %msg, "Auth internal error");
            }
            AuthError::Rejected(RejectReason::RateLimited) => {
                tracing::warn!("Sign-in attempt over rate limit");
            }
            AuthError::Rejected(reason) => {
                tracing::warn!(reason = %reason, "Sign-in rejected");
            }
            _ => {
                tracing::debug!(error = %self, "Auth error");
            }
        }
    }
}

impl From<RejectReason> for AuthError {
    fn from(reason: RejectReason) -> Self {
        AuthError::Rejected(reason)
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        self.log();
        self.to_app_error().into_response()
    }
}
