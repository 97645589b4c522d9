//! Auth Middleware
//!
//! Composable guards for protected routes:
//! - [`require_auth_session`] answers 401 without a valid session cookie and
//!   otherwise stores an [`AuthenticatedIdentity`] in the request extensions
//! - [`require_wallet_owner`] answers 403 unless the `{wallet}` path segment
//!   is the session's own wallet
//!
//! Apply them with `route_layer`, session guard outermost.

use axum::extract::{FromRequestParts, Path, Request, State};
use axum::http::HeaderValue;
use axum::http::request::Parts;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use std::sync::Arc;

use crate::application::CheckSessionUseCase;
use crate::application::config::AuthConfig;
use crate::application::session_token::SessionPayload;
use crate::domain::entity::SessionClaims;
use crate::error::AuthError;

/// Verified session holder, available to handlers behind [`require_auth_session`]
#[derive(Debug, Clone)]
pub struct AuthenticatedIdentity {
    pub claims: SessionClaims,
    pub expires_at_ms: i64,
}

impl AuthenticatedIdentity {
    /// Wallet address the session was issued to
    pub fn wallet(&self) -> &str {
        &self.claims.identity_key
    }
}

impl From<SessionPayload> for AuthenticatedIdentity {
    fn from(payload: SessionPayload) -> Self {
        Self {
            claims: payload.claims,
            expires_at_ms: payload.expires_at_ms,
        }
    }
}

impl<S> FromRequestParts<S> for AuthenticatedIdentity
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthenticatedIdentity>()
            .cloned()
            .ok_or_else(unauthorized)
    }
}

fn unauthorized() -> Response {
    let mut response = AuthError::SessionInvalid.into_response();
    response
        .headers_mut()
        .insert("X-Auth-Required", HeaderValue::from_static("true"));
    response
}

/// Middleware that requires a valid auth session
pub async fn require_auth_session(
    State(config): State<Arc<AuthConfig>>,
    mut req: Request,
    next: Next,
) -> Response {
    let token = platform::cookie::extract_cookie(req.headers(), &config.session_cookie_name);

    let payload = token.and_then(|token| CheckSessionUseCase::new(config).execute(&token).ok());

    match payload {
        Some(payload) => {
            req.extensions_mut()
                .insert(AuthenticatedIdentity::from(payload));
            next.run(req).await
        }
        None => unauthorized(),
    }
}

/// Middleware that requires the session wallet to match the `{wallet}` path segment
pub async fn require_wallet_owner(
    Path(wallet): Path<String>,
    req: Request,
    next: Next,
) -> Response {
    let Some(identity) = req.extensions().get::<AuthenticatedIdentity>() else {
        return unauthorized();
    };

    if identity.wallet() != wallet {
        tracing::warn!(
            session_wallet = %identity.wallet(),
            requested_wallet = %wallet,
            "Wallet ownership mismatch"
        );
        return AuthError::OwnershipRequired.into_response();
    }

    next.run(req).await
}
