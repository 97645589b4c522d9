//! HTTP Handlers

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{AppendHeaders, IntoResponse};
use kernel::id::ChallengeId;
use kernel::response::ApiResponse;
use platform::rate_limit::RateLimitStore;
use std::sync::Arc;
use uuid::Uuid;

use crate::application::config::AuthConfig;
use crate::application::{CheckSessionUseCase, IssueChallengeUseCase, SignInInput, SignInUseCase};
use crate::domain::repository::{ChallengeRepository, IdentityRepository};
use crate::domain::value_object::wallet_address::WalletAddress;
use crate::error::{AuthError, AuthResult, RejectReason};
use crate::presentation::dto::{
    AuthErrorQuery, AuthErrorResponse, CsrfResponse, IdentityResponse, SessionStatusResponse,
    SignInRequest, SignInResponse,
};
use crate::presentation::error_code::AuthErrorCode;

/// Shared state for auth handlers
pub struct AuthAppState<I, C, S> {
    pub identities: Arc<I>,
    pub challenges: Arc<C>,
    pub rate_limits: Arc<S>,
    pub config: Arc<AuthConfig>,
}

impl<I, C, S> Clone for AuthAppState<I, C, S> {
    fn clone(&self) -> Self {
        Self {
            identities: Arc::clone(&self.identities),
            challenges: Arc::clone(&self.challenges),
            rate_limits: Arc::clone(&self.rate_limits),
            config: Arc::clone(&self.config),
        }
    }
}

// ============================================================================
// Challenge
// ============================================================================

/// GET /api/auth/csrf
pub async fn csrf<I, C, S>(
    State(state): State<AuthAppState<I, C, S>>,
) -> AuthResult<impl IntoResponse>
where
    I: IdentityRepository + Send + Sync + 'static,
    C: ChallengeRepository + Send + Sync + 'static,
    S: RateLimitStore + Send + Sync + 'static,
{
    let use_case = IssueChallengeUseCase::new(state.challenges.clone(), state.config.clone());
    let challenge = use_case.execute().await?;

    let cookie = state
        .config
        .challenge_cookie()
        .build_set_cookie(&challenge.challenge_id.to_string());

    Ok((
        StatusCode::OK,
        [(header::SET_COOKIE, cookie)],
        Json(ApiResponse::ok(CsrfResponse {
            csrf_token: challenge.nonce,
        })),
    ))
}

// ============================================================================
// Sign In
// ============================================================================

/// POST /api/auth/callback
pub async fn sign_in<I, C, S>(
    State(state): State<AuthAppState<I, C, S>>,
    headers: HeaderMap,
    body: Result<Json<SignInRequest>, JsonRejection>,
) -> AuthResult<impl IntoResponse>
where
    I: IdentityRepository + Send + Sync + 'static,
    C: ChallengeRepository + Send + Sync + 'static,
    S: RateLimitStore + Send + Sync + 'static,
{
    let Json(req) = body.map_err(|_| RejectReason::MalformedMessage)?;

    let challenge_id = platform::cookie::extract_cookie(&headers, &state.config.challenge_cookie_name)
        .and_then(|value| Uuid::parse_str(&value).ok())
        .map(ChallengeId::from_uuid);

    let use_case = SignInUseCase::new(
        state.identities.clone(),
        state.challenges.clone(),
        state.rate_limits.clone(),
        state.config.clone(),
    );

    let output = use_case
        .execute(SignInInput {
            message: req.message,
            signature: req.signature,
            challenge_id,
        })
        .await?;

    let session_cookie = state
        .config
        .session_cookie()
        .build_set_cookie(&output.session_token);
    let clear_challenge = state.config.challenge_cookie().build_delete_cookie();

    Ok((
        StatusCode::OK,
        AppendHeaders([
            (header::SET_COOKIE, session_cookie),
            (header::SET_COOKIE, clear_challenge),
        ]),
        Json(ApiResponse::ok(SignInResponse {
            identity_key: output.claims.identity_key,
            display_name: output.claims.display_name,
            avatar_ref: output.claims.avatar_ref,
            expires_at_ms: output.expires_at_ms,
            is_new_identity: output.is_new_identity,
        })),
    ))
}

// ============================================================================
// Session
// ============================================================================

/// GET /api/auth/session
pub async fn session_status<I, C, S>(
    State(state): State<AuthAppState<I, C, S>>,
    headers: HeaderMap,
) -> Json<ApiResponse<SessionStatusResponse>>
where
    I: IdentityRepository + Send + Sync + 'static,
    C: ChallengeRepository + Send + Sync + 'static,
    S: RateLimitStore + Send + Sync + 'static,
{
    let use_case = CheckSessionUseCase::new(state.config.clone());

    let payload = platform::cookie::extract_cookie(&headers, &state.config.session_cookie_name)
        .and_then(|token| use_case.execute(&token).ok());

    let response = match payload {
        Some(payload) => SessionStatusResponse {
            authenticated: true,
            user: Some(payload.claims),
            expires_at_ms: Some(payload.expires_at_ms),
        },
        None => SessionStatusResponse {
            authenticated: false,
            user: None,
            expires_at_ms: None,
        },
    };

    Json(ApiResponse::ok(response))
}

/// POST /api/auth/signout
pub async fn sign_out<I, C, S>(State(state): State<AuthAppState<I, C, S>>) -> impl IntoResponse
where
    I: IdentityRepository + Send + Sync + 'static,
    C: ChallengeRepository + Send + Sync + 'static,
    S: RateLimitStore + Send + Sync + 'static,
{
    let cookie = state.config.session_cookie().build_delete_cookie();

    (StatusCode::NO_CONTENT, [(header::SET_COOKIE, cookie)])
}

// ============================================================================
// Error Page
// ============================================================================

/// GET /api/auth/error?error=<code>
pub async fn auth_error(Query(query): Query<AuthErrorQuery>) -> Json<ApiResponse<AuthErrorResponse>> {
    let code = AuthErrorCode::parse(query.error.as_deref());
    Json(ApiResponse::ok(code.into()))
}

// ============================================================================
// Identity (requires session + ownership)
// ============================================================================

/// GET /api/auth/identities/{wallet}
pub async fn get_identity<I, C, S>(
    State(state): State<AuthAppState<I, C, S>>,
    Path(wallet): Path<String>,
) -> AuthResult<Json<ApiResponse<IdentityResponse>>>
where
    I: IdentityRepository + Send + Sync + 'static,
    C: ChallengeRepository + Send + Sync + 'static,
    S: RateLimitStore + Send + Sync + 'static,
{
    let wallet = WalletAddress::parse(wallet).map_err(|_| AuthError::IdentityNotFound)?;

    let identity = state
        .identities
        .find_by_wallet(&wallet)
        .await?
        .ok_or(AuthError::IdentityNotFound)?;

    Ok(Json(ApiResponse::ok(identity.into())))
}
