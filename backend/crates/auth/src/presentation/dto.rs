//! API DTOs (Data Transfer Objects)
//!
//! Success bodies are wrapped in `kernel::response::ApiResponse`.

use serde::{Deserialize, Serialize};

use crate::domain::entity::{identity::Identity, identity::IdentityStats, SessionClaims};

// ============================================================================
// Challenge
// ============================================================================

/// Nonce the wallet must sign
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CsrfResponse {
    pub csrf_token: String,
}

// ============================================================================
// Sign In
// ============================================================================

/// Sign in request
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct SignInRequest {
    /// JSON-encoded sign-in message
    pub message: String,
    /// Base58 signature over the prepared message
    pub signature: String,
}

/// Sign in response
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SignInResponse {
    pub identity_key: String,
    pub display_name: String,
    pub avatar_ref: Option<String>,
    pub expires_at_ms: i64,
    pub is_new_identity: bool,
}

// ============================================================================
// Session Status
// ============================================================================

/// Session status response
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionStatusResponse {
    pub authenticated: bool,
    pub user: Option<SessionClaims>,
    pub expires_at_ms: Option<i64>,
}

// ============================================================================
// Identity
// ============================================================================

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IdentityResponse {
    pub identity_id: String,
    pub wallet_address: String,
    pub display_name: String,
    pub avatar_ref: Option<String>,
    pub level: i32,
    pub xp: i64,
    pub stats: IdentityStats,
    pub created_at_ms: i64,
}

impl From<Identity> for IdentityResponse {
    fn from(identity: Identity) -> Self {
        Self {
            identity_id: identity.identity_id.to_string(),
            wallet_address: identity.wallet_address.into_inner(),
            display_name: identity.display_name,
            avatar_ref: identity.avatar_ref,
            level: identity.level,
            xp: identity.xp,
            stats: identity.stats,
            created_at_ms: identity.created_at.timestamp_millis(),
        }
    }
}

// ============================================================================
// Error Page
// ============================================================================

#[derive(Debug, Clone, Deserialize)]
pub struct AuthErrorQuery {
    pub error: Option<String>,
}

/// User-facing description of an auth error code
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthErrorResponse {
    pub code: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    pub can_retry: bool,
}
