//! Challenge Entity
//!
//! A server-issued nonce the client must embed in its signed message.
//! The browser holds only the challenge id (HTTP-only cookie); the nonce
//! itself is handed out once and compared when the challenge is consumed.

use kernel::id::ChallengeId;
use platform::crypto::{constant_time_eq, random_token};

/// Nonce entropy in bytes
pub const NONCE_BYTES: usize = 32;

#[derive(Debug, Clone)]
pub struct Challenge {
    pub challenge_id: ChallengeId,
    pub nonce: String,
    /// Expiration (Unix timestamp ms)
    pub expires_at_ms: i64,
}

impl Challenge {
    /// Issue a fresh challenge valid for `ttl_ms` from `now_ms`
    pub fn issue(now_ms: i64, ttl_ms: i64) -> Self {
        Self {
            challenge_id: ChallengeId::new(),
            nonce: random_token(NONCE_BYTES),
            expires_at_ms: now_ms.saturating_add(ttl_ms),
        }
    }

    pub fn is_expired(&self, now_ms: i64) -> bool {
        now_ms >= self.expires_at_ms
    }

    /// Constant-time nonce comparison
    pub fn matches(&self, nonce: &str) -> bool {
        constant_time_eq(self.nonce.as_bytes(), nonce.as_bytes())
    }
}
