//! Session Token
//!
//! Stateless session cookie: `base64url(json payload) "." base64url(hmac)`.
//! The payload carries the claims and the expiry; the MAC binds both to the
//! server secret.

use platform::crypto::{constant_time_eq, from_base64url, hmac_sha256, to_base64url};
use serde::{Deserialize, Serialize};

use crate::domain::entity::session_claims::SessionClaims;
use crate::error::{AuthError, AuthResult};

/// Decoded session cookie contents
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionPayload {
    pub claims: SessionClaims,
    /// Expiration (Unix timestamp ms)
    pub expires_at_ms: i64,
}

fn mac(secret: &[u8; 32], payload_b64: &str) -> [u8; 32] {
    hmac_sha256(secret, payload_b64.as_bytes())
}

/// Sign claims into a cookie value
pub fn encode(secret: &[u8; 32], payload: &SessionPayload) -> AuthResult<String> {
    let json = serde_json::to_vec(payload)
        .map_err(|e| AuthError::Internal(format!("Session encode failed: {e}")))?;
    let payload_b64 = to_base64url(&json);
    let signature = mac(secret, &payload_b64);

    Ok(format!("{}.{}", payload_b64, to_base64url(&signature)))
}

/// Verify a cookie value and return its payload if still valid at `now_ms`
pub fn decode(secret: &[u8; 32], token: &str, now_ms: i64) -> AuthResult<SessionPayload> {
    let (payload_b64, signature_b64) = token.split_once('.').ok_or(AuthError::SessionInvalid)?;

    let signature = from_base64url(signature_b64).map_err(|_| AuthError::SessionInvalid)?;
    if !constant_time_eq(&mac(secret, payload_b64), &signature) {
        return Err(AuthError::SessionInvalid);
    }

    let json = from_base64url(payload_b64).map_err(|_| AuthError::SessionInvalid)?;
    let payload: SessionPayload =
        serde_json::from_slice(&json).map_err(|_| AuthError::SessionInvalid)?;

    if now_ms >= payload.expires_at_ms {
        return Err(AuthError::SessionInvalid);
    }

    Ok(payload)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload(expires_at_ms: i64) -> SessionPayload {
        SessionPayload {
            claims: SessionClaims {
                identity_key: "wallet".to_string(),
                display_name: "Player_wallet".to_string(),
                avatar_ref: None,
            },
            expires_at_ms,
        }
    }

    #[test]
    fn test_decode_accepts_own_token() {
        let secret = [1u8; 32];
        let token = encode(&secret, &payload(1_000)).unwrap();
        assert_eq!(decode(&secret, &token, 999).unwrap(), payload(1_000));
    }

    #[test]
    fn test_decode_rejects_expired() {
        let secret = [1u8; 32];
        let token = encode(&secret, &payload(1_000)).unwrap();
        assert!(matches!(
            decode(&secret, &token, 1_000),
            Err(AuthError::SessionInvalid)
        ));
    }

    #[test]
    fn test_decode_rejects_other_secret() {
        let token = encode(&[1u8; 32], &payload(1_000)).unwrap();
        assert!(decode(&[2u8; 32], &token, 0).is_err());
    }

    #[test]
    fn test_decode_rejects_swapped_payload() {
        let secret = [1u8; 32];
        let token = encode(&secret, &payload(1_000)).unwrap();
        let forged = encode(&[9u8; 32], &payload(i64::MAX)).unwrap();

        let (_, signature) = token.split_once('.').unwrap();
        let (forged_payload, _) = forged.split_once('.').unwrap();
        let spliced = format!("{forged_payload}.{signature}");

        assert!(decode(&secret, &spliced, 0).is_err());
    }

    #[test]
    fn test_decode_rejects_garbage() {
        let secret = [1u8; 32];
        for token in ["", "abc", "a.b", "!!!.???"] {
            assert!(decode(&secret, token, 0).is_err(), "{token}");
        }
    }
}
