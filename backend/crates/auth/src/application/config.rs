//! Application Configuration
//!
//! Configuration for the Auth application layer.

use std::time::Duration;

use platform::cookie::CookieConfig;
use platform::rate_limit::RateLimitConfig;

/// Re-export SameSite from platform
pub use platform::cookie::SameSite;

/// Auth application configuration
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// Domain expected in signed messages (informational, logged on mismatch)
    pub domain: String,
    /// Session cookie name
    pub session_cookie_name: String,
    /// Challenge cookie name (holds the challenge id, never the nonce)
    pub challenge_cookie_name: String,
    /// Session secret key for HMAC signing (32 bytes)
    pub session_secret: [u8; 32],
    /// Session lifetime (30 days)
    pub session_ttl: Duration,
    /// How long an issued nonce stays usable (10 minutes)
    pub challenge_ttl: Duration,
    /// Sign-in attempts per wallet (5 per 15 minutes)
    pub rate_limit: RateLimitConfig,
    /// Whether to require Secure cookie
    pub cookie_secure: bool,
    /// SameSite policy
    pub cookie_same_site: SameSite,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            domain: "localhost".to_string(),
            session_cookie_name: "wallet_session".to_string(),
            challenge_cookie_name: "wallet_challenge".to_string(),
            session_secret: [0u8; 32],
            session_ttl: Duration::from_secs(30 * 24 * 3600), // 30 days
            challenge_ttl: Duration::from_secs(10 * 60),      // 10 minutes
            rate_limit: RateLimitConfig::default(),
            cookie_secure: true,
            cookie_same_site: SameSite::Lax,
        }
    }
}

impl AuthConfig {
    /// Create config with a random session secret (for development)
    pub fn with_random_secret() -> Self {
        use rand::RngCore;
        let mut secret = [0u8; 32];
        rand::rng().fill_bytes(&mut secret);
        Self {
            session_secret: secret,
            ..Default::default()
        }
    }

    /// Create config for development (insecure cookie)
    pub fn development() -> Self {
        Self {
            cookie_secure: false,
            ..Self::with_random_secret()
        }
    }

    /// Get session TTL in milliseconds (saturating)
    pub fn session_ttl_ms(&self) -> i64 {
        duration_ms(self.session_ttl)
    }

    /// Get challenge TTL in milliseconds (saturating)
    pub fn challenge_ttl_ms(&self) -> i64 {
        duration_ms(self.challenge_ttl)
    }

    pub fn session_cookie(&self) -> CookieConfig {
        CookieConfig {
            secure: self.cookie_secure,
            same_site: self.cookie_same_site,
            max_age_secs: Some(self.session_ttl.as_secs()),
            ..CookieConfig::named(&self.session_cookie_name)
        }
    }

    pub fn challenge_cookie(&self) -> CookieConfig {
        CookieConfig {
            secure: self.cookie_secure,
            same_site: self.cookie_same_site,
            max_age_secs: Some(self.challenge_ttl.as_secs()),
            ..CookieConfig::named(&self.challenge_cookie_name)
        }
    }
}

fn duration_ms(duration: Duration) -> i64 {
    i64::try_from(duration.as_millis()).unwrap_or(i64::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_ttls() {
        let config = AuthConfig::default();
        assert_eq!(config.session_ttl_ms(), 30 * 24 * 3600 * 1000);
        assert_eq!(config.challenge_ttl_ms(), 10 * 60 * 1000);
    }

    #[test]
    fn test_huge_ttl_saturates() {
        let config = AuthConfig {
            session_ttl: Duration::from_secs(u64::MAX),
            ..AuthConfig::default()
        };
        assert_eq!(config.session_ttl_ms(), i64::MAX);
    }
}
