//! Sign-in Rate Limiter
//!
//! Bounds sign-in attempts per wallet. Keyed only by the wallet string.

use std::sync::Arc;

use platform::rate_limit::{RateLimitConfig, RateLimitResult, RateLimitStore};

use crate::error::AuthResult;

pub struct AuthRateLimiter<S>
where
    S: RateLimitStore,
{
    store: Arc<S>,
    config: RateLimitConfig,
}

impl<S> AuthRateLimiter<S>
where
    S: RateLimitStore,
{
    pub fn new(store: Arc<S>, config: RateLimitConfig) -> Self {
        Self { store, config }
    }

    /// Count one attempt for `identity`
    pub async fn check_rate_limit(&self, identity: &str) -> AuthResult<RateLimitResult> {
        let result = self.store.check_and_increment(identity, &self.config).await?;

        if !result.allowed {
            tracing::warn!(
                identity = %identity,
                reset_at_ms = result.reset_at_ms,
                "Sign-in rate limit exceeded"
            );
        }

        Ok(result)
    }

    /// Forget prior attempts after a successful sign-in
    pub async fn reset_rate_limit(&self, identity: &str) -> AuthResult<()> {
        self.store.reset(identity).await?;
        Ok(())
    }
}
