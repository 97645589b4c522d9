//! Sign In Use Case
//!
//! Verifies a signed wallet challenge and issues a session.
//!
//! Steps, in order: parse, rate limit, validate, verify signature, bind the
//! nonce to the browser's challenge, resolve the identity, finalize. Each
//! rejection stops the attempt; the rate limit counter is kept on failure
//! and cleared on success.

use std::sync::Arc;

use chrono::Utc;
use kernel::id::ChallengeId;
use platform::rate_limit::RateLimitStore;

use crate::application::config::AuthConfig;
use crate::application::rate_limiter::AuthRateLimiter;
use crate::application::session_token::{self, SessionPayload};
use crate::domain::entity::{identity::Identity, session_claims::SessionClaims};
use crate::domain::entity::sign_in_message::SignInMessage;
use crate::domain::repository::{ChallengeRepository, IdentityRepository};
use crate::domain::value_object::wallet_address::WalletAddress;
use crate::error::{AuthError, AuthResult, RejectReason};

/// Sign in input
pub struct SignInInput {
    /// JSON envelope `{domain, publicKey, nonce, statement?}`
    pub message: String,
    /// Base58 detached signature over the prepared message
    pub signature: String,
    /// Challenge id from the browser's challenge cookie
    pub challenge_id: Option<ChallengeId>,
}

/// Sign in output
#[derive(Debug)]
pub struct SignInOutput {
    pub claims: SessionClaims,
    /// Signed value for the session cookie
    pub session_token: String,
    pub expires_at_ms: i64,
    pub is_new_identity: bool,
}

/// Sign in use case
pub struct SignInUseCase<I, C, S>
where
    I: IdentityRepository,
    C: ChallengeRepository,
    S: RateLimitStore,
{
    identity_repo: Arc<I>,
    challenge_repo: Arc<C>,
    rate_limiter: AuthRateLimiter<S>,
    config: Arc<AuthConfig>,
}

impl<I, C, S> SignInUseCase<I, C, S>
where
    I: IdentityRepository,
    C: ChallengeRepository,
    S: RateLimitStore,
{
    pub fn new(
        identity_repo: Arc<I>,
        challenge_repo: Arc<C>,
        rate_limit_store: Arc<S>,
        config: Arc<AuthConfig>,
    ) -> Self {
        let rate_limiter = AuthRateLimiter::new(rate_limit_store, config.rate_limit.clone());

        Self {
            identity_repo,
            challenge_repo,
            rate_limiter,
            config,
        }
    }

    pub async fn execute(&self, input: SignInInput) -> AuthResult<SignInOutput> {
        // Parse
        let message =
            SignInMessage::from_json(&input.message).map_err(|_| RejectReason::MalformedMessage)?;

        // Rate limit (the attempt counts even if it fails later)
        let limit = self
            .rate_limiter
            .check_rate_limit(message.public_key())
            .await?;
        if !limit.allowed {
            return Err(RejectReason::RateLimited.into());
        }

        // Structural validation
        let report = message.validate();
        if !report.valid {
            return Err(RejectReason::ValidationFailed(report.errors).into());
        }

        if message.domain() != self.config.domain {
            tracing::debug!(
                domain = %message.domain(),
                expected = %self.config.domain,
                "Sign-in message for a different domain"
            );
        }

        // Signature
        if !message.verify(&input.signature) {
            return Err(RejectReason::BadSignature.into());
        }

        // Nonce binding
        let now_ms = Utc::now().timestamp_millis();
        self.consume_challenge(input.challenge_id, message.nonce(), now_ms)
            .await?;

        // Identity resolve
        let wallet = WalletAddress::parse(message.public_key())
            .map_err(|e| AuthError::Internal(format!("Validated key rejected: {e}")))?;
        let (identity, is_new_identity) = self.resolve_identity(wallet).await?;

        // Finalize
        self.rate_limiter
            .reset_rate_limit(identity.wallet_address.as_str())
            .await?;

        let payload = SessionPayload {
            claims: SessionClaims::from(&identity),
            expires_at_ms: now_ms.saturating_add(self.config.session_ttl_ms()),
        };
        let session_token = session_token::encode(&self.config.session_secret, &payload)?;

        tracing::info!(
            wallet = %identity.wallet_address,
            identity_id = %identity.identity_id,
            is_new_identity,
            "Wallet signed in"
        );

        Ok(SignInOutput {
            claims: payload.claims,
            session_token,
            expires_at_ms: payload.expires_at_ms,
            is_new_identity,
        })
    }

    /// Consume the browser's challenge and compare its nonce.
    ///
    /// The challenge is removed even when the nonce does not match.
    async fn consume_challenge(
        &self,
        challenge_id: Option<ChallengeId>,
        nonce: &str,
        now_ms: i64,
    ) -> AuthResult<()> {
        let challenge_id = challenge_id.ok_or(RejectReason::StaleChallenge)?;

        let challenge = self
            .challenge_repo
            .consume(challenge_id)
            .await?
            .ok_or(RejectReason::StaleChallenge)?;

        if challenge.is_expired(now_ms) || !challenge.matches(nonce) {
            return Err(RejectReason::StaleChallenge.into());
        }

        Ok(())
    }

    async fn resolve_identity(&self, wallet: WalletAddress) -> AuthResult<(Identity, bool)> {
        if let Some(identity) = self.identity_repo.find_by_wallet(&wallet).await? {
            return Ok((identity, false));
        }

        let candidate = Identity::with_default_profile(wallet);
        let stored = self.identity_repo.create(&candidate).await?;
        let is_new = stored.identity_id == candidate.identity_id;

        if is_new {
            tracing::info!(
                wallet = %stored.wallet_address,
                display_name = %stored.display_name,
                "Created identity"
            );
        }

        Ok((stored, is_new))
    }
}
