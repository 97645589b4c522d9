//! Issue Challenge Use Case
//!
//! Hands out the nonce a wallet must sign.

use std::sync::Arc;

use chrono::Utc;

use crate::application::config::AuthConfig;
use crate::domain::entity::challenge::Challenge;
use crate::domain::repository::ChallengeRepository;
use crate::error::AuthResult;

pub struct IssueChallengeUseCase<C>
where
    C: ChallengeRepository,
{
    challenge_repo: Arc<C>,
    config: Arc<AuthConfig>,
}

impl<C> IssueChallengeUseCase<C>
where
    C: ChallengeRepository,
{
    pub fn new(challenge_repo: Arc<C>, config: Arc<AuthConfig>) -> Self {
        Self {
            challenge_repo,
            config,
        }
    }

    pub async fn execute(&self) -> AuthResult<Challenge> {
        let challenge = Challenge::issue(
            Utc::now().timestamp_millis(),
            self.config.challenge_ttl_ms(),
        );

        self.challenge_repo.create(&challenge).await?;

        tracing::debug!(challenge_id = %challenge.challenge_id, "Issued sign-in challenge");

        Ok(challenge)
    }
}
