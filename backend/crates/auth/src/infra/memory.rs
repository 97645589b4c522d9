//! In-memory Repository Implementations
//!
//! Used when no database is configured, and by tests.

use std::collections::HashMap;
use std::sync::Mutex;

use kernel::id::ChallengeId;

use crate::domain::entity::{challenge::Challenge, identity::Identity};
use crate::domain::repository::{ChallengeRepository, IdentityRepository};
use crate::domain::value_object::wallet_address::WalletAddress;
use crate::error::AuthResult;

// ============================================================================
// Identity Repository
// ============================================================================

#[derive(Debug, Default)]
pub struct MemoryIdentityRepository {
    identities: Mutex<HashMap<String, Identity>>,
}

impl MemoryIdentityRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.identities
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl IdentityRepository for MemoryIdentityRepository {
    async fn find_by_wallet(&self, wallet: &WalletAddress) -> AuthResult<Option<Identity>> {
        Ok(self
            .identities
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .get(wallet.as_str())
            .cloned())
    }

    async fn create(&self, identity: &Identity) -> AuthResult<Identity> {
        let mut identities = self.identities.lock().unwrap_or_else(|e| e.into_inner());
        let stored = identities
            .entry(identity.wallet_address.as_str().to_string())
            .or_insert_with(|| identity.clone());
        Ok(stored.clone())
    }
}

// ============================================================================
// Challenge Repository
// ============================================================================

#[derive(Debug, Default)]
pub struct MemoryChallengeRepository {
    challenges: Mutex<HashMap<ChallengeId, Challenge>>,
}

impl MemoryChallengeRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.challenges
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl ChallengeRepository for MemoryChallengeRepository {
    async fn create(&self, challenge: &Challenge) -> AuthResult<()> {
        self.challenges
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert(challenge.challenge_id, challenge.clone());
        Ok(())
    }

    async fn consume(&self, challenge_id: ChallengeId) -> AuthResult<Option<Challenge>> {
        Ok(self
            .challenges
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .remove(&challenge_id))
    }

    async fn purge_expired(&self, now_ms: i64) -> AuthResult<u64> {
        let mut challenges = self.challenges.lock().unwrap_or_else(|e| e.into_inner());
        let before = challenges.len();
        challenges.retain(|_, challenge| !challenge.is_expired(now_ms));
        let purged = (before - challenges.len()) as u64;

        if purged > 0 {
            tracing::debug!(purged, "Purged expired sign-in challenges");
        }

        Ok(purged)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use platform::crypto::to_base58;

    fn wallet(byte: u8) -> WalletAddress {
        WalletAddress::parse(to_base58(&[byte; 32])).unwrap()
    }

    #[tokio::test]
    async fn test_identity_create_then_find() {
        let repo = MemoryIdentityRepository::new();
        let identity = Identity::with_default_profile(wallet(1));

        assert!(repo.find_by_wallet(&wallet(1)).await.unwrap().is_none());
        let stored = repo.create(&identity).await.unwrap();
        assert_eq!(stored.identity_id, identity.identity_id);

        let found = repo.find_by_wallet(&wallet(1)).await.unwrap().unwrap();
        assert_eq!(found.identity_id, identity.identity_id);
    }

    #[tokio::test]
    async fn test_identity_create_keeps_first() {
        let repo = MemoryIdentityRepository::new();
        let first = Identity::with_default_profile(wallet(2));
        let second = Identity::with_default_profile(wallet(2));

        repo.create(&first).await.unwrap();
        let stored = repo.create(&second).await.unwrap();

        assert_eq!(stored.identity_id, first.identity_id);
        assert_eq!(repo.len(), 1);
    }

    #[tokio::test]
    async fn test_challenge_consume_is_single_use() {
        let repo = MemoryChallengeRepository::new();
        let challenge = Challenge::issue(0, 1_000);

        repo.create(&challenge).await.unwrap();
        assert!(repo.consume(challenge.challenge_id).await.unwrap().is_some());
        assert!(repo.consume(challenge.challenge_id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_challenge_purge_expired() {
        let repo = MemoryChallengeRepository::new();
        repo.create(&Challenge::issue(0, 100)).await.unwrap();
        repo.create(&Challenge::issue(0, 10_000)).await.unwrap();

        assert_eq!(repo.purge_expired(5_000).await.unwrap(), 1);
        assert_eq!(repo.len(), 1);
    }
}
