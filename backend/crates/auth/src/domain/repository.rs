//! Repository Traits
//!
//! Interfaces for data persistence. Implementation is in infrastructure layer.

use kernel::id::ChallengeId;

use crate::domain::entity::{challenge::Challenge, identity::Identity};
use crate::domain::value_object::wallet_address::WalletAddress;
use crate::error::AuthResult;

/// Identity store
#[trait_variant::make(IdentityRepository: Send)]
pub trait LocalIdentityRepository {
    /// Find identity by wallet address
    async fn find_by_wallet(&self, wallet: &WalletAddress) -> AuthResult<Option<Identity>>;

    /// Insert a new identity.
    ///
    /// If another identity with the same wallet was stored concurrently,
    /// the stored one is returned instead.
    async fn create(&self, identity: &Identity) -> AuthResult<Identity>;
}

/// Issued sign-in challenges
#[trait_variant::make(ChallengeRepository: Send)]
pub trait LocalChallengeRepository {
    /// Store a freshly issued challenge
    async fn create(&self, challenge: &Challenge) -> AuthResult<()>;

    /// Remove and return a challenge. A second call for the same id
    /// returns `None`.
    async fn consume(&self, challenge_id: ChallengeId) -> AuthResult<Option<Challenge>>;

    /// Drop challenges that expired before `now_ms`
    async fn purge_expired(&self, now_ms: i64) -> AuthResult<u64>;
}
