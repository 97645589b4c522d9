//! Repository Traits
//!
//! Interfaces for presence storage and the game catalog. Implementations
//! live in the infrastructure layer.
//!
//! Presence stores never fail: absence is a zero count or `false`.
//! Timestamps are passed in so every backend applies the same clock.

use crate::domain::entities::{
    DebugSnapshot, GameCatalogEntry, GamePresenceSnapshot, PresenceEntry,
};
use crate::domain::value_objects::GameKey;

/// Presence store trait
#[trait_variant::make(PresenceRepository: Send)]
pub trait LocalPresenceRepository {
    /// Register into `game`, leaving any previous game. Returns the new count.
    async fn register(
        &self,
        identity: &str,
        game: &GameKey,
        session_tag: Option<String>,
        now_ms: i64,
    ) -> usize;

    /// Leave `game`. Returns the remaining count.
    async fn unregister(&self, identity: &str, game: &GameKey, now_ms: i64) -> usize;

    /// Refresh an existing entry. Returns whether one was found.
    async fn heartbeat(&self, identity: &str, game: &GameKey, now_ms: i64) -> bool;

    async fn game_count(&self, game: &GameKey) -> usize;

    async fn all_games(&self) -> Vec<GamePresenceSnapshot>;

    async fn total_online(&self) -> usize;

    async fn entry(&self, identity: &str) -> Option<PresenceEntry>;

    /// Entries silent for longer than `threshold_ms`
    ///
    /// A single-lock store scans every entry under that lock, so this call is
    /// O(n) in online users while writers wait. Eviction itself goes through
    /// [`evict_if_stale`](Self::evict_if_stale) one entry at a time.
    async fn stale_entries(&self, now_ms: i64, threshold_ms: i64) -> Vec<(String, GameKey)>;

    /// Evict one entry if it is still stale. Returns whether it was removed.
    async fn evict_if_stale(
        &self,
        identity: &str,
        game: &GameKey,
        now_ms: i64,
        threshold_ms: i64,
    ) -> bool;

    async fn debug_snapshot(&self) -> DebugSnapshot;

    async fn clear(&self);
}

/// Game catalog trait
#[trait_variant::make(GameCatalog: Send)]
pub trait LocalGameCatalog {
    /// Active games, in display order
    async fn list_active(&self) -> Vec<GameCatalogEntry>;

    async fn find(&self, game: &GameKey) -> Option<GameCatalogEntry>;
}
