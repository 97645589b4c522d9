//! In-memory Presence Store
//!
//! One mutex around the whole index. Every call holds it for a single
//! index operation only; the sweep takes it once for the O(n) candidate
//! scan and then once per candidate. Sharding the index is the next step
//! if that scan starts to show up in heartbeat latency.

use std::sync::{Mutex, MutexGuard};

use crate::domain::entities::{DebugSnapshot, GamePresenceSnapshot, PresenceEntry};
use crate::domain::index::PresenceIndex;
use crate::domain::repository::PresenceRepository;
use crate::domain::value_objects::GameKey;

#[derive(Debug, Default)]
pub struct MemoryPresenceRepository {
    index: Mutex<PresenceIndex>,
}

impl MemoryPresenceRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn index(&self) -> MutexGuard<'_, PresenceIndex> {
        self.index.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl PresenceRepository for MemoryPresenceRepository {
    async fn register(
        &self,
        identity: &str,
        game: &GameKey,
        session_tag: Option<String>,
        now_ms: i64,
    ) -> usize {
        self.index().register(identity, game, session_tag, now_ms)
    }

    async fn unregister(&self, identity: &str, game: &GameKey, now_ms: i64) -> usize {
        self.index().unregister(identity, game, now_ms)
    }

    async fn heartbeat(&self, identity: &str, game: &GameKey, now_ms: i64) -> bool {
        self.index().heartbeat(identity, game, now_ms)
    }

    async fn game_count(&self, game: &GameKey) -> usize {
        self.index().game_count(game)
    }

    async fn all_games(&self) -> Vec<GamePresenceSnapshot> {
        self.index().snapshot()
    }

    async fn total_online(&self) -> usize {
        self.index().total_online()
    }

    async fn entry(&self, identity: &str) -> Option<PresenceEntry> {
        self.index().entry(identity).cloned()
    }

    async fn stale_entries(&self, now_ms: i64, threshold_ms: i64) -> Vec<(String, GameKey)> {
        self.index().stale_candidates(now_ms, threshold_ms)
    }

    async fn evict_if_stale(
        &self,
        identity: &str,
        game: &GameKey,
        now_ms: i64,
        threshold_ms: i64,
    ) -> bool {
        self.index()
            .evict_if_stale(identity, game, now_ms, threshold_ms)
    }

    async fn debug_snapshot(&self) -> DebugSnapshot {
        self.index().debug_snapshot()
    }

    async fn clear(&self) {
        self.index().clear();
    }
}
