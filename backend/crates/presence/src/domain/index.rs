//! Presence Index
//!
//! Plain data structure behind every presence store: entries keyed by
//! identity plus one aggregate per game. All methods take the current time
//! explicitly and do O(1) work apart from the snapshot helpers.
//!
//! Invariants kept by every mutation:
//! - an identity has at most one entry, and it is a member of exactly the
//!   game its entry names
//! - an aggregate with no members is removed immediately

use std::collections::HashMap;

use crate::domain::entities::{
    DebugSnapshot, GameDebugInfo, GamePresence, GamePresenceSnapshot, PresenceEntry,
};
use crate::domain::value_objects::GameKey;

#[derive(Debug, Default)]
pub struct PresenceIndex {
    entries: HashMap<String, PresenceEntry>,
    games: HashMap<GameKey, GamePresence>,
}

impl PresenceIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Put `identity` into `game`, leaving any other game first.
    /// Returns the member count of `game`.
    pub fn register(
        &mut self,
        identity: &str,
        game: &GameKey,
        session_tag: Option<String>,
        now_ms: i64,
    ) -> usize {
        let previous = self
            .entries
            .get(identity)
            .map(|entry| entry.game_key.clone())
            .filter(|previous| previous != game);

        if let Some(previous) = previous {
            self.leave(identity, &previous, now_ms);
        }

        self.entries.insert(
            identity.to_string(),
            PresenceEntry::new(identity, game.clone(), now_ms, session_tag),
        );

        let aggregate = self.games.entry(game.clone()).or_default();
        aggregate.members.insert(identity.to_string());
        aggregate.last_activity_ms = now_ms;
        aggregate.online_count()
    }

    /// Remove `identity` from `game`. No-op when it is not a member there.
    /// Returns the remaining member count, 0 when the aggregate is gone.
    pub fn unregister(&mut self, identity: &str, game: &GameKey, now_ms: i64) -> usize {
        if self
            .entries
            .get(identity)
            .is_some_and(|entry| entry.game_key == *game)
        {
            self.entries.remove(identity);
        }

        self.leave(identity, game, now_ms)
    }

    fn leave(&mut self, identity: &str, game: &GameKey, now_ms: i64) -> usize {
        let Some(aggregate) = self.games.get_mut(game) else {
            return 0;
        };

        aggregate.members.remove(identity);
        aggregate.last_activity_ms = now_ms;

        if aggregate.members.is_empty() {
            self.games.remove(game);
            return 0;
        }

        aggregate.online_count()
    }

    /// Refresh the entry for (`identity`, `game`). Never registers.
    pub fn heartbeat(&mut self, identity: &str, game: &GameKey, now_ms: i64) -> bool {
        let Some(entry) = self
            .entries
            .get_mut(identity)
            .filter(|entry| entry.game_key == *game)
        else {
            return false;
        };

        entry.last_seen_ms = now_ms;
        if let Some(aggregate) = self.games.get_mut(game) {
            aggregate.last_activity_ms = now_ms;
        }
        true
    }

    pub fn game_count(&self, game: &GameKey) -> usize {
        self.games.get(game).map_or(0, GamePresence::online_count)
    }

    /// One snapshot per game with members, ordered by key
    pub fn snapshot(&self) -> Vec<GamePresenceSnapshot> {
        let mut games: Vec<GamePresenceSnapshot> = self
            .games
            .iter()
            .map(|(game_key, aggregate)| GamePresenceSnapshot {
                game_key: game_key.clone(),
                online_count: aggregate.online_count(),
                last_activity_ms: aggregate.last_activity_ms,
            })
            .collect();
        games.sort_by(|a, b| a.game_key.cmp(&b.game_key));
        games
    }

    /// Distinct identities across all games
    pub fn total_online(&self) -> usize {
        self.entries.len()
    }

    pub fn entry(&self, identity: &str) -> Option<&PresenceEntry> {
        self.entries.get(identity)
    }

    pub fn is_active(&self, identity: &str, game: &GameKey, now_ms: i64, threshold_ms: i64) -> bool {
        self.entries
            .get(identity)
            .is_some_and(|entry| entry.game_key == *game && entry.is_active(now_ms, threshold_ms))
    }

    /// (identity, game) pairs silent for longer than `threshold_ms`
    pub fn stale_candidates(&self, now_ms: i64, threshold_ms: i64) -> Vec<(String, GameKey)> {
        self.entries
            .values()
            .filter(|entry| entry.is_stale(now_ms, threshold_ms))
            .map(|entry| (entry.identity.clone(), entry.game_key.clone()))
            .collect()
    }

    /// Unregister the entry only if it is still in `game` and still stale
    pub fn evict_if_stale(
        &mut self,
        identity: &str,
        game: &GameKey,
        now_ms: i64,
        threshold_ms: i64,
    ) -> bool {
        let stale = self.entries.get(identity).is_some_and(|entry| {
            entry.game_key == *game && entry.is_stale(now_ms, threshold_ms)
        });

        if stale {
            self.unregister(identity, game, now_ms);
        }
        stale
    }

    pub fn debug_snapshot(&self) -> DebugSnapshot {
        let mut games: Vec<GameDebugInfo> = self
            .games
            .iter()
            .map(|(game_key, aggregate)| {
                let mut users: Vec<String> = aggregate.members.iter().cloned().collect();
                users.sort();
                GameDebugInfo {
                    game_key: game_key.clone(),
                    user_count: users.len(),
                    users,
                }
            })
            .collect();
        games.sort_by(|a, b| a.game_key.cmp(&b.game_key));

        DebugSnapshot {
            total_games: self.games.len(),
            total_unique_users: self.total_online(),
            games,
        }
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.games.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(slug: &str) -> GameKey {
        GameKey::parse(slug).unwrap()
    }

    #[test]
    fn test_reregister_same_game_refreshes() {
        let mut index = PresenceIndex::new();
        let snake = key("snake");

        assert_eq!(index.register("alice", &snake, None, 1_000), 1);
        assert_eq!(index.register("alice", &snake, Some("tab-2".into()), 5_000), 1);

        let entry = index.entry("alice").unwrap();
        assert_eq!(entry.last_seen_ms, 5_000);
        assert_eq!(entry.session_tag.as_deref(), Some("tab-2"));
        assert_eq!(index.total_online(), 1);
    }

    #[test]
    fn test_unregister_other_game_keeps_entry() {
        let mut index = PresenceIndex::new();
        let snake = key("snake");
        let tetris = key("tetris");

        index.register("alice", &snake, None, 1_000);
        index.register("bob", &tetris, None, 1_000);

        // alice is not in tetris: bob's count is untouched and alice stays put
        assert_eq!(index.unregister("alice", &tetris, 2_000), 1);
        assert_eq!(index.game_count(&snake), 1);
        assert!(index.entry("alice").is_some());
    }

    #[test]
    fn test_unregister_unknown_game_is_zero() {
        let mut index = PresenceIndex::new();
        assert_eq!(index.unregister("alice", &key("snake"), 1_000), 0);
    }

    #[test]
    fn test_active_and_stale_boundaries() {
        let mut index = PresenceIndex::new();
        let snake = key("snake");
        index.register("alice", &snake, None, 0);

        assert!(index.is_active("alice", &snake, 99, 100));
        assert!(!index.is_active("alice", &snake, 100, 100));
        assert!(!index.is_active("alice", &key("tetris"), 0, 100));

        // exactly at the threshold: neither active nor stale
        assert!(index.stale_candidates(100, 100).is_empty());
        assert_eq!(index.stale_candidates(101, 100).len(), 1);
    }

    #[test]
    fn test_evict_if_stale_rechecks() {
        let mut index = PresenceIndex::new();
        let snake = key("snake");
        index.register("alice", &snake, None, 0);

        let candidates = index.stale_candidates(500, 100);
        assert_eq!(candidates, vec![("alice".to_string(), snake.clone())]);

        // heartbeat lands between collection and eviction
        assert!(index.heartbeat("alice", &snake, 450));
        assert!(!index.evict_if_stale("alice", &snake, 500, 100));
        assert_eq!(index.game_count(&snake), 1);
    }

    #[test]
    fn test_debug_snapshot_sorted() {
        let mut index = PresenceIndex::new();
        index.register("carol", &key("tetris"), None, 0);
        index.register("bob", &key("snake"), None, 0);
        index.register("alice", &key("snake"), None, 0);

        let debug = index.debug_snapshot();
        assert_eq!(debug.total_games, 2);
        assert_eq!(debug.total_unique_users, 3);
        assert_eq!(debug.games[0].game_key.as_str(), "snake");
        assert_eq!(debug.games[0].users, vec!["alice", "bob"]);
        assert_eq!(debug.games[1].user_count, 1);
    }

    #[test]
    fn test_clear() {
        let mut index = PresenceIndex::new();
        index.register("alice", &key("snake"), None, 0);
        index.clear();
        assert_eq!(index.total_online(), 0);
        assert!(index.snapshot().is_empty());
    }
}
