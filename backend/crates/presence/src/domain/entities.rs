//! Domain Entities
//!
//! Core presence types: per-identity entries, per-game aggregates and the
//! read-only snapshots handed out to callers.

use serde::Serialize;
use std::collections::HashSet;

use crate::domain::value_objects::GameKey;

/// Where one identity currently is
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PresenceEntry {
    pub identity: String,
    pub game_key: GameKey,
    /// Last register or heartbeat (Unix timestamp ms)
    pub last_seen_ms: i64,
    /// Opaque client session marker, if the client sent one
    pub session_tag: Option<String>,
}

impl PresenceEntry {
    pub fn new(
        identity: impl Into<String>,
        game_key: GameKey,
        now_ms: i64,
        session_tag: Option<String>,
    ) -> Self {
        Self {
            identity: identity.into(),
            game_key,
            last_seen_ms: now_ms,
            session_tag,
        }
    }

    /// Seen within the threshold
    pub fn is_active(&self, now_ms: i64, threshold_ms: i64) -> bool {
        now_ms - self.last_seen_ms < threshold_ms
    }

    /// Silent for longer than the threshold
    pub fn is_stale(&self, now_ms: i64, threshold_ms: i64) -> bool {
        now_ms - self.last_seen_ms > threshold_ms
    }
}

/// Members of one game
#[derive(Debug, Clone, Default)]
pub struct GamePresence {
    pub members: HashSet<String>,
    pub last_activity_ms: i64,
}

impl GamePresence {
    pub fn online_count(&self) -> usize {
        self.members.len()
    }
}

/// Point-in-time view of one game aggregate
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GamePresenceSnapshot {
    pub game_key: GameKey,
    pub online_count: usize,
    pub last_activity_ms: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GameDebugInfo {
    #[serde(rename = "gameSlug")]
    pub game_key: GameKey,
    pub user_count: usize,
    /// Member identities, sorted
    pub users: Vec<String>,
}

/// Full store dump for the debug endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DebugSnapshot {
    pub total_games: usize,
    pub total_unique_users: usize,
    pub games: Vec<GameDebugInfo>,
}

/// Known game as listed by the catalog
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameCatalogEntry {
    pub game_key: GameKey,
    pub title: String,
}

impl GameCatalogEntry {
    pub fn new(game_key: GameKey, title: impl Into<String>) -> Self {
        Self {
            game_key,
            title: title.into(),
        }
    }
}
