//! API DTOs (Data Transfer Objects)
//!
//! Success bodies are wrapped in `kernel::response::ApiResponse`.
//! Game keys are exposed as `gameSlug`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::entities::DebugSnapshot;

// ============================================================================
// Single Game
// ============================================================================

/// GET /{game}
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GamePresenceResponse {
    pub game_slug: String,
    pub game_title: String,
    pub online_count: usize,
    pub last_updated: DateTime<Utc>,
}

/// Optional body for POST /{game}
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterPresenceRequest {
    pub session_tag: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterPresenceResponse {
    pub game_slug: String,
    pub game_title: String,
    pub registered: bool,
    pub online_count: usize,
    pub last_updated: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RemovePresenceResponse {
    pub game_slug: String,
    pub removed: bool,
    pub online_count: usize,
    pub last_updated: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HeartbeatResponse {
    pub game_slug: String,
    /// False when the caller is not registered in this game
    pub active: bool,
}

// ============================================================================
// All Games
// ============================================================================

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GamePresenceItem {
    pub game_slug: String,
    pub game_title: String,
    pub online_count: usize,
    /// Last aggregate activity (Unix timestamp ms), 0 when nobody is online
    pub last_activity: i64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PresenceSummary {
    pub active_games: usize,
    pub total_games: usize,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GlobalPresenceResponse {
    pub total_online: usize,
    pub games: Vec<GamePresenceItem>,
    pub last_updated: DateTime<Utc>,
    pub summary: PresenceSummary,
}

// ============================================================================
// Debug
// ============================================================================

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DebugResponse {
    pub debug: DebugSnapshot,
    pub timestamp: DateTime<Utc>,
}
