//! HTTP Handlers

use auth::middleware::AuthenticatedIdentity;
use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use chrono::Utc;
use kernel::response::ApiResponse;
use std::collections::HashMap;
use std::sync::Arc;

use crate::application::service::PresenceService;
use crate::domain::entities::GameCatalogEntry;
use crate::domain::repository::{GameCatalog, PresenceRepository};
use crate::domain::value_objects::GameKey;
use crate::error::{PresenceError, PresenceResult};
use crate::presentation::dto::{
    DebugResponse, GamePresenceItem, GamePresenceResponse, GlobalPresenceResponse,
    HeartbeatResponse, PresenceSummary, RegisterPresenceRequest, RegisterPresenceResponse,
    RemovePresenceResponse,
};

/// Shared state for presence handlers
pub struct PresenceAppState<R, G> {
    pub service: Arc<PresenceService<R>>,
    pub catalog: Arc<G>,
}

impl<R, G> Clone for PresenceAppState<R, G> {
    fn clone(&self) -> Self {
        Self {
            service: Arc::clone(&self.service),
            catalog: Arc::clone(&self.catalog),
        }
    }
}

fn parse_key(raw: &str) -> PresenceResult<GameKey> {
    GameKey::parse(raw).map_err(|_| PresenceError::GameNotFound(raw.to_string()))
}

async fn find_game<G>(catalog: &G, raw: &str) -> PresenceResult<GameCatalogEntry>
where
    G: GameCatalog + Send + Sync + 'static,
{
    let key = parse_key(raw)?;
    catalog
        .find(&key)
        .await
        .ok_or_else(|| PresenceError::GameNotFound(raw.to_string()))
}

// ============================================================================
// Public
// ============================================================================

/// GET /api/presence
pub async fn global_presence<R, G>(
    State(state): State<PresenceAppState<R, G>>,
) -> Json<ApiResponse<GlobalPresenceResponse>>
where
    R: PresenceRepository + Send + Sync + 'static,
    G: GameCatalog + Send + Sync + 'static,
{
    let games = state.catalog.list_active().await;
    let presence: HashMap<GameKey, (usize, i64)> = state
        .service
        .all_game_presence()
        .await
        .into_iter()
        .map(|p| (p.game_key, (p.online_count, p.last_activity_ms)))
        .collect();
    let total_online = state.service.total_online_count().await;

    let items: Vec<GamePresenceItem> = games
        .into_iter()
        .map(|game| {
            let (online_count, last_activity) =
                presence.get(&game.game_key).copied().unwrap_or((0, 0));
            GamePresenceItem {
                game_slug: game.game_key.into(),
                game_title: game.title,
                online_count,
                last_activity,
            }
        })
        .collect();

    let summary = PresenceSummary {
        active_games: items.iter().filter(|g| g.online_count > 0).count(),
        total_games: items.len(),
    };

    Json(ApiResponse::ok(GlobalPresenceResponse {
        total_online,
        games: items,
        last_updated: Utc::now(),
        summary,
    }))
}

/// GET /api/presence/debug
pub async fn debug_presence<R, G>(
    State(state): State<PresenceAppState<R, G>>,
) -> PresenceResult<Json<ApiResponse<DebugResponse>>>
where
    R: PresenceRepository + Send + Sync + 'static,
    G: GameCatalog + Send + Sync + 'static,
{
    if !state.service.config().debug_endpoints {
        return Err(PresenceError::DebugDisabled);
    }

    Ok(Json(ApiResponse::ok(DebugResponse {
        debug: state.service.debug_snapshot().await,
        timestamp: Utc::now(),
    })))
}

/// GET /api/presence/{game}
pub async fn game_presence<R, G>(
    State(state): State<PresenceAppState<R, G>>,
    Path(game): Path<String>,
) -> PresenceResult<Json<ApiResponse<GamePresenceResponse>>>
where
    R: PresenceRepository + Send + Sync + 'static,
    G: GameCatalog + Send + Sync + 'static,
{
    let game = find_game(state.catalog.as_ref(), &game).await?;
    let online_count = state.service.game_online_count(&game.game_key).await;

    Ok(Json(ApiResponse::ok(GamePresenceResponse {
        game_slug: game.game_key.into(),
        game_title: game.title,
        online_count,
        last_updated: Utc::now(),
    })))
}

// ============================================================================
// Session Required
// ============================================================================

/// POST /api/presence/{game}
pub async fn register_presence<R, G>(
    State(state): State<PresenceAppState<R, G>>,
    identity: AuthenticatedIdentity,
    Path(game): Path<String>,
    body: Result<Json<RegisterPresenceRequest>, JsonRejection>,
) -> PresenceResult<Json<ApiResponse<RegisterPresenceResponse>>>
where
    R: PresenceRepository + Send + Sync + 'static,
    G: GameCatalog + Send + Sync + 'static,
{
    let game = find_game(state.catalog.as_ref(), &game).await?;
    let session_tag = match body {
        Ok(Json(req)) => req.session_tag,
        // No JSON body at all is a plain registration
        Err(JsonRejection::MissingJsonContentType(_)) => None,
        Err(rejection) => return Err(PresenceError::InvalidBody(rejection.body_text())),
    };

    let online_count = state
        .service
        .register_user(identity.wallet(), &game.game_key, session_tag)
        .await;

    Ok(Json(ApiResponse::ok(RegisterPresenceResponse {
        game_slug: game.game_key.into(),
        game_title: game.title,
        registered: true,
        online_count,
        last_updated: Utc::now(),
    })))
}

/// DELETE /api/presence/{game}
pub async fn remove_presence<R, G>(
    State(state): State<PresenceAppState<R, G>>,
    identity: AuthenticatedIdentity,
    Path(game): Path<String>,
) -> PresenceResult<Json<ApiResponse<RemovePresenceResponse>>>
where
    R: PresenceRepository + Send + Sync + 'static,
    G: GameCatalog + Send + Sync + 'static,
{
    let key = parse_key(&game)?;
    let online_count = state.service.unregister_user(identity.wallet(), &key).await;

    Ok(Json(ApiResponse::ok(RemovePresenceResponse {
        game_slug: key.into(),
        removed: true,
        online_count,
        last_updated: Utc::now(),
    })))
}

/// POST /api/presence/{game}/heartbeat
pub async fn heartbeat<R, G>(
    State(state): State<PresenceAppState<R, G>>,
    identity: AuthenticatedIdentity,
    Path(game): Path<String>,
) -> PresenceResult<Json<ApiResponse<HeartbeatResponse>>>
where
    R: PresenceRepository + Send + Sync + 'static,
    G: GameCatalog + Send + Sync + 'static,
{
    let key = parse_key(&game)?;
    let active = state.service.update_heartbeat(identity.wallet(), &key).await;

    Ok(Json(ApiResponse::ok(HeartbeatResponse {
        game_slug: key.into(),
        active,
    })))
}
