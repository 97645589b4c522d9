//! Presence Router

use auth::AuthConfig;
use auth::middleware::require_auth_session;
use axum::{
    Router, middleware,
    routing::{get, post},
};
use std::sync::Arc;

use crate::application::service::PresenceService;
use crate::domain::repository::{GameCatalog, PresenceRepository};
use crate::infra::catalog::StaticGameCatalog;
use crate::infra::memory::MemoryPresenceRepository;
use crate::presentation::handlers::{self, PresenceAppState};

/// Create the Presence router over the in-memory store
pub fn presence_router(
    service: Arc<PresenceService<MemoryPresenceRepository>>,
    catalog: StaticGameCatalog,
    auth_config: Arc<AuthConfig>,
) -> Router {
    presence_router_generic(
        PresenceAppState {
            service,
            catalog: Arc::new(catalog),
        },
        auth_config,
    )
}

/// Create a generic Presence router for any store and catalog.
///
/// Register, heartbeat and remove sit behind the session guard; reads are
/// public.
pub fn presence_router_generic<R, G>(
    state: PresenceAppState<R, G>,
    auth_config: Arc<AuthConfig>,
) -> Router
where
    R: PresenceRepository + Send + Sync + 'static,
    G: GameCatalog + Send + Sync + 'static,
{
    let session = middleware::from_fn_with_state(auth_config, require_auth_session);

    Router::new()
        .route("/", get(handlers::global_presence::<R, G>))
        .route("/debug", get(handlers::debug_presence::<R, G>))
        .route(
            "/{game}",
            get(handlers::game_presence::<R, G>).merge(
                post(handlers::register_presence::<R, G>)
                    .delete(handlers::remove_presence::<R, G>)
                    .route_layer(session.clone()),
            ),
        )
        .route(
            "/{game}/heartbeat",
            post(handlers::heartbeat::<R, G>).route_layer(session),
        )
        .with_state(state)
}
