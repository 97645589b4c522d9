//! Auth Router

use axum::{
    Router, middleware,
    routing::{get, post},
};
use platform::rate_limit::RateLimitStore;

use crate::domain::repository::{ChallengeRepository, IdentityRepository};
use crate::presentation::handlers::{self, AuthAppState};
use crate::presentation::middleware::{require_auth_session, require_wallet_owner};

/// Create the Auth router over any identity, challenge and rate limit stores
pub fn auth_router<I, C, S>(state: AuthAppState<I, C, S>) -> Router
where
    I: IdentityRepository + Send + Sync + 'static,
    C: ChallengeRepository + Send + Sync + 'static,
    S: RateLimitStore + Send + Sync + 'static,
{
    let owner_routes: Router<AuthAppState<I, C, S>> = Router::new()
        .route("/identities/{wallet}", get(handlers::get_identity::<I, C, S>))
        .route_layer(middleware::from_fn(require_wallet_owner))
        .route_layer(middleware::from_fn_with_state(
            state.config.clone(),
            require_auth_session,
        ));

    Router::new()
        .route("/csrf", get(handlers::csrf::<I, C, S>))
        .route("/callback", post(handlers::sign_in::<I, C, S>))
        .route("/session", get(handlers::session_status::<I, C, S>))
        .route("/signout", post(handlers::sign_out::<I, C, S>))
        .route("/error", get(handlers::auth_error))
        .merge(owner_routes)
        .with_state(state)
}
