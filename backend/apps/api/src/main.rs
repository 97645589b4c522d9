//! API Server Entry Point
//!
//! Application entry point and server initialization.
//! Uses `anyhow` for startup errors, but application-level
//! errors should use `kernel::error::AppError`.

mod config;

use auth::domain::repository::ChallengeRepository;
use auth::presentation::AuthAppState;
use auth::{MemoryChallengeRepository, MemoryIdentityRepository, PgIdentityRepository};
use axum::{
    Router, http,
    http::{Method, header},
};
use chrono::Utc;
use platform::rate_limit::{MemoryRateLimitStore, RateLimitStore};
use presence::{MemoryPresenceRepository, PresenceService, presence_router};
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::signal;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tower_http::cors::{AllowHeaders, AllowMethods, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::ServerConfig;

// Re-export unified error types for use in handlers
pub use kernel::error::{
    app_error::{AppError, AppResult},
    kind::ErrorKind,
};

/// How often expired challenges and rate limit windows are dropped
const PURGE_INTERVAL: Duration = Duration::from_secs(60);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "api=info,auth=info,presence=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = ServerConfig::from_env()?;
    let auth_config = Arc::new(config.auth);

    // Auth: challenges and attempt counters stay in process, identities
    // go to Postgres when configured
    let challenges = Arc::new(MemoryChallengeRepository::new());
    let rate_limits = Arc::new(MemoryRateLimitStore::new());

    let auth_routes = match config.database_url.as_deref() {
        Some(database_url) => {
            let pool = PgPoolOptions::new()
                .max_connections(5)
                .connect(database_url)
                .await?;
            tracing::info!("Connected to database");

            let identities = PgIdentityRepository::new(pool);
            identities.ensure_schema().await?;
            tracing::info!("Identity schema ready");

            auth::auth_router(AuthAppState {
                identities: Arc::new(identities),
                challenges: challenges.clone(),
                rate_limits: rate_limits.clone(),
                config: auth_config.clone(),
            })
        }
        None => {
            tracing::warn!("DATABASE_URL not set, identities are kept in memory");
            auth::auth_router(AuthAppState {
                identities: Arc::new(MemoryIdentityRepository::new()),
                challenges: challenges.clone(),
                rate_limits: rate_limits.clone(),
                config: auth_config.clone(),
            })
        }
    };

    // Presence
    let presence_service = Arc::new(PresenceService::new(
        Arc::new(MemoryPresenceRepository::new()),
        config.presence,
    ));
    let eviction = presence_service.spawn_eviction();
    tracing::info!(games = config.catalog.len(), "Game catalog loaded");

    let (purge_stop, purge_task) = spawn_purge(challenges, rate_limits);

    // CORS configuration
    let allowed_origins: Vec<http::HeaderValue> = config
        .frontend_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    let cors = CorsLayer::new()
        .allow_origin(allowed_origins)
        .allow_methods(AllowMethods::list([
            Method::GET,
            Method::POST,
            Method::DELETE,
            Method::OPTIONS,
        ]))
        .allow_headers(AllowHeaders::list([
            header::CONTENT_TYPE,
            header::ACCEPT,
        ]))
        .allow_credentials(true);

    // Build router
    let app = Router::new()
        .nest("/api/auth", auth_routes)
        .nest(
            "/api/presence",
            presence_router(presence_service, config.catalog, auth_config),
        )
        .layer(TraceLayer::new_for_http())
        .layer(cors);

    // Start server
    tracing::info!("Listening on {}", config.bind_addr);

    let listener = TcpListener::bind(config.bind_addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    // Stop background work
    let _ = purge_stop.send(true);
    if let Err(e) = purge_task.await {
        tracing::error!(error = %e, "Purge task failed");
    }
    eviction.shutdown().await;

    tracing::info!("Server stopped");
    Ok(())
}

/// Periodically drop expired challenges and elapsed rate limit windows
fn spawn_purge(
    challenges: Arc<MemoryChallengeRepository>,
    rate_limits: Arc<MemoryRateLimitStore>,
) -> (watch::Sender<bool>, JoinHandle<()>) {
    let (stop_tx, mut stop_rx) = watch::channel(false);

    let task = tokio::spawn(async move {
        let mut ticker = tokio::time::interval(PURGE_INTERVAL);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = stop_rx.changed() => break,
                _ = ticker.tick() => {
                    let now_ms = Utc::now().timestamp_millis();
                    if let Err(e) = challenges.purge_expired(now_ms).await {
                        tracing::warn!(error = %e, "Challenge purge failed");
                    }
                    if let Err(e) = rate_limits.purge_expired().await {
                        tracing::warn!(error = %e, "Rate limit purge failed");
                    }
                }
            }
        }
    });

    (stop_tx, task)
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
