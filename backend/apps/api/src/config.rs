//! Server configuration from the environment (`.env` is loaded first).

use anyhow::{Context, bail};
use auth::AuthConfig;
use platform::crypto::from_base64;
use platform::rate_limit::RateLimitConfig;
use presence::{PresenceConfig, StaticGameCatalog};
use std::env;
use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:31113";
const DEFAULT_FRONTEND_ORIGINS: &str = "http://localhost:40922,http://127.0.0.1:40922";
const DEFAULT_GAME_CATALOG: &str = "snake:Snake";

pub struct ServerConfig {
    pub bind_addr: SocketAddr,
    /// Postgres identity store when set, in-memory otherwise
    pub database_url: Option<String>,
    pub frontend_origins: Vec<String>,
    pub auth: AuthConfig,
    pub presence: PresenceConfig,
    pub catalog: StaticGameCatalog,
}

impl ServerConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let bind_addr = parse_var("BIND_ADDR", DEFAULT_BIND_ADDR.parse::<SocketAddr>()?)?;
        let database_url = var("DATABASE_URL");
        let frontend_origins = var("FRONTEND_ORIGINS")
            .unwrap_or_else(|| DEFAULT_FRONTEND_ORIGINS.to_string())
            .split(',')
            .map(|origin| origin.trim().to_string())
            .filter(|origin| !origin.is_empty())
            .collect();

        let catalog_spec = var("GAME_CATALOG").unwrap_or_else(|| DEFAULT_GAME_CATALOG.to_string());
        let catalog = StaticGameCatalog::parse(&catalog_spec)
            .map_err(|e| anyhow::anyhow!("GAME_CATALOG: {e}"))?;

        Ok(Self {
            bind_addr,
            database_url,
            frontend_origins,
            auth: auth_config()?,
            presence: presence_config()?,
            catalog,
        })
    }
}

fn auth_config() -> anyhow::Result<AuthConfig> {
    let base = match var("AUTH_SESSION_SECRET") {
        Some(secret_b64) => AuthConfig {
            session_secret: decode_secret(&secret_b64)?,
            cookie_secure: !cfg!(debug_assertions),
            ..AuthConfig::default()
        },
        None if cfg!(debug_assertions) => {
            tracing::warn!("AUTH_SESSION_SECRET not set, using a random secret");
            AuthConfig::development()
        }
        None => bail!("AUTH_SESSION_SECRET must be set in production"),
    };

    let defaults = RateLimitConfig::default();
    Ok(AuthConfig {
        domain: var("AUTH_DOMAIN").unwrap_or(base.domain.clone()),
        session_ttl: parse_var("AUTH_SESSION_TTL_SECS", base.session_ttl.as_secs())
            .map(Duration::from_secs)?,
        rate_limit: rate_limit_config(
            parse_var("AUTH_RATE_LIMIT_MAX", defaults.max_requests)?,
            parse_var("AUTH_RATE_LIMIT_WINDOW_SECS", defaults.window.as_secs())?,
        )?,
        ..base
    })
}

fn rate_limit_config(max_requests: u32, window_secs: u64) -> anyhow::Result<RateLimitConfig> {
    if max_requests == 0 {
        bail!("AUTH_RATE_LIMIT_MAX must be at least 1");
    }
    if window_secs == 0 {
        bail!("AUTH_RATE_LIMIT_WINDOW_SECS must be at least 1");
    }
    Ok(RateLimitConfig::new(max_requests, window_secs))
}

fn presence_config() -> anyhow::Result<PresenceConfig> {
    let defaults = PresenceConfig::default();
    Ok(PresenceConfig {
        sweep_interval: Duration::from_secs(parse_var(
            "PRESENCE_SWEEP_INTERVAL_SECS",
            defaults.sweep_interval.as_secs(),
        )?),
        inactivity_threshold: Duration::from_secs(parse_var(
            "PRESENCE_INACTIVITY_SECS",
            defaults.inactivity_threshold.as_secs(),
        )?),
        debug_endpoints: parse_var("PRESENCE_DEBUG", cfg!(debug_assertions))?,
    })
}

fn decode_secret(secret_b64: &str) -> anyhow::Result<[u8; 32]> {
    let bytes = from_base64(secret_b64.trim())
        .context("AUTH_SESSION_SECRET is not valid base64")?;
    let secret: [u8; 32] = bytes
        .try_into()
        .map_err(|b: Vec<u8>| anyhow::anyhow!("AUTH_SESSION_SECRET must be 32 bytes, got {}", b.len()))?;
    Ok(secret)
}

fn var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}

fn parse_var<T>(name: &str, default: T) -> anyhow::Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match var(name) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|e| anyhow::anyhow!("{name}: {e}")),
        None => Ok(default),
    }
}
