//! PostgreSQL Repository Implementations

use chrono::{DateTime, Utc};
use kernel::id::IdentityId;
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::entity::identity::{Identity, IdentityStats};
use crate::domain::repository::IdentityRepository;
use crate::domain::value_object::wallet_address::WalletAddress;
use crate::error::{AuthError, AuthResult};

const SCHEMA: &str = include_str!("../../migrations/0001_identities.sql");

/// PostgreSQL-backed identity repository
#[derive(Clone)]
pub struct PgIdentityRepository {
    pool: PgPool,
}

impl PgIdentityRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create the identities table if it does not exist
    pub async fn ensure_schema(&self) -> AuthResult<()> {
        sqlx::raw_sql(SCHEMA).execute(&self.pool).await?;
        tracing::info!("Identity schema ready");
        Ok(())
    }
}

impl IdentityRepository for PgIdentityRepository {
    async fn find_by_wallet(&self, wallet: &WalletAddress) -> AuthResult<Option<Identity>> {
        let row = sqlx::query_as::<_, IdentityRow>(
            r#"
            SELECT
                identity_id,
                wallet_address,
                display_name,
                avatar_ref,
                level,
                xp,
                games_played,
                total_score,
                win_rate,
                avg_game_time,
                created_at,
                updated_at
            FROM identities
            WHERE wallet_address = $1
            "#,
        )
        .bind(wallet.as_str())
        .fetch_optional(&self.pool)
        .await?;

        row.map(|r| r.into_identity()).transpose()
    }

    async fn create(&self, identity: &Identity) -> AuthResult<Identity> {
        sqlx::query(
            r#"
            INSERT INTO identities (
                identity_id,
                wallet_address,
                display_name,
                avatar_ref,
                level,
                xp,
                games_played,
                total_score,
                win_rate,
                avg_game_time,
                created_at,
                updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            ON CONFLICT (wallet_address) DO NOTHING
            "#,
        )
        .bind(identity.identity_id.as_uuid())
        .bind(identity.wallet_address.as_str())
        .bind(&identity.display_name)
        .bind(identity.avatar_ref.as_deref())
        .bind(identity.level)
        .bind(identity.xp)
        .bind(identity.stats.games_played)
        .bind(identity.stats.total_score)
        .bind(identity.stats.win_rate)
        .bind(identity.stats.avg_game_time)
        .bind(identity.created_at)
        .bind(identity.updated_at)
        .execute(&self.pool)
        .await?;

        // Either our row or the one a concurrent sign-in inserted first
        self.find_by_wallet(&identity.wallet_address)
            .await?
            .ok_or_else(|| AuthError::Internal("Identity missing after insert".to_string()))
    }
}

// ============================================================================
// Row Types
// ============================================================================

#[derive(sqlx::FromRow)]
struct IdentityRow {
    identity_id: Uuid,
    wallet_address: String,
    display_name: String,
    avatar_ref: Option<String>,
    level: i32,
    xp: i64,
    games_played: i64,
    total_score: i64,
    win_rate: f64,
    avg_game_time: f64,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl IdentityRow {
    fn into_identity(self) -> AuthResult<Identity> {
        let wallet_address = WalletAddress::parse(self.wallet_address)
            .map_err(|e| AuthError::Internal(format!("Invalid wallet_address: {e}")))?;

        Ok(Identity {
            identity_id: IdentityId::from_uuid(self.identity_id),
            wallet_address,
            display_name: self.display_name,
            avatar_ref: self.avatar_ref,
            level: self.level,
            xp: self.xp,
            stats: IdentityStats {
                games_played: self.games_played,
                total_score: self.total_score,
                win_rate: self.win_rate,
                avg_game_time: self.avg_game_time,
            },
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}
