//! Identity Entity
//!
//! A player as known to the platform, keyed by wallet address.

use chrono::{DateTime, Utc};
use kernel::id::IdentityId;
use serde::Serialize;

use crate::domain::value_object::wallet_address::WalletAddress;

/// Level assigned to new identities
pub const STARTING_LEVEL: i32 = 1;

/// Aggregate play statistics
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IdentityStats {
    pub games_played: i64,
    pub total_score: i64,
    pub win_rate: f64,
    pub avg_game_time: f64,
}

/// Identity entity
#[derive(Debug, Clone)]
pub struct Identity {
    /// Internal UUID identifier
    pub identity_id: IdentityId,
    /// Wallet public key (unique)
    pub wallet_address: WalletAddress,
    pub display_name: String,
    pub avatar_ref: Option<String>,
    pub level: i32,
    pub xp: i64,
    pub stats: IdentityStats,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Identity {
    /// Create a new identity with starting profile values
    pub fn new(wallet_address: WalletAddress, display_name: String) -> Self {
        let now = Utc::now();

        Self {
            identity_id: IdentityId::new(),
            wallet_address,
            display_name,
            avatar_ref: None,
            level: STARTING_LEVEL,
            xp: 0,
            stats: IdentityStats::default(),
            created_at: now,
            updated_at: now,
        }
    }

    /// New identity named after its wallet prefix
    pub fn with_default_profile(wallet_address: WalletAddress) -> Self {
        let display_name = wallet_address.default_display_name();
        Self::new(wallet_address, display_name)
    }
}
