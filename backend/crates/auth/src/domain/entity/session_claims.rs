//! Session Claims
//!
//! What a signed session cookie says about its holder.

use serde::{Deserialize, Serialize};

use crate::domain::entity::identity::Identity;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionClaims {
    /// Wallet address of the signed-in player
    pub identity_key: String,
    pub display_name: String,
    pub avatar_ref: Option<String>,
}

impl From<&Identity> for SessionClaims {
    fn from(identity: &Identity) -> Self {
        Self {
            identity_key: identity.wallet_address.as_str().to_string(),
            display_name: identity.display_name.clone(),
            avatar_ref: identity.avatar_ref.clone(),
        }
    }
}
