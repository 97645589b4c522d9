//! Sign-In Message
//!
//! The challenge text a wallet signs. `prepare()` is the wire format: the
//! client signs exactly these bytes, so the layout must never drift.

use platform::crypto::{ED25519_SIGNATURE_LEN, from_base58, verify_ed25519};
use serde::{Deserialize, Serialize};

use crate::domain::value_object::wallet_address::{WalletAddress, WalletAddressError};

/// Outcome of structural validation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationReport {
    pub valid: bool,
    pub errors: Vec<String>,
}

/// Sign-in challenge fields as submitted by the client
///
/// Unknown JSON fields are rejected at parse time. Missing string fields
/// deserialize as empty and are reported by [`SignInMessage::validate`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct SignInMessage {
    #[serde(default)]
    domain: String,
    #[serde(default)]
    public_key: String,
    #[serde(default)]
    nonce: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    statement: Option<String>,
}

impl SignInMessage {
    pub fn new(
        domain: impl Into<String>,
        public_key: impl Into<String>,
        nonce: impl Into<String>,
        statement: Option<String>,
    ) -> Self {
        Self {
            domain: domain.into(),
            public_key: public_key.into(),
            nonce: nonce.into(),
            statement,
        }
    }

    /// Parse the JSON envelope carried in the `message` credential
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn domain(&self) -> &str {
        &self.domain
    }

    pub fn public_key(&self) -> &str {
        &self.public_key
    }

    pub fn nonce(&self) -> &str {
        &self.nonce
    }

    pub fn statement(&self) -> Option<&str> {
        self.statement.as_deref()
    }

    /// Canonical text signed by the wallet
    pub fn prepare(&self) -> String {
        let mut text = format!(
            "{} wants you to sign in with your Solana account:\n{}",
            self.domain, self.public_key
        );

        if let Some(statement) = self.statement.as_deref().filter(|s| !s.is_empty()) {
            text.push_str("\n\n");
            text.push_str(statement);
        }

        text.push_str("\n\nNonce: ");
        text.push_str(&self.nonce);
        text
    }

    /// Check required fields and the public key shape.
    pub fn validate(&self) -> ValidationReport {
        let mut errors = Vec::new();

        if self.domain.is_empty() {
            errors.push("Domain is required".to_string());
        }
        if self.public_key.is_empty() {
            errors.push("Public key is required".to_string());
        }
        if self.nonce.is_empty() {
            errors.push("Nonce is required".to_string());
        }

        match WalletAddress::decode(&self.public_key) {
            Ok(_) | Err(WalletAddressError::Empty) => {}
            Err(WalletAddressError::InvalidEncoding) => {
                errors.push("Invalid public key encoding".to_string());
            }
            Err(WalletAddressError::InvalidLength { .. }) => {
                errors.push("Invalid public key format".to_string());
            }
        }

        ValidationReport {
            valid: errors.is_empty(),
            errors,
        }
    }

    /// Verify a base58 detached signature over [`prepare`](Self::prepare).
    ///
    /// Any decode failure counts as an invalid signature.
    pub fn verify(&self, signature_b58: &str) -> bool {
        let Ok(public_key) = WalletAddress::decode(&self.public_key) else {
            return false;
        };

        let signature = match from_base58(signature_b58) {
            Ok(bytes) if bytes.len() == ED25519_SIGNATURE_LEN => bytes,
            _ => return false,
        };

        verify_ed25519(&public_key, self.prepare().as_bytes(), &signature)
    }
}
