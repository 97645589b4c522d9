//! Wallet Address Value Object
//!
//! ウォレットアドレスはプレイヤーを識別する唯一のキー。
//! レート制限・プレゼンス・セッションすべてこの文字列で紐付ける。
//!
//! ## 不変条件
//! - base58 (Bitcoin alphabet) でデコード可能
//! - デコード後ちょうど 32 バイト (Ed25519 公開鍵)
//! - 元の文字列をそのまま保持する（再エンコードしない）

use platform::crypto::{ED25519_PUBLIC_KEY_LEN, from_base58};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Number of leading characters used for generated display names
pub const DISPLAY_NAME_PREFIX_LEN: usize = 8;

// ============================================================================
// Error Types
// ============================================================================

/// Error returned when a wallet address cannot be accepted
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WalletAddressError {
    Empty,
    InvalidEncoding,
    InvalidLength { length: usize },
}

impl fmt::Display for WalletAddressError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "Public key is required"),
            Self::InvalidEncoding => write!(f, "Invalid public key encoding"),
            Self::InvalidLength { length } => write!(
                f,
                "Invalid public key format ({length} bytes, expected {ED25519_PUBLIC_KEY_LEN})"
            ),
        }
    }
}

impl std::error::Error for WalletAddressError {}

// ============================================================================
// WalletAddress Value Object
// ============================================================================

/// Base58 Ed25519 public key identifying a player
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct WalletAddress(String);

impl WalletAddress {
    pub fn parse(input: impl Into<String>) -> Result<Self, WalletAddressError> {
        let input = input.into();
        Self::decode(&input)?;
        Ok(Self(input))
    }

    /// Decode a base58 key and check its length
    pub fn decode(input: &str) -> Result<[u8; ED25519_PUBLIC_KEY_LEN], WalletAddressError> {
        if input.is_empty() {
            return Err(WalletAddressError::Empty);
        }

        let bytes = from_base58(input).map_err(|_| WalletAddressError::InvalidEncoding)?;
        let length = bytes.len();
        bytes
            .try_into()
            .map_err(|_| WalletAddressError::InvalidLength { length })
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[inline]
    pub fn into_inner(self) -> String {
        self.0
    }

    /// Default display name for a freshly created identity
    pub fn default_display_name(&self) -> String {
        let prefix: String = self.0.chars().take(DISPLAY_NAME_PREFIX_LEN).collect();
        format!("Player_{prefix}")
    }
}

impl fmt::Debug for WalletAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("WalletAddress").field(&self.0).finish()
    }
}

impl fmt::Display for WalletAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for WalletAddress {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for WalletAddress {
    type Error = WalletAddressError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl From<WalletAddress> for String {
    fn from(address: WalletAddress) -> Self {
        address.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use platform::crypto::to_base58;

    fn key_string(byte: u8) -> String {
        to_base58(&[byte; 32])
    }

    #[test]
    fn test_parse_valid_key() {
        let raw = key_string(9);
        let address = WalletAddress::parse(raw.clone()).unwrap();
        assert_eq!(address.as_str(), raw);
    }

    #[test]
    fn test_rejects_empty() {
        assert_eq!(WalletAddress::parse(""), Err(WalletAddressError::Empty));
    }

    #[test]
    fn test_rejects_bad_alphabet() {
        assert_eq!(
            WalletAddress::parse("not-base58-0OIl"),
            Err(WalletAddressError::InvalidEncoding)
        );
    }

    #[test]
    fn test_rejects_wrong_length() {
        let short = to_base58(&[1u8; 31]);
        assert_eq!(
            WalletAddress::parse(short),
            Err(WalletAddressError::InvalidLength { length: 31 })
        );
    }

    #[test]
    fn test_default_display_name_uses_prefix() {
        let address = WalletAddress::parse(key_string(200)).unwrap();
        let name = address.default_display_name();
        assert!(name.starts_with("Player_"));
        assert_eq!(name.len(), "Player_".len() + DISPLAY_NAME_PREFIX_LEN);
        assert_eq!(&name[7..], &address.as_str()[..8]);
    }

    #[test]
    fn test_serde_rejects_invalid() {
        let result: Result<WalletAddress, _> = serde_json::from_str("\"abc\"");
        assert!(result.is_err());
    }
}
