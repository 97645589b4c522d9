//! Domain Value Objects
//!
//! ゲームキーはカタログ上のゲームを指す slug。
//! URL パスからそのまま受け取るため、ここで形を固定する。
//!
//! ## 不変条件
//! - 1〜64 文字
//! - 英小文字・数字・`-`・`_` のみ

use serde::{Deserialize, Serialize};
use std::fmt;

/// Upper bound on slug length
pub const GAME_KEY_MAX_LEN: usize = 64;

/// Error returned when a game key cannot be accepted
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GameKeyError {
    Empty,
    TooLong { length: usize },
    InvalidCharacter(char),
}

impl fmt::Display for GameKeyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "Game key is required"),
            Self::TooLong { length } => {
                write!(f, "Game key too long ({length} > {GAME_KEY_MAX_LEN})")
            }
            Self::InvalidCharacter(c) => write!(f, "Invalid character in game key: {c:?}"),
        }
    }
}

impl std::error::Error for GameKeyError {}

/// Game slug, e.g. `snake`
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct GameKey(String);

impl GameKey {
    pub fn parse(value: impl Into<String>) -> Result<Self, GameKeyError> {
        let value = value.into();

        if value.is_empty() {
            return Err(GameKeyError::Empty);
        }
        if value.len() > GAME_KEY_MAX_LEN {
            return Err(GameKeyError::TooLong {
                length: value.len(),
            });
        }
        if let Some(c) = value
            .chars()
            .find(|c| !(c.is_ascii_lowercase() || c.is_ascii_digit() || *c == '-' || *c == '_'))
        {
            return Err(GameKeyError::InvalidCharacter(c));
        }

        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for GameKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for GameKey {
    type Error = GameKeyError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl From<GameKey> for String {
    fn from(key: GameKey) -> Self {
        key.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_slugs() {
        for slug in ["snake", "slither-io", "game_2", "a"] {
            assert_eq!(GameKey::parse(slug).unwrap().as_str(), slug);
        }
    }

    #[test]
    fn test_rejects_bad_slugs() {
        assert_eq!(GameKey::parse(""), Err(GameKeyError::Empty));
        assert_eq!(
            GameKey::parse("Snake"),
            Err(GameKeyError::InvalidCharacter('S'))
        );
        assert_eq!(
            GameKey::parse("snake/../x"),
            Err(GameKeyError::InvalidCharacter('/'))
        );
        assert_eq!(
            GameKey::parse("x".repeat(65)),
            Err(GameKeyError::TooLong { length: 65 })
        );
    }

    #[test]
    fn test_serde_validates() {
        let key: GameKey = serde_json::from_str("\"snake\"").unwrap();
        assert_eq!(key.as_str(), "snake");
        assert!(serde_json::from_str::<GameKey>("\"NOPE\"").is_err());
    }
}
