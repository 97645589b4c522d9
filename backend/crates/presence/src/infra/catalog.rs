//! Static Game Catalog
//!
//! Fixed list of active games, usually parsed from configuration as
//! `key:Title,key:Title`.

use crate::domain::entities::GameCatalogEntry;
use crate::domain::repository::GameCatalog;
use crate::domain::value_objects::{GameKey, GameKeyError};

#[derive(Debug, Clone, Default)]
pub struct StaticGameCatalog {
    games: Vec<GameCatalogEntry>,
}

impl StaticGameCatalog {
    pub fn new(games: Vec<GameCatalogEntry>) -> Self {
        Self { games }
    }

    /// Parse `key:Title,key:Title`. A missing title falls back to the key.
    /// Blank items are skipped; a repeated key keeps its first title.
    pub fn parse(spec: &str) -> Result<Self, GameKeyError> {
        let mut games: Vec<GameCatalogEntry> = Vec::new();

        for item in spec.split(',').map(str::trim).filter(|s| !s.is_empty()) {
            let (key, title) = match item.split_once(':') {
                Some((key, title)) => (key.trim(), title.trim()),
                None => (item, ""),
            };
            let game_key = GameKey::parse(key)?;
            if games.iter().any(|g| g.game_key == game_key) {
                continue;
            }
            let title = if title.is_empty() { key } else { title };
            games.push(GameCatalogEntry::new(game_key, title));
        }

        Ok(Self { games })
    }

    pub fn len(&self) -> usize {
        self.games.len()
    }

    pub fn is_empty(&self) -> bool {
        self.games.is_empty()
    }
}

impl GameCatalog for StaticGameCatalog {
    async fn list_active(&self) -> Vec<GameCatalogEntry> {
        self.games.clone()
    }

    async fn find(&self, game: &GameKey) -> Option<GameCatalogEntry> {
        self.games.iter().find(|g| g.game_key == *game).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_catalog() {
        let catalog = StaticGameCatalog::parse("snake:Snake Arena, tetris , ,snake:Dup").unwrap();
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.games[0].title, "Snake Arena");
        assert_eq!(catalog.games[1].game_key.as_str(), "tetris");
        assert_eq!(catalog.games[1].title, "tetris");
    }

    #[test]
    fn test_parse_rejects_bad_key() {
        assert!(StaticGameCatalog::parse("Snake:Snake").is_err());
    }

    #[tokio::test]
    async fn test_find() {
        let catalog = StaticGameCatalog::parse("snake:Snake").unwrap();
        let snake = GameKey::parse("snake").unwrap();
        let other = GameKey::parse("pong").unwrap();

        assert_eq!(catalog.find(&snake).await.unwrap().title, "Snake");
        assert!(catalog.find(&other).await.is_none());
    }
}
