//! Domain Layer - Presence model
//!
//! This layer contains:
//! - Domain entities (PresenceEntry, GamePresence, snapshots)
//! - Domain value objects (GameKey)
//! - The presence index all stores share
//! - Repository traits (interfaces)

pub mod entities;
pub mod index;
pub mod repository;
pub mod value_objects;

pub use entities::{
    DebugSnapshot, GameCatalogEntry, GameDebugInfo, GamePresence, GamePresenceSnapshot,
    PresenceEntry,
};
pub use index::PresenceIndex;
pub use repository::{GameCatalog, PresenceRepository};
pub use value_objects::{GameKey, GameKeyError};
