//! Presence Backend Module
//!
//! Clean Architecture structure:
//! - `domain/` - Presence index, entities, repository and catalog traits
//! - `application/` - Presence service and eviction task
//! - `infra/` - In-memory store and static game catalog
//! - `presentation/` - HTTP handlers, DTOs, router
//!
//! ## Model
//! - An identity is a member of at most one game at a time; registering into
//!   another game leaves the previous one
//! - A game aggregate exists only while it has members
//! - Entries without a heartbeat for longer than the inactivity threshold are
//!   evicted by a background sweep

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;


// Re-exports for convenience
pub use application::config::PresenceConfig;
pub use application::service::{EvictionHandle, PresenceService};
pub use error::{PresenceError, PresenceResult};
pub use infra::catalog::StaticGameCatalog;
pub use infra::memory::MemoryPresenceRepository;
pub use presentation::router::{presence_router, presence_router_generic};

pub mod models {
    pub use crate::domain::entities::*;
    pub use crate::domain::value_objects::*;
    pub use crate::presentation::dto::*;
}
