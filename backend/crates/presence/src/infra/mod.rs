//! Infrastructure Layer
//!
//! In-memory presence store and static game catalog.

pub mod catalog;
pub mod memory;

pub use catalog::StaticGameCatalog;
pub use memory::MemoryPresenceRepository;
