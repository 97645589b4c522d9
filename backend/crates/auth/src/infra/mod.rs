//! Infrastructure Layer
//!
//! Database implementations and in-process stores.

pub mod memory;
pub mod postgres;

pub use memory::{MemoryChallengeRepository, MemoryIdentityRepository};
pub use postgres::PgIdentityRepository;
