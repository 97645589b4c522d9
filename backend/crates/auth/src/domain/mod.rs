//! Domain Layer
//!
//! Contains entities, value objects, and repository traits.

pub mod entity;
pub mod repository;
pub mod value_object;

// Re-exports
pub use entity::{Challenge, Identity, SessionClaims, SignInMessage};
pub use repository::{ChallengeRepository, IdentityRepository};
pub use value_object::WalletAddress;
