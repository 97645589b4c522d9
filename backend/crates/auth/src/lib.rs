//! Auth (Authentication) Backend Module
//!
//! Clean Architecture structure:
//! - `domain/` - Sign-in message, identities, challenges, repository traits
//! - `application/` - Use cases and application services
//! - `infra/` - In-memory and PostgreSQL implementations
//! - `presentation/` - HTTP handlers, DTOs, guards, router
//!
//! ## Features
//! - Wallet sign-in: the client signs a canonical challenge text with its
//!   Ed25519 key, the server verifies it against a single-use nonce
//! - Per-wallet attempt limiting over a fixed window
//! - Identity records created on first sign-in
//! - Stateless HMAC-signed session cookies
//!
//! ## Security Model
//! - Every rejected sign-in answers with the same 401 body; the reason is
//!   only logged
//! - Challenges are bound to the browser through an HTTP-only cookie and
//!   consumed on first use
//! - Session and ownership checks are composable route layers

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;

#[cfg(test)]
mod tests;

// Re-exports for convenience
pub use application::config::AuthConfig;
pub use error::{AuthError, AuthResult, RejectReason};
pub use infra::memory::{MemoryChallengeRepository, MemoryIdentityRepository};
pub use infra::postgres::PgIdentityRepository;
pub use presentation::router::auth_router;

// Re-export kernel error types for unified error handling
pub use kernel::error::{
    app_error::{AppError, AppResult},
    kind::ErrorKind,
};

pub mod models {
    pub use crate::domain::entity::*;
    pub use crate::domain::value_object::*;
    pub use crate::presentation::dto::*;
}

pub mod middleware {
    pub use crate::presentation::middleware::*;
}
