//! Presentation Layer
//!
//! HTTP handlers, DTOs, router, and middleware.

pub mod dto;
pub mod error_code;
pub mod handlers;
pub mod middleware;
pub mod router;

pub use error_code::AuthErrorCode;
pub use handlers::AuthAppState;
pub use middleware::{AuthenticatedIdentity, require_auth_session, require_wallet_owner};
pub use router::auth_router;
