//! Presentation Layer
//!
//! HTTP handlers, DTOs and router.

pub mod dto;
pub mod handlers;
pub mod router;

pub use handlers::PresenceAppState;
pub use router::{presence_router, presence_router_generic};
