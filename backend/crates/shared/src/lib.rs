//! Shared Kernel - Domain-crossing minimal core
//!
//! This crate contains the "smallest core" shared by the auth and presence
//! domains:
//! - Common error types and result aliases
//! - The `{ success, data?, error? }` JSON envelope every endpoint returns
//! - Typed ID wrappers
//!
//! **Design Principle**: Only include things that are "hard to change"
//! and have consistent meaning across all domains.

pub mod error {
    pub mod app_error;
    pub mod conversions;
    pub mod kind;
}
pub mod id;
pub mod response;
