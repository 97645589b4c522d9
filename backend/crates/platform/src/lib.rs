//! Platform Crate - Technical Infrastructure
//!
//! This crate provides shared technical foundations:
//! - Cryptographic utilities (SHA-256, HMAC, Base64, Base58, Ed25519)
//! - Cookie management
//! - Rate limiting infrastructure (store abstraction + in-memory store)

pub mod cookie;
pub mod crypto;
pub mod rate_limit;
