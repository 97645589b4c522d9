//! Application Layer
//!
//! Presence service, eviction lifecycle and configuration.

pub mod config;
pub mod service;

pub use config::PresenceConfig;
pub use service::{EvictionHandle, PresenceService};
