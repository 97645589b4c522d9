//! Application Configuration
//!
//! Timing and exposure settings for the presence service.

use std::time::Duration;

#[derive(Debug, Clone)]
pub struct PresenceConfig {
    /// How often the eviction sweep runs
    pub sweep_interval: Duration,
    /// Silence after which an entry is evicted
    pub inactivity_threshold: Duration,
    /// Serve `/debug`; off in production
    pub debug_endpoints: bool,
}

impl Default for PresenceConfig {
    fn default() -> Self {
        Self {
            sweep_interval: Duration::from_secs(120),
            inactivity_threshold: Duration::from_secs(120),
            debug_endpoints: false,
        }
    }
}

impl PresenceConfig {
    /// Create config for development (debug endpoint on)
    pub fn development() -> Self {
        Self {
            debug_endpoints: true,
            ..Default::default()
        }
    }

    pub fn inactivity_threshold_ms(&self) -> i64 {
        i64::try_from(self.inactivity_threshold.as_millis()).unwrap_or(i64::MAX)
    }

    pub fn sweep_interval_ms(&self) -> i64 {
        i64::try_from(self.sweep_interval.as_millis()).unwrap_or(i64::MAX)
    }
}
