//! Rate Limiting Infrastructure
//!
//! Fixed-window attempt counting keyed by an arbitrary identity string.
//! The window arithmetic lives in [`RateLimitRecord`] so every backend
//! applies the same rules; [`RateLimitStore`] is the seam a shared cache
//! would implement, and [`MemoryRateLimitStore`] is the in-process one.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use chrono::Utc;
use thiserror::Error;

/// Rate limit configuration
#[derive(Debug, Clone)]
pub struct RateLimitConfig {
    /// Maximum attempts allowed in the window
    pub max_requests: u32,
    /// Time window duration
    pub window: Duration,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            max_requests: 5,
            window: Duration::from_secs(15 * 60),
        }
    }
}

impl RateLimitConfig {
    pub fn new(max_requests: u32, window_secs: u64) -> Self {
        Self {
            max_requests,
            window: Duration::from_secs(window_secs),
        }
    }

    /// Window length in milliseconds, saturating at `i64::MAX`
    pub fn window_ms(&self) -> i64 {
        i64::try_from(self.window.as_millis()).unwrap_or(i64::MAX)
    }
}

/// Rate limit check result
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RateLimitResult {
    pub allowed: bool,
    pub remaining: u32,
    pub reset_at_ms: i64,
}

/// Per-key counter state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitRecord {
    pub count: u32,
    pub reset_at_ms: i64,
}

impl RateLimitRecord {
    /// Whether the window this record belongs to has elapsed.
    pub fn is_expired(&self, now_ms: i64) -> bool {
        now_ms > self.reset_at_ms
    }

    /// Apply one attempt at `now_ms` to the (possibly absent) current record.
    ///
    /// Returns the record to store and the verdict. A denied attempt leaves
    /// the record unchanged, so `count` never exceeds `max_requests`.
    pub fn apply(
        current: Option<RateLimitRecord>,
        config: &RateLimitConfig,
        now_ms: i64,
    ) -> (RateLimitRecord, RateLimitResult) {
        match current {
            Some(record) if !record.is_expired(now_ms) => {
                if record.count >= config.max_requests {
                    return (
                        record,
                        RateLimitResult {
                            allowed: false,
                            remaining: 0,
                            reset_at_ms: record.reset_at_ms,
                        },
                    );
                }

                let record = RateLimitRecord {
                    count: record.count + 1,
                    ..record
                };
                (
                    record,
                    RateLimitResult {
                        allowed: true,
                        remaining: config.max_requests - record.count,
                        reset_at_ms: record.reset_at_ms,
                    },
                )
            }
            _ => {
                let record = RateLimitRecord {
                    count: 1,
                    reset_at_ms: now_ms.saturating_add(config.window_ms()),
                };
                (
                    record,
                    RateLimitResult {
                        allowed: true,
                        remaining: config.max_requests.saturating_sub(1),
                        reset_at_ms: record.reset_at_ms,
                    },
                )
            }
        }
    }
}

/// Rate limit backend failure
#[derive(Debug, Error)]
pub enum RateLimitStoreError {
    #[error("Rate limit store unavailable: {0}")]
    Unavailable(String),
}

/// Trait for rate limit storage backends
///
/// `check_and_increment` must be atomic per key: two concurrent attempts for
/// the same key can never both observe the same count.
#[trait_variant::make(RateLimitStore: Send)]
pub trait LocalRateLimitStore {
    /// Count one attempt for `key` and report whether it is allowed
    async fn check_and_increment(
        &self,
        key: &str,
        config: &RateLimitConfig,
    ) -> Result<RateLimitResult, RateLimitStoreError>;

    /// Forget every attempt recorded for `key`
    async fn reset(&self, key: &str) -> Result<(), RateLimitStoreError>;

    /// Drop records whose window has elapsed, returning how many were removed
    async fn purge_expired(&self) -> Result<usize, RateLimitStoreError>;
}

/// In-process rate limit store
#[derive(Debug, Default)]
pub struct MemoryRateLimitStore {
    records: Mutex<HashMap<String, RateLimitRecord>>,
}

impl MemoryRateLimitStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one attempt at an explicit timestamp.
    pub fn check_and_increment_at(
        &self,
        key: &str,
        config: &RateLimitConfig,
        now_ms: i64,
    ) -> RateLimitResult {
        let mut records = self.records.lock().unwrap_or_else(|e| e.into_inner());
        let (record, result) = RateLimitRecord::apply(records.get(key).copied(), config, now_ms);
        records.insert(key.to_string(), record);
        result
    }

    pub fn remove(&self, key: &str) {
        self.records
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .remove(key);
    }

    pub fn purge_expired_at(&self, now_ms: i64) -> usize {
        let mut records = self.records.lock().unwrap_or_else(|e| e.into_inner());
        let before = records.len();
        records.retain(|_, record| !record.is_expired(now_ms));
        before - records.len()
    }

    pub fn record(&self, key: &str) -> Option<RateLimitRecord> {
        self.records
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .get(key)
            .copied()
    }

    /// Number of keys currently tracked
    pub fn tracked_keys(&self) -> usize {
        self.records.lock().unwrap_or_else(|e| e.into_inner()).len()
    }
}

impl RateLimitStore for MemoryRateLimitStore {
    async fn check_and_increment(
        &self,
        key: &str,
        config: &RateLimitConfig,
    ) -> Result<RateLimitResult, RateLimitStoreError> {
        Ok(self.check_and_increment_at(key, config, Utc::now().timestamp_millis()))
    }

    async fn reset(&self, key: &str) -> Result<(), RateLimitStoreError> {
        self.remove(key);
        Ok(())
    }

    async fn purge_expired(&self) -> Result<usize, RateLimitStoreError> {
        let purged = self.purge_expired_at(Utc::now().timestamp_millis());
        if purged > 0 {
            tracing::debug!(purged, "Purged expired rate limit records");
        }
        Ok(purged)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WINDOW_MS: i64 = 15 * 60 * 1000;

    #[test]
    fn test_sixth_attempt_in_window_is_denied() {
        let store = MemoryRateLimitStore::new();
        let config = RateLimitConfig::default();
        let t0 = 1_000_000;

        for expected_remaining in (0..5).rev() {
            let result = store.check_and_increment_at("wallet", &config, t0);
            assert!(result.allowed);
            assert_eq!(result.remaining, expected_remaining);
            assert_eq!(result.reset_at_ms, t0 + WINDOW_MS);
        }

        let sixth = store.check_and_increment_at("wallet", &config, t0 + 1);
        assert!(!sixth.allowed);
        assert_eq!(sixth.remaining, 0);
        assert_eq!(store.record("wallet").unwrap().count, 5);
    }

    #[test]
    fn test_window_expiry_restarts_count() {
        let store = MemoryRateLimitStore::new();
        let config = RateLimitConfig::default();
        let t0 = 1_000_000;

        for _ in 0..6 {
            store.check_and_increment_at("wallet", &config, t0);
        }

        // Still inside the window at exactly reset_at_ms
        assert!(!store.check_and_increment_at("wallet", &config, t0 + WINDOW_MS).allowed);

        let after = store.check_and_increment_at("wallet", &config, t0 + WINDOW_MS + 1);
        assert!(after.allowed);
        assert_eq!(after.remaining, 4);
        assert_eq!(store.record("wallet").unwrap().count, 1);
    }

    #[test]
    fn test_keys_are_independent() {
        let store = MemoryRateLimitStore::new();
        let config = RateLimitConfig::new(1, 60);

        assert!(store.check_and_increment_at("a", &config, 0).allowed);
        assert!(!store.check_and_increment_at("a", &config, 0).allowed);
        assert!(store.check_and_increment_at("b", &config, 0).allowed);
    }

    #[test]
    fn test_remove_behaves_like_first_attempt() {
        let store = MemoryRateLimitStore::new();
        let config = RateLimitConfig::default();

        for _ in 0..3 {
            store.check_and_increment_at("wallet", &config, 0);
        }
        store.remove("wallet");

        let result = store.check_and_increment_at("wallet", &config, 10);
        assert_eq!(result.remaining, 4);
        assert_eq!(store.record("wallet").unwrap().count, 1);
    }

    #[test]
    fn test_purge_expired() {
        let store = MemoryRateLimitStore::new();
        let config = RateLimitConfig::new(5, 60);

        store.check_and_increment_at("old", &config, 0);
        store.check_and_increment_at("new", &config, 50_000);

        assert_eq!(store.purge_expired_at(60_001), 1);
        assert_eq!(store.tracked_keys(), 1);
        assert!(store.record("new").is_some());
    }

    #[test]
    fn test_huge_window_saturates_instead_of_wrapping() {
        let store = MemoryRateLimitStore::new();
        let config = RateLimitConfig::new(1, u64::MAX / 1000);
        assert_eq!(config.window_ms(), i64::MAX);

        let first = store.check_and_increment_at("wallet", &config, 1_000);
        assert!(first.allowed);
        assert_eq!(first.reset_at_ms, i64::MAX);

        let second = store.check_and_increment_at("wallet", &config, 1_000);
        assert!(!second.allowed);
    }

    #[tokio::test]
    async fn test_concurrent_attempts_never_exceed_limit() {
        use std::sync::Arc;

        let store = Arc::new(MemoryRateLimitStore::new());
        let config = Arc::new(RateLimitConfig::new(5, 60));

        let mut handles = Vec::new();
        for _ in 0..32 {
            let store = Arc::clone(&store);
            let config = Arc::clone(&config);
            handles.push(tokio::spawn(async move {
                RateLimitStore::check_and_increment(store.as_ref(), "wallet", &config)
                    .await
                    .unwrap()
                    .allowed
            }));
        }

        let mut allowed = 0;
        for handle in handles {
            if handle.await.unwrap() {
                allowed += 1;
            }
        }
        assert_eq!(allowed, 5);
    }
}
