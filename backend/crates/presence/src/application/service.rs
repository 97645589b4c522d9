//! Presence Service
//!
//! Process-wide presence tracking over a [`PresenceRepository`]. Constructed
//! once at startup and shared through `Arc`; [`PresenceService::spawn_eviction`]
//! starts the background sweep and returns the handle that stops it.

use chrono::Utc;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use crate::application::config::PresenceConfig;
use crate::domain::entities::{DebugSnapshot, GamePresenceSnapshot};
use crate::domain::repository::PresenceRepository;
use crate::domain::value_objects::GameKey;

/// `tokio::time::interval` panics on a zero period
const MIN_SWEEP_INTERVAL: Duration = Duration::from_millis(10);

pub struct PresenceService<R> {
    repo: Arc<R>,
    config: PresenceConfig,
}

impl<R> PresenceService<R>
where
    R: PresenceRepository + Send + Sync + 'static,
{
    pub fn new(repo: Arc<R>, config: PresenceConfig) -> Self {
        Self { repo, config }
    }

    pub fn config(&self) -> &PresenceConfig {
        &self.config
    }

    pub async fn register_user(
        &self,
        identity: &str,
        game: &GameKey,
        session_tag: Option<String>,
    ) -> usize {
        self.register_user_at(identity, game, session_tag, now_ms())
            .await
    }

    pub async fn register_user_at(
        &self,
        identity: &str,
        game: &GameKey,
        session_tag: Option<String>,
        now_ms: i64,
    ) -> usize {
        let count = self.repo.register(identity, game, session_tag, now_ms).await;
        tracing::debug!(identity = %identity, game_key = %game, online = count, "Presence registered");
        count
    }

    pub async fn unregister_user(&self, identity: &str, game: &GameKey) -> usize {
        self.unregister_user_at(identity, game, now_ms()).await
    }

    pub async fn unregister_user_at(&self, identity: &str, game: &GameKey, now_ms: i64) -> usize {
        let count = self.repo.unregister(identity, game, now_ms).await;
        tracing::debug!(identity = %identity, game_key = %game, online = count, "Presence removed");
        count
    }

    pub async fn update_heartbeat(&self, identity: &str, game: &GameKey) -> bool {
        self.update_heartbeat_at(identity, game, now_ms()).await
    }

    pub async fn update_heartbeat_at(&self, identity: &str, game: &GameKey, now_ms: i64) -> bool {
        self.repo.heartbeat(identity, game, now_ms).await
    }

    pub async fn game_online_count(&self, game: &GameKey) -> usize {
        self.repo.game_count(game).await
    }

    pub async fn all_game_presence(&self) -> Vec<GamePresenceSnapshot> {
        self.repo.all_games().await
    }

    pub async fn total_online_count(&self) -> usize {
        self.repo.total_online().await
    }

    pub async fn is_user_active(&self, identity: &str, game: &GameKey) -> bool {
        self.is_user_active_at(identity, game, now_ms()).await
    }

    pub async fn is_user_active_at(&self, identity: &str, game: &GameKey, now_ms: i64) -> bool {
        self.repo.entry(identity).await.is_some_and(|entry| {
            entry.game_key == *game
                && entry.is_active(now_ms, self.config.inactivity_threshold_ms())
        })
    }

    pub async fn debug_snapshot(&self) -> DebugSnapshot {
        self.repo.debug_snapshot().await
    }

    pub async fn sweep(&self) -> usize {
        self.sweep_at(now_ms()).await
    }

    /// Evict entries silent for longer than the inactivity threshold.
    ///
    /// Candidates are collected first, then each one is re-checked and
    /// removed on its own, so a heartbeat landing mid-sweep keeps its entry.
    pub async fn sweep_at(&self, now_ms: i64) -> usize {
        let threshold_ms = self.config.inactivity_threshold_ms();
        let candidates = self.repo.stale_entries(now_ms, threshold_ms).await;

        let mut evicted = 0;
        for (identity, game) in &candidates {
            if self
                .repo
                .evict_if_stale(identity, game, now_ms, threshold_ms)
                .await
            {
                evicted += 1;
            }
        }

        if evicted > 0 {
            tracing::info!(evicted, "Cleaned up inactive presence entries");
        }
        evicted
    }

    /// Start the periodic sweep.
    ///
    /// Sweeps run inline in one task, so they never overlap. A sweep that has
    /// started finishes before a shutdown request is observed.
    pub fn spawn_eviction(self: &Arc<Self>) -> EvictionHandle {
        let service = Arc::clone(self);
        let period = self.config.sweep_interval.max(MIN_SWEEP_INTERVAL);
        let (shutdown_tx, mut shutdown_rx) = oneshot::channel::<()>();

        let task = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            // first tick completes immediately
            ticker.tick().await;

            loop {
                tokio::select! {
                    _ = &mut shutdown_rx => break,
                    _ = ticker.tick() => {
                        service.sweep().await;
                    }
                }
            }

            service.repo.clear().await;
            tracing::info!("Presence eviction stopped");
        });

        tracing::info!(interval_ms = period.as_millis() as u64, "Presence eviction started");

        EvictionHandle { shutdown_tx, task }
    }
}

/// Running eviction task. Dropping it also stops the task.
pub struct EvictionHandle {
    shutdown_tx: oneshot::Sender<()>,
    task: JoinHandle<()>,
}

impl EvictionHandle {
    /// Stop the timer, wait for the task and clear the store
    pub async fn shutdown(self) {
        let Self { shutdown_tx, task } = self;
        let _ = shutdown_tx.send(());

        if let Err(e) = task.await {
            tracing::error!(error = %e, "Presence eviction task failed");
        }
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

fn now_ms() -> i64 {
    Utc::now().timestamp_millis()
}
