use super::Engine;

use std::sync::Arc;

use chrono::{Duration, Utc};
use tokio::task::JoinHandle;

impl Engine {
    /// Drops every session untouched for longer than `ttl`. Sessions with a
    /// provider call in flight are kept. Returns how many were dropped.
    #[tracing::instrument(skip(self))]
    pub async fn evict_idle(&self, ttl: Duration) -> usize {
        let cutoff = Utc::now() - ttl;
        let mut sessions = self.sessions.lock().await;
        let before = sessions.len();

        sessions.retain(|_, session| !session.idle_since(cutoff));

        let evicted = before - sessions.len();
        if evicted > 0 {
            tracing::info!(evicted, live = sessions.len(), "evicted idle sessions");
        }

        evicted
    }
}

/// Sweeps idle sessions out of `engine` once per `ttl` until the runtime
/// shuts down.
pub fn spawn_sweeper(engine: Arc<Engine>, ttl: Duration) -> JoinHandle<()> {
    let period = ttl
        .to_std()
        .unwrap_or_else(|_| std::time::Duration::from_secs(60));

    tokio::spawn(async move {
        let mut interval = tokio::time::interval(period);
        // the first tick completes immediately
        interval.tick().await;

        loop {
            interval.tick().await;
            engine.evict_idle(ttl).await;
        }
    })
}
