//! Background expiry of abandoned sessions.

use std::sync::Arc;
use std::time::Duration;

use tracing::info;

use crate::store::SessionStore;

/// Every `every`, drop sessions idle for longer than `ttl`. Runs until the task is aborted.
pub async fn run_sweeper(store: Arc<SessionStore>, ttl: Duration, every: Duration) {
    let ttl = chrono::Duration::from_std(ttl).unwrap_or_else(|_| chrono::Duration::days(36_500));
    let mut ticker = tokio::time::interval(every);
    // The first tick completes immediately; nothing can be stale yet.
    ticker.tick().await;

    info!(ttl_secs = ttl.num_seconds(), "session sweeper started");
    loop {
        ticker.tick().await;
        let purged = store.purge_idle(chrono::Utc::now(), ttl);
        if purged > 0 {
            info!(purged, remaining = store.len(), "expired idle sessions");
        }
    }
}
