//! Periodic cache eviction.
//!
//! One sweep runs at process start, then on a fixed interval for the life
//! of the server. A failed sweep is logged and the schedule keeps running.

use chrono::Utc;
use tokio::task::JoinHandle;
use unfurl_core::CacheDb;

/// Spawn the eviction sweeper. The first sweep fires immediately.
///
/// The returned handle is used to stop the schedule at shutdown.
pub fn spawn(db: CacheDb, retention: chrono::Duration, period: std::time::Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(period);

        loop {
            ticker.tick().await;

            let cutoff = Utc::now() - retention;
            match db.evict_titles_older_than(cutoff).await {
                Ok(0) => tracing::debug!("eviction sweep removed nothing"),
                Ok(removed) => tracing::info!(removed, "eviction sweep removed stale titles"),
                Err(e) => tracing::warn!(error = %e, "eviction sweep failed"),
            }
        }
    })
}
