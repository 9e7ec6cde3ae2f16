//! Cache Sweep Task
//!
//! Background task that periodically removes expired cache entries.

use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::cache::CacheStore;

/// Spawns a background task that sweeps expired entries every
/// `sweep_interval_secs` seconds.
///
/// Lookups already drop expired entries lazily; the sweep covers keys that
/// are never read again.
///
/// # Returns
/// A JoinHandle for the spawned task, which can be used to abort the task
/// during graceful shutdown.
///
/// # Example
/// ```ignore
/// let handle = spawn_sweep_task(state.cache.clone(), 3600);
/// // Later, during shutdown:
/// handle.abort();
/// ```
pub fn spawn_sweep_task<V>(cache: Arc<RwLock<CacheStore<V>>>, sweep_interval_secs: u64) -> JoinHandle<()>
where
    V: Serialize + Clone + Send + Sync + 'static,
{
    let interval = Duration::from_secs(sweep_interval_secs.max(1));

    tokio::spawn(async move {
        info!(
            "Starting cache sweep task with interval of {} seconds",
            interval.as_secs()
        );

        loop {
            tokio::time::sleep(interval).await;

            let report = cache.write().await.sweep();

            if report.cleaned > 0 {
                info!(
                    cleaned = report.cleaned,
                    before = report.before,
                    after = report.after,
                    "cache sweep"
                );
            } else {
                debug!(entries = report.after, "cache sweep: no expired entries found");
            }
        }
    })
}
