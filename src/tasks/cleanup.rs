//! TTL Cleanup Task
//!
//! Background task that periodically removes expired cache entries.

use std::hash::Hash;
use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::cache::Cache;

/// Spawns a background task that periodically cleans up expired cache entries.
///
/// The task runs in an infinite loop, sleeping for `interval` between
/// sweeps. Each sweep takes the cache's lock once, the same lock every
/// other operation uses.
///
/// Must be called from within a tokio runtime. The returned handle aborts
/// the sweep; dropping it leaves the task running.
///
/// # Example
/// ```ignore
/// let cache = Arc::new(Cache::new(1000, Duration::from_secs(1), PolicyKind::Lru)?);
/// let cleanup_handle = spawn_cleanup_task(cache.clone(), cache.cleanup_interval());
/// // Later, during shutdown:
/// cleanup_handle.abort();
/// ```
pub fn spawn_cleanup_task<K, V>(cache: Arc<Cache<K, V>>, interval: Duration) -> JoinHandle<()>
where
    K: Hash + Eq + Clone + Send + 'static,
    V: Clone + Send + 'static,
{
    tokio::spawn(async move {
        info!(?interval, "Starting TTL cleanup task");

        loop {
            tokio::time::sleep(interval).await;

            let removed = cache.cleanup_expired();

            if removed > 0 {
                info!("TTL cleanup: removed {} expired entries", removed);
            } else {
                debug!("TTL cleanup: no expired entries found");
            }
        }
    })
}
