//! Rate-Limit Sweep Task
//!
//! Background task that periodically drops rate-limit windows that have
//! already reset, so the limiters do not grow with every client ever seen.
//! The response cache is not touched; its entries expire lazily.

use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::ratelimit::RateLimiters;

/// Spawns a background task that sweeps stale windows from every limiter tier.
///
/// The task runs in an infinite loop, sleeping for the given interval between
/// sweeps. Each tier's lock is held only for its own sweep.
///
/// # Returns
/// A JoinHandle for the spawned task, which can be used to abort the task
/// during graceful shutdown.
pub fn spawn_limiter_sweep_task(limiters: RateLimiters, sweep_interval_secs: u64) -> JoinHandle<()> {
    let interval = Duration::from_secs(sweep_interval_secs.max(1));

    tokio::spawn(async move {
        info!(
            "Starting rate-limit sweep task with interval of {} seconds",
            interval.as_secs()
        );

        loop {
            tokio::time::sleep(interval).await;

            let mut removed = 0;
            for tier in limiters.all() {
                removed += tier.limiter.lock().await.sweep();
            }

            if removed > 0 {
                info!("Rate-limit sweep: dropped {} expired windows", removed);
            } else {
                debug!("Rate-limit sweep: nothing to drop");
            }
        }
    })
}
