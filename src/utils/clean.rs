use std::time::Duration;

use tokio::time::{self, MissedTickBehavior};

use crate::{store::Store, utils::clock};

/// Runs the presence sweep every `every` for the life of the process.
pub async fn task(store: Store, every: Duration, timeout: Duration) {
    let mut tick = time::interval(every);
    tick.set_missed_tick_behavior(MissedTickBehavior::Delay);
    loop {
        tick.tick().await;
        if let Err(e) = sweep(&store, timeout).await {
            tracing::error!(error = %e, "presence sweep failed");
        }
    }
}

/// Evicts participants idle for longer than `timeout`; returns their names.
pub async fn sweep(store: &Store, timeout: Duration) -> Result<Vec<String>, sqlx::Error> {
    let timeout_ms = i64::try_from(timeout.as_millis()).unwrap_or(i64::MAX);
    let cutoff = clock::now_ms().saturating_sub(timeout_ms);
    let gone = store.evict_idle(cutoff, &clock::stamp()).await?;
    if !gone.is_empty() {
        tracing::info!(count = gone.len(), names = ?gone, "evicted idle participants");
    }
    Ok(gone)
}
