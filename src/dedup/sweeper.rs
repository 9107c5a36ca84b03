use std::sync::Arc;

use anyhow::{bail, Context, Result};
use log::info;
use tokio::task::JoinHandle;
use tokio::time::{Duration, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

use super::EventDeduplicator;

// Set to true to enable verbose logging in this module
const ENABLE_LOGS: bool = true;

use crate::log_debug;

/// Background task that periodically evicts stale deduplication keys.
///
/// Must be started from inside a tokio runtime.
pub struct DedupSweeper {
    handle: Option<JoinHandle<()>>,
    cancel_token: Option<CancellationToken>,
}

impl DedupSweeper {
    pub fn new() -> Self {
        Self {
            handle: None,
            cancel_token: None,
        }
    }

    pub fn is_running(&self) -> bool {
        self.handle.is_some()
    }

    /// Sweep every `interval`; defaults to the deduplicator's retention window
    /// when `interval` is `None`.
    pub fn start(&mut self, dedup: Arc<EventDeduplicator>, interval: Option<Duration>) -> Result<()> {
        if self.handle.is_some() {
            bail!("dedup sweeper already running");
        }

        // tokio intervals reject a zero period.
        let interval = interval
            .unwrap_or_else(|| dedup.retention())
            .max(Duration::from_millis(1));
        let cancel_token = CancellationToken::new();
        let handle = tokio::spawn(sweep_loop(dedup, interval, cancel_token.clone()));

        info!("dedup sweeper started (every {:?})", interval);
        self.handle = Some(handle);
        self.cancel_token = Some(cancel_token);
        Ok(())
    }

    pub async fn stop(&mut self) -> Result<()> {
        if let Some(token) = self.cancel_token.take() {
            token.cancel();
        }

        if let Some(handle) = self.handle.take() {
            handle
                .await
                .context("dedup sweeper task failed to join")
                .map(|_| ())
        } else {
            Ok(())
        }
    }
}

impl Default for DedupSweeper {
    fn default() -> Self {
        Self::new()
    }
}

async fn sweep_loop(dedup: Arc<EventDeduplicator>, interval: Duration, cancel_token: CancellationToken) {
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                let removed = dedup.sweep();
                if removed > 0 {
                    log_debug!("dedup sweep removed {removed} stale keys, {} remain", dedup.len());
                }
            }
            _ = cancel_token.cancelled() => {
                info!("dedup sweeper shutting down");
                break;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::EventType;

    #[tokio::test]
    async fn start_twice_is_rejected() {
        let dedup = Arc::new(EventDeduplicator::default());
        let mut sweeper = DedupSweeper::new();
        sweeper.start(Arc::clone(&dedup), None).unwrap();
        assert!(sweeper.is_running());
        assert!(sweeper.start(dedup, None).is_err());
        sweeper.stop().await.unwrap();
        assert!(!sweeper.is_running());
    }

    #[tokio::test]
    async fn stop_without_start_is_ok() {
        let mut sweeper = DedupSweeper::new();
        sweeper.stop().await.unwrap();
    }

    #[tokio::test]
    async fn sweeps_stale_keys_in_background() {
        let dedup = Arc::new(EventDeduplicator::new(Duration::from_millis(1)).with_sweep_factor(1));
        dedup.is_duplicate(EventType::KeyPress, "a");

        let mut sweeper = DedupSweeper::new();
        sweeper
            .start(Arc::clone(&dedup), Some(Duration::from_millis(5)))
            .unwrap();

        for _ in 0..100 {
            if dedup.is_empty() {
                break;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        sweeper.stop().await.unwrap();
        assert!(dedup.is_empty());
    }
}
