//! Periodic pruning of expired sessions.

use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{error, info};

use sentinel_core::config::SessionConfig;
use sentinel_core::result::AppResult;

use super::ledger::SessionLedger;

/// Deletes expired session rows on a fixed interval.
#[derive(Debug, Clone)]
pub struct SessionCleanup {
    ledger: SessionLedger,
    interval: Duration,
    retention: chrono::Duration,
}

impl SessionCleanup {
    /// Creates a cleanup handler from session configuration.
    pub fn new(ledger: SessionLedger, config: &SessionConfig) -> Self {
        Self {
            ledger,
            interval: Duration::from_secs(config.cleanup_interval_minutes.max(1).saturating_mul(60)),
            retention: i64::try_from(config.expired_retention_minutes)
                .ok()
                .and_then(chrono::Duration::try_minutes)
                .unwrap_or(chrono::Duration::MAX),
        }
    }

    /// Runs one cleanup cycle. Returns the number of sessions removed.
    pub async fn run_cleanup(&self) -> AppResult<u64> {
        let removed = self.ledger.prune_expired(self.retention).await?;
        if removed > 0 {
            info!(removed, "Pruned expired sessions");
        }
        Ok(removed)
    }

    /// Run cycles until `shutdown` flips to `true`.
    pub fn spawn(self, mut shutdown: watch::Receiver<bool>) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(self.interval);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
            info!(interval_secs = self.interval.as_secs(), "Session cleanup task started");

            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        if let Err(e) = self.run_cleanup().await {
                            error!(error = %e, "Session cleanup failed");
                        }
                    }
                    changed = shutdown.changed() => {
                        if changed.is_err() || *shutdown.borrow() {
                            break;
                        }
                    }
                }
            }
            info!("Session cleanup task stopped");
        })
    }
}
