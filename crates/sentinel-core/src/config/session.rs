//! Session ledger maintenance configuration.

use serde::{Deserialize, Serialize};

/// Session ledger configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Whether the background pruning task runs.
    #[serde(default = "default_true")]
    pub cleanup_enabled: bool,
    /// Interval between pruning runs, in minutes.
    #[serde(default = "default_cleanup_interval")]
    pub cleanup_interval_minutes: u64,
    /// How long expired session rows are kept before pruning, in minutes.
    #[serde(default = "default_retention")]
    pub expired_retention_minutes: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            cleanup_enabled: true,
            cleanup_interval_minutes: default_cleanup_interval(),
            expired_retention_minutes: default_retention(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_cleanup_interval() -> u64 {
    15
}

fn default_retention() -> u64 {
    60
}
