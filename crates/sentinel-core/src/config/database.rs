//! Backing store configuration.

use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Which store implementation backs the core.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DatabaseBackend {
    /// PostgreSQL via a sqlx connection pool.
    #[default]
    Postgres,
    /// Process-local tables; data is lost on restart.
    Memory,
}

/// Database connection pool configuration.
#[derive(Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Store implementation.
    #[serde(default)]
    pub backend: DatabaseBackend,
    /// PostgreSQL connection URL.
    #[serde(default = "default_url")]
    pub url: String,
    /// Maximum number of connections in the pool.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    /// Minimum number of connections in the pool.
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
    /// Connection acquire timeout in seconds.
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_seconds: u64,
    /// Idle connection timeout in seconds.
    #[serde(default = "default_idle_timeout")]
    pub idle_timeout_seconds: u64,
    /// Upper bound for a single store operation, in milliseconds.
    #[serde(default = "default_operation_timeout")]
    pub operation_timeout_ms: u64,
}

impl DatabaseConfig {
    /// The per-operation timeout as a [`std::time::Duration`].
    pub fn operation_timeout(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.operation_timeout_ms)
    }

    /// Reject settings that would make every store call fail.
    pub fn validate(&self) -> Result<(), AppError> {
        if self.operation_timeout_ms == 0 {
            return Err(AppError::configuration(
                "database.operation_timeout_ms must be greater than zero",
            ));
        }
        if self.backend == DatabaseBackend::Postgres && self.url.trim().is_empty() {
            return Err(AppError::configuration(
                "database.url is required for the postgres backend",
            ));
        }
        if self.min_connections > self.max_connections {
            return Err(AppError::configuration(
                "database.min_connections cannot exceed database.max_connections",
            ));
        }
        Ok(())
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            backend: DatabaseBackend::default(),
            url: default_url(),
            max_connections: default_max_connections(),
            min_connections: default_min_connections(),
            connect_timeout_seconds: default_connect_timeout(),
            idle_timeout_seconds: default_idle_timeout(),
            operation_timeout_ms: default_operation_timeout(),
        }
    }
}

// The URL carries the database password.
impl std::fmt::Debug for DatabaseConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DatabaseConfig")
            .field("backend", &self.backend)
            .field("max_connections", &self.max_connections)
            .field("min_connections", &self.min_connections)
            .field("connect_timeout_seconds", &self.connect_timeout_seconds)
            .field("idle_timeout_seconds", &self.idle_timeout_seconds)
            .field("operation_timeout_ms", &self.operation_timeout_ms)
            .finish_non_exhaustive()
    }
}

fn default_url() -> String {
    "postgres://sentinel@localhost:5432/sentinel".to_string()
}

fn default_max_connections() -> u32 {
    20
}

fn default_min_connections() -> u32 {
    2
}

fn default_connect_timeout() -> u64 {
    5
}

fn default_idle_timeout() -> u64 {
    300
}

fn default_operation_timeout() -> u64 {
    5_000
}
