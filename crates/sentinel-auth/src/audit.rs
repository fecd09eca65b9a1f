//! Security audit log.
//!
//! Recording is best-effort: a failed or slow append is logged and
//! dropped, and never changes the outcome of the operation it describes.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, warn};

use sentinel_core::result::AppResult;
use sentinel_database::{SecurityLogStore, Stores, bounded};
use sentinel_entity::security_log::{CreateSecurityLogEntry, SecurityLogEntry, SecurityLogFilter};

/// Default number of entries returned by a log query.
pub const DEFAULT_RECENT_LIMIT: u32 = 100;
/// Upper bound on entries returned by a log query.
pub const MAX_RECENT_LIMIT: u32 = 1_000;

/// Action names written to the log.
pub mod actions {
    /// Successful login.
    pub const LOGIN: &str = "login";
    /// Rejected login.
    pub const LOGIN_FAILED: &str = "login_failed";
    /// Account registration.
    pub const REGISTER: &str = "register";
    /// Session ended by its owner.
    pub const LOGOUT: &str = "logout";
    /// Password reset requested for a known email.
    pub const PASSWORD_RESET_REQUEST: &str = "password_reset_request";
    /// Admin edited a user's fields.
    pub const USER_UPDATED: &str = "user_updated";
    /// Admin enabled an account.
    pub const USER_ACTIVATED: &str = "user_activated";
    /// Admin disabled an account.
    pub const USER_DEACTIVATED: &str = "user_deactivated";
    /// Admin deleted an account.
    pub const USER_DELETED: &str = "user_deleted";
    /// Admin revoked a session.
    pub const SESSION_REVOKED: &str = "session_revoked";
    /// Admin created an access rule.
    pub const ACCESS_RULE_CREATED: &str = "access_rule_created";
    /// Startup created the configured admin account.
    pub const BOOTSTRAP_ADMIN_CREATED: &str = "bootstrap_admin_created";
}

/// Append-only security event recorder.
#[derive(Debug, Clone)]
pub struct SecurityAuditLog {
    log: Arc<dyn SecurityLogStore>,
    timeout: Duration,
}

impl SecurityAuditLog {
    /// Creates an audit log over the configured store.
    pub fn new(stores: &Stores) -> Self {
        Self {
            log: Arc::clone(&stores.security_log),
            timeout: stores.operation_timeout,
        }
    }

    /// Append an entry. Failures are logged and swallowed.
    pub async fn record(&self, entry: CreateSecurityLogEntry) {
        let action = entry.action.clone();
        match bounded(self.timeout, "security_log.append", self.log.append(&entry)).await {
            Ok(stored) => debug!(entry_id = %stored.id, action = %action, "Security event recorded"),
            Err(e) => warn!(action = %action, error = %e, "Failed to record security event"),
        }
    }

    /// Most recent entries first. `limit` defaults to [`DEFAULT_RECENT_LIMIT`]
    /// and is capped at [`MAX_RECENT_LIMIT`].
    pub async fn recent(
        &self,
        filter: &SecurityLogFilter,
        limit: Option<u32>,
    ) -> AppResult<Vec<SecurityLogEntry>> {
        let limit = limit.unwrap_or(DEFAULT_RECENT_LIMIT).clamp(1, MAX_RECENT_LIMIT);
        bounded(self.timeout, "security_log.recent", self.log.recent(filter, limit)).await
    }
}
