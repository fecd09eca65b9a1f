//! Security log entry entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Acting user recorded for events with no authenticated caller.
pub const SYSTEM_ACTOR: &str = "System";

/// Severity of a security event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "security_log_severity", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum LogSeverity {
    /// A completed security-relevant action (login, registration).
    Success,
    /// A rejected or suspicious attempt.
    Warning,
    /// A destructive administrative action.
    Danger,
    /// Informational.
    #[default]
    Info,
}

impl LogSeverity {
    /// Return the severity as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Warning => "warning",
            Self::Danger => "danger",
            Self::Info => "info",
        }
    }
}

impl std::str::FromStr for LogSeverity {
    type Err = sentinel_core::AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "success" => Ok(Self::Success),
            "warning" => Ok(Self::Warning),
            "danger" => Ok(Self::Danger),
            "info" => Ok(Self::Info),
            _ => Err(sentinel_core::AppError::validation(format!(
                "Invalid log type: '{s}'. Expected one of: success, warning, danger, info"
            ))),
        }
    }
}

/// An append-only security log entry.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct SecurityLogEntry {
    /// Unique entry identifier.
    pub id: Uuid,
    /// Event severity.
    #[serde(rename = "type")]
    pub severity: LogSeverity,
    /// Action name, e.g. `login`, `register`, `user_deleted`.
    pub action: String,
    /// Acting user's email, or [`SYSTEM_ACTOR`].
    pub actor: String,
    /// Acting user's id, when the actor is a known account.
    pub actor_id: Option<Uuid>,
    /// Client IP address.
    pub ip: Option<String>,
    /// Free-form structured details.
    pub details: Option<serde_json::Value>,
    /// Business domain the event concerns, if any.
    pub domain: Option<String>,
    /// When the event happened.
    pub timestamp: DateTime<Utc>,
}

/// Data for appending a security log entry.
#[derive(Debug, Clone)]
pub struct CreateSecurityLogEntry {
    /// Event severity.
    pub severity: LogSeverity,
    /// Action name.
    pub action: String,
    /// Acting user's email.
    pub actor: String,
    /// Acting user's id.
    pub actor_id: Option<Uuid>,
    /// Client IP address.
    pub ip: Option<String>,
    /// Structured details.
    pub details: Option<serde_json::Value>,
    /// Business domain.
    pub domain: Option<String>,
}

impl CreateSecurityLogEntry {
    /// Start an entry with the required fields.
    pub fn new(severity: LogSeverity, action: impl Into<String>, actor: impl Into<String>) -> Self {
        Self {
            severity,
            action: action.into(),
            actor: actor.into(),
            actor_id: None,
            ip: None,
            details: None,
            domain: None,
        }
    }

    /// Attach the acting user's id.
    pub fn with_actor_id(mut self, actor_id: Uuid) -> Self {
        self.actor_id = Some(actor_id);
        self
    }

    /// Attach the client IP address.
    pub fn with_ip(mut self, ip: Option<String>) -> Self {
        self.ip = ip;
        self
    }

    /// Attach structured details.
    pub fn with_details(mut self, details: serde_json::Value) -> Self {
        self.details = Some(details);
        self
    }

    /// Attach the business domain.
    pub fn with_domain(mut self, domain: impl Into<String>) -> Self {
        self.domain = Some(domain.into());
        self
    }
}

/// Filters for reading the security log.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SecurityLogFilter {
    /// Only entries of this severity.
    pub severity: Option<LogSeverity>,
    /// Only entries from this actor (exact, case-insensitive).
    pub actor: Option<String>,
}

impl SecurityLogFilter {
    /// Whether `entry` passes every set filter.
    pub fn matches(&self, entry: &SecurityLogEntry) -> bool {
        self.severity.is_none_or(|severity| severity == entry.severity)
            && self
                .actor
                .as_deref()
                .is_none_or(|actor| actor.eq_ignore_ascii_case(&entry.actor))
    }
}
