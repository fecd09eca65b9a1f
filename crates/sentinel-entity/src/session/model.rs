//! Session entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A server-side record of an issued access token.
///
/// Sessions are created on login and registration and end on logout,
/// expiry, or admin revocation. The raw token is never stored.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Session {
    /// Unique session identifier, also carried in the token's `sid` claim.
    pub id: Uuid,
    /// The user this session belongs to.
    pub user_id: Uuid,
    /// SHA-256 hex digest of the access token.
    #[serde(skip_serializing)]
    pub token_hash: String,
    /// Client IP address, when known.
    pub ip_address: Option<String>,
    /// User-Agent header value.
    pub user_agent: Option<String>,
    /// When the session was created.
    pub created_at: DateTime<Utc>,
    /// When the session expires; equals the token's `exp`.
    pub expires_at: DateTime<Utc>,
    /// When the session was revoked, if it was.
    pub revoked_at: Option<DateTime<Utc>>,
}

impl Session {
    /// Not revoked and not yet expired at `now`.
    pub fn is_active_at(&self, now: DateTime<Utc>) -> bool {
        self.revoked_at.is_none() && self.expires_at > now
    }

    /// Not revoked and not yet expired.
    pub fn is_active(&self) -> bool {
        self.is_active_at(Utc::now())
    }
}

/// Data required to record a new session.
#[derive(Debug, Clone)]
pub struct CreateSession {
    /// Pre-generated session identifier.
    pub id: Uuid,
    /// The user this session belongs to.
    pub user_id: Uuid,
    /// SHA-256 hex digest of the access token.
    pub token_hash: String,
    /// Client IP address.
    pub ip_address: Option<String>,
    /// Client User-Agent.
    pub user_agent: Option<String>,
    /// Absolute expiry.
    pub expires_at: DateTime<Utc>,
}
