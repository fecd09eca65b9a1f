//! Response DTOs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use sentinel_auth::AuthGrant;
use sentinel_entity::session::Session;
use sentinel_entity::user::UserProfile;

/// Standard success response wrapper.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T: Serialize> {
    /// Whether the request was successful.
    pub success: bool,
    /// Response data.
    pub data: T,
}

impl<T: Serialize> ApiResponse<T> {
    /// Creates a successful response.
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

/// Token response of login and registration.
#[derive(Clone, Serialize, Deserialize)]
pub struct TokenResponse {
    /// Signed bearer token.
    pub access_token: String,
    /// Always `bearer`.
    pub token_type: String,
    /// Token expiry.
    pub expires_at: DateTime<Utc>,
    /// Session opened for this token.
    pub session_id: Uuid,
    /// The caller's projection.
    pub user: UserProfile,
}

impl std::fmt::Debug for TokenResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenResponse")
            .field("access_token", &"[REDACTED]")
            .field("expires_at", &self.expires_at)
            .field("session_id", &self.session_id)
            .field("user", &self.user)
            .finish()
    }
}

impl From<AuthGrant> for TokenResponse {
    fn from(grant: AuthGrant) -> Self {
        Self {
            access_token: grant.access_token,
            token_type: grant.token_type.to_string(),
            expires_at: grant.expires_at,
            session_id: grant.session_id,
            user: grant.user,
        }
    }
}

/// Simple message response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    /// Message.
    pub message: String,
}

impl MessageResponse {
    /// Wraps `message`.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Always `ok` when the process answers.
    pub status: String,
    /// Crate version.
    pub version: String,
    /// Configured store backend.
    pub backend: String,
}

/// A session as shown to administrators. The token digest is never exposed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionResponse {
    /// Session ID.
    pub id: Uuid,
    /// Owning user.
    pub user_id: Uuid,
    /// Client IP.
    pub ip_address: Option<String>,
    /// Client user agent.
    pub user_agent: Option<String>,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Expiry time.
    pub expires_at: DateTime<Utc>,
}

impl From<Session> for SessionResponse {
    fn from(s: Session) -> Self {
        Self {
            id: s.id,
            user_id: s.user_id,
            ip_address: s.ip_address,
            user_agent: s.user_agent,
            created_at: s.created_at,
            expires_at: s.expires_at,
        }
    }
}
