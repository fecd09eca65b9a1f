//! Per-request context passed into the auth core.

use uuid::Uuid;

use sentinel_entity::user::{User, UserProfile};

use crate::jwt::Claims;

/// Client details recorded on sessions and audit entries.
#[derive(Debug, Clone, Default)]
pub struct RequestMeta {
    /// Client IP address.
    pub ip: Option<String>,
    /// User-Agent header.
    pub user_agent: Option<String>,
}

impl RequestMeta {
    /// Build from optional parts.
    pub fn new(ip: Option<String>, user_agent: Option<String>) -> Self {
        Self { ip, user_agent }
    }
}

/// An authenticated caller: a verified token, a live session, and an active user.
#[derive(Debug, Clone)]
pub struct AuthContext {
    /// The user the token resolved to.
    pub user: User,
    /// The session the token was recorded under.
    pub session_id: Uuid,
    /// The verified claims.
    pub claims: Claims,
}

impl AuthContext {
    /// The caller's id.
    pub fn user_id(&self) -> Uuid {
        self.user.id
    }

    /// The caller's email.
    pub fn email(&self) -> &str {
        &self.user.email
    }

    /// The caller's public projection.
    pub fn profile(&self) -> UserProfile {
        self.user.profile()
    }
}
