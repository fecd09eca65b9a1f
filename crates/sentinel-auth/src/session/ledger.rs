//! Server-side record of issued tokens.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use sha2::{Digest, Sha256};
use tracing::debug;
use uuid::Uuid;

use sentinel_core::AppError;
use sentinel_core::result::AppResult;
use sentinel_database::{SessionStore, Stores, bounded};
use sentinel_entity::session::{CreateSession, Session};

use crate::context::RequestMeta;
use crate::jwt::Claims;

/// Hex SHA-256 digest of a token. Only this digest is ever persisted.
pub fn token_digest(token: &str) -> String {
    format!("{:x}", Sha256::digest(token.as_bytes()))
}

/// The session ledger.
///
/// Sessions are authoritative: a token whose session is missing, revoked
/// or expired does not authenticate, whatever its own `exp` says.
#[derive(Debug, Clone)]
pub struct SessionLedger {
    sessions: Arc<dyn SessionStore>,
    timeout: Duration,
}

impl SessionLedger {
    /// Creates a ledger over the configured store.
    pub fn new(stores: &Stores) -> Self {
        Self {
            sessions: Arc::clone(&stores.sessions),
            timeout: stores.operation_timeout,
        }
    }

    /// Record a freshly issued token.
    pub async fn record(
        &self,
        session_id: Uuid,
        user_id: Uuid,
        token: &str,
        expires_at: DateTime<Utc>,
        meta: &RequestMeta,
    ) -> AppResult<Session> {
        let data = CreateSession {
            id: session_id,
            user_id,
            token_hash: token_digest(token),
            ip_address: meta.ip.clone(),
            user_agent: meta.user_agent.clone(),
            expires_at,
        };
        bounded(self.timeout, "sessions.insert", self.sessions.insert(&data)).await
    }

    /// Resolve the live session for a verified token.
    pub async fn validate(&self, claims: &Claims, token: &str) -> AppResult<Session> {
        let digest = token_digest(token);
        let session = bounded(
            self.timeout,
            "sessions.find_by_token_hash",
            self.sessions.find_by_token_hash(&digest),
        )
        .await?
        .ok_or_else(|| {
            debug!(session_id = %claims.sid, "No session recorded for token");
            AppError::unauthenticated()
        })?;

        if session.id != claims.sid {
            debug!(session_id = %claims.sid, "Token session id does not match ledger");
            return Err(AppError::unauthenticated());
        }
        if !session.is_active_at(Utc::now()) {
            debug!(session_id = %session.id, "Session revoked or expired");
            return Err(AppError::unauthenticated());
        }
        Ok(session)
    }

    /// Find a session by id.
    pub async fn find(&self, session_id: Uuid) -> AppResult<Option<Session>> {
        bounded(self.timeout, "sessions.find_by_id", self.sessions.find_by_id(session_id)).await
    }

    /// Revoke one session. Returns `false` if it was missing or already revoked.
    pub async fn revoke(&self, session_id: Uuid) -> AppResult<bool> {
        bounded(
            self.timeout,
            "sessions.revoke",
            self.sessions.revoke(session_id, Utc::now()),
        )
        .await
    }

    /// Revoke every session of a user.
    pub async fn revoke_all_for_user(&self, user_id: Uuid) -> AppResult<u64> {
        bounded(
            self.timeout,
            "sessions.revoke_all_for_user",
            self.sessions.revoke_all_for_user(user_id, Utc::now()),
        )
        .await
    }

    /// A user's live sessions, newest first.
    pub async fn active_for_user(&self, user_id: Uuid) -> AppResult<Vec<Session>> {
        bounded(
            self.timeout,
            "sessions.list_active_for_user",
            self.sessions.list_active_for_user(user_id, Utc::now()),
        )
        .await
    }

    /// Number of live sessions.
    pub async fn count_active(&self) -> AppResult<u64> {
        bounded(
            self.timeout,
            "sessions.count_active",
            self.sessions.count_active(Utc::now()),
        )
        .await
    }

    /// Delete sessions that expired more than `retention` ago.
    pub async fn prune_expired(&self, retention: chrono::Duration) -> AppResult<u64> {
        let Some(cutoff) = Utc::now().checked_sub_signed(retention) else {
            return Ok(0);
        };
        bounded(
            self.timeout,
            "sessions.delete_expired",
            self.sessions.delete_expired(cutoff),
        )
        .await
    }
}
