//! In-memory session ledger table.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use sentinel_core::result::AppResult;
use sentinel_entity::session::{CreateSession, Session};

use crate::store::SessionStore;

#[derive(Debug, Default)]
struct Inner {
    sessions: HashMap<Uuid, Session>,
    /// Token hash to session id.
    by_token: HashMap<String, Uuid>,
}

/// [`SessionStore`] over a process-local table.
#[derive(Debug, Clone, Default)]
pub struct MemorySessionStore {
    inner: Arc<RwLock<Inner>>,
}

impl MemorySessionStore {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn insert(&self, data: &CreateSession) -> AppResult<Session> {
        let session = Session {
            id: data.id,
            user_id: data.user_id,
            token_hash: data.token_hash.clone(),
            ip_address: data.ip_address.clone(),
            user_agent: data.user_agent.clone(),
            created_at: Utc::now(),
            expires_at: data.expires_at,
            revoked_at: None,
        };
        let mut inner = self.inner.write().await;
        inner.by_token.insert(session.token_hash.clone(), session.id);
        inner.sessions.insert(session.id, session.clone());
        Ok(session)
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Session>> {
        Ok(self.inner.read().await.sessions.get(&id).cloned())
    }

    async fn find_by_token_hash(&self, token_hash: &str) -> AppResult<Option<Session>> {
        let inner = self.inner.read().await;
        Ok(inner
            .by_token
            .get(token_hash)
            .and_then(|id| inner.sessions.get(id))
            .cloned())
    }

    async fn revoke(&self, id: Uuid, at: DateTime<Utc>) -> AppResult<bool> {
        let mut inner = self.inner.write().await;
        match inner.sessions.get_mut(&id) {
            Some(session) if session.revoked_at.is_none() => {
                session.revoked_at = Some(at);
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn revoke_all_for_user(&self, user_id: Uuid, at: DateTime<Utc>) -> AppResult<u64> {
        let mut inner = self.inner.write().await;
        let mut revoked = 0;
        for session in inner
            .sessions
            .values_mut()
            .filter(|s| s.user_id == user_id && s.revoked_at.is_none())
        {
            session.revoked_at = Some(at);
            revoked += 1;
        }
        Ok(revoked)
    }

    async fn list_active_for_user(&self, user_id: Uuid, now: DateTime<Utc>) -> AppResult<Vec<Session>> {
        let inner = self.inner.read().await;
        let mut active: Vec<Session> = inner
            .sessions
            .values()
            .filter(|s| s.user_id == user_id && s.is_active_at(now))
            .cloned()
            .collect();
        active.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(active)
    }

    async fn count_active(&self, now: DateTime<Utc>) -> AppResult<u64> {
        Ok(self
            .inner
            .read()
            .await
            .sessions
            .values()
            .filter(|s| s.is_active_at(now))
            .count() as u64)
    }

    async fn delete_expired(&self, before: DateTime<Utc>) -> AppResult<u64> {
        let mut inner = self.inner.write().await;
        let Inner { sessions, by_token } = &mut *inner;
        let len = sessions.len();
        sessions.retain(|_, s| {
            let keep = s.expires_at >= before;
            if !keep {
                by_token.remove(&s.token_hash);
            }
            keep
        });
        Ok((len - sessions.len()) as u64)
    }
}
