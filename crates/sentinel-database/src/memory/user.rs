//! In-memory user table.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use sentinel_core::AppError;
use sentinel_core::result::AppResult;
use sentinel_core::types::{PageRequest, PageResponse};
use sentinel_entity::user::{CreateUser, UpdateUser, User, UserFilter};

use crate::store::UserStore;

#[derive(Debug, Default)]
struct Inner {
    users: HashMap<Uuid, User>,
    /// Lowercased email to id; the uniqueness index.
    by_email: HashMap<String, Uuid>,
}

/// [`UserStore`] over a process-local table.
#[derive(Debug, Clone, Default)]
pub struct MemoryUserStore {
    inner: Arc<RwLock<Inner>>,
}

impl MemoryUserStore {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn insert(&self, data: &CreateUser) -> AppResult<User> {
        let key = data.email.to_lowercase();
        let mut inner = self.inner.write().await;
        if inner.by_email.contains_key(&key) {
            return Err(AppError::duplicate_email());
        }
        let now = Utc::now();
        let user = User {
            id: Uuid::new_v4(),
            email: data.email.clone(),
            password_hash: data.password_hash.clone(),
            full_name: data.full_name.clone(),
            role: data.role,
            is_active: true,
            created_at: now,
            updated_at: now,
            last_login_at: None,
        };
        inner.by_email.insert(key, user.id);
        inner.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>> {
        Ok(self.inner.read().await.users.get(&id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let inner = self.inner.read().await;
        Ok(inner
            .by_email
            .get(&email.to_lowercase())
            .and_then(|id| inner.users.get(id))
            .cloned())
    }

    async fn list(&self, filter: &UserFilter, page: &PageRequest) -> AppResult<PageResponse<User>> {
        let inner = self.inner.read().await;
        let mut matching: Vec<&User> = inner.users.values().filter(|u| filter.matches(u)).collect();
        matching.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(a.id.cmp(&b.id)));
        let total = matching.len() as u64;
        let items = page.slice(&matching).into_iter().cloned().collect();
        Ok(PageResponse::new(items, page, total))
    }

    async fn update_fields(&self, id: Uuid, data: &UpdateUser) -> AppResult<Option<User>> {
        let mut inner = self.inner.write().await;
        let Some(current) = inner.users.get(&id) else {
            return Ok(None);
        };
        let old_key = current.email.to_lowercase();

        if let Some(email) = &data.email {
            let new_key = email.to_lowercase();
            if new_key != old_key && inner.by_email.contains_key(&new_key) {
                return Err(AppError::duplicate_email());
            }
            inner.by_email.remove(&old_key);
            inner.by_email.insert(new_key, id);
        }

        let Some(user) = inner.users.get_mut(&id) else {
            return Ok(None);
        };
        if let Some(email) = &data.email {
            user.email = email.clone();
        }
        if let Some(full_name) = &data.full_name {
            user.full_name = full_name.clone();
        }
        if let Some(role) = data.role {
            user.role = role;
        }
        user.updated_at = Utc::now();
        Ok(Some(user.clone()))
    }

    async fn set_active(&self, id: Uuid, active: bool) -> AppResult<Option<User>> {
        let mut inner = self.inner.write().await;
        Ok(inner.users.get_mut(&id).map(|user| {
            user.is_active = active;
            user.updated_at = Utc::now();
            user.clone()
        }))
    }

    async fn touch_last_login(&self, id: Uuid, at: DateTime<Utc>) -> AppResult<()> {
        if let Some(user) = self.inner.write().await.users.get_mut(&id) {
            user.last_login_at = Some(at);
        }
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> AppResult<bool> {
        let mut inner = self.inner.write().await;
        match inner.users.remove(&id) {
            Some(user) => {
                inner.by_email.remove(&user.email.to_lowercase());
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn count(&self) -> AppResult<u64> {
        Ok(self.inner.read().await.users.len() as u64)
    }
}
