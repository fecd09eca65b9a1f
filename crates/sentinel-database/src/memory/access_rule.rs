//! In-memory access rule table.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use sentinel_core::result::AppResult;
use sentinel_entity::access_rule::{AccessRule, CreateAccessRule};
use sentinel_entity::user::UserRole;

use crate::store::AccessRuleStore;

/// [`AccessRuleStore`] over a process-local vector kept in creation order.
#[derive(Debug, Clone, Default)]
pub struct MemoryAccessRuleStore {
    rules: Arc<RwLock<Vec<AccessRule>>>,
}

impl MemoryAccessRuleStore {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AccessRuleStore for MemoryAccessRuleStore {
    async fn insert(&self, data: &CreateAccessRule) -> AppResult<AccessRule> {
        let rule = AccessRule {
            id: Uuid::new_v4(),
            role: data.role,
            user_id: data.user_id,
            domain: data.domain.clone(),
            permissions: data.permissions.clone(),
            resources: data.resources.clone(),
            created_by: data.created_by.clone(),
            created_at: Utc::now(),
        };
        self.rules.write().await.push(rule.clone());
        Ok(rule)
    }

    async fn list(&self) -> AppResult<Vec<AccessRule>> {
        Ok(self.rules.read().await.clone())
    }

    async fn list_by_role(&self, role: UserRole) -> AppResult<Vec<AccessRule>> {
        Ok(self
            .rules
            .read()
            .await
            .iter()
            .filter(|r| r.role == Some(role))
            .cloned()
            .collect())
    }
}
