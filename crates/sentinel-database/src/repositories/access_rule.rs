//! Access rule repository implementation.

use async_trait::async_trait;
use sqlx::PgPool;

use sentinel_core::result::AppResult;
use sentinel_entity::access_rule::{AccessRule, CreateAccessRule};
use sentinel_entity::user::UserRole;

use super::map_sqlx;
use crate::store::AccessRuleStore;

/// PostgreSQL-backed [`AccessRuleStore`].
#[derive(Debug, Clone)]
pub struct AccessRuleRepository {
    pool: PgPool,
}

impl AccessRuleRepository {
    /// Create a new access rule repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AccessRuleStore for AccessRuleRepository {
    async fn insert(&self, data: &CreateAccessRule) -> AppResult<AccessRule> {
        sqlx::query_as::<_, AccessRule>(
            "INSERT INTO access_rules (role, user_id, domain, permissions, resources, created_by) \
             VALUES ($1, $2, $3, $4, $5, $6) \
             RETURNING *",
        )
        .bind(data.role)
        .bind(data.user_id)
        .bind(&data.domain)
        .bind(&data.permissions)
        .bind(&data.resources)
        .bind(&data.created_by)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_sqlx("Failed to create access rule", e))
    }

    async fn list(&self) -> AppResult<Vec<AccessRule>> {
        sqlx::query_as::<_, AccessRule>("SELECT * FROM access_rules ORDER BY seq")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| map_sqlx("Failed to list access rules", e))
    }

    async fn list_by_role(&self, role: UserRole) -> AppResult<Vec<AccessRule>> {
        sqlx::query_as::<_, AccessRule>("SELECT * FROM access_rules WHERE role = $1 ORDER BY seq")
            .bind(role)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| map_sqlx("Failed to list access rules by role", e))
    }
}
