//! Security log repository implementation.

use async_trait::async_trait;
use sqlx::{PgPool, Postgres, QueryBuilder};

use sentinel_core::result::AppResult;
use sentinel_entity::security_log::{CreateSecurityLogEntry, SecurityLogEntry, SecurityLogFilter};

use super::map_sqlx;
use crate::store::SecurityLogStore;

/// PostgreSQL-backed [`SecurityLogStore`]. Rows are only ever inserted.
#[derive(Debug, Clone)]
pub struct SecurityLogRepository {
    pool: PgPool,
}

impl SecurityLogRepository {
    /// Create a new security log repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SecurityLogStore for SecurityLogRepository {
    async fn append(&self, entry: &CreateSecurityLogEntry) -> AppResult<SecurityLogEntry> {
        sqlx::query_as::<_, SecurityLogEntry>(
            "INSERT INTO security_log (severity, action, actor, actor_id, ip, details, domain) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) \
             RETURNING *",
        )
        .bind(entry.severity)
        .bind(&entry.action)
        .bind(&entry.actor)
        .bind(entry.actor_id)
        .bind(&entry.ip)
        .bind(&entry.details)
        .bind(&entry.domain)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_sqlx("Failed to append security log entry", e))
    }

    async fn recent(&self, filter: &SecurityLogFilter, limit: u32) -> AppResult<Vec<SecurityLogEntry>> {
        let mut qb = QueryBuilder::<Postgres>::new("SELECT * FROM security_log WHERE TRUE");
        if let Some(severity) = filter.severity {
            qb.push(" AND severity = ").push_bind(severity);
        }
        if let Some(actor) = filter.actor.as_deref() {
            qb.push(" AND LOWER(actor) = LOWER(")
                .push_bind(actor.to_string())
                .push(")");
        }
        qb.push(" ORDER BY timestamp DESC LIMIT ")
            .push_bind(i64::from(limit));

        qb.build_query_as::<SecurityLogEntry>()
            .fetch_all(&self.pool)
            .await
            .map_err(|e| map_sqlx("Failed to read security log", e))
    }
}
