//! In-memory security log.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use sentinel_core::result::AppResult;
use sentinel_entity::security_log::{CreateSecurityLogEntry, SecurityLogEntry, SecurityLogFilter};

use crate::store::SecurityLogStore;

/// [`SecurityLogStore`] over a process-local, append-only vector.
#[derive(Debug, Clone, Default)]
pub struct MemorySecurityLogStore {
    entries: Arc<RwLock<Vec<SecurityLogEntry>>>,
}

impl MemorySecurityLogStore {
    /// Create an empty log.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SecurityLogStore for MemorySecurityLogStore {
    async fn append(&self, entry: &CreateSecurityLogEntry) -> AppResult<SecurityLogEntry> {
        let stored = SecurityLogEntry {
            id: Uuid::new_v4(),
            severity: entry.severity,
            action: entry.action.clone(),
            actor: entry.actor.clone(),
            actor_id: entry.actor_id,
            ip: entry.ip.clone(),
            details: entry.details.clone(),
            domain: entry.domain.clone(),
            timestamp: Utc::now(),
        };
        self.entries.write().await.push(stored.clone());
        Ok(stored)
    }

    async fn recent(&self, filter: &SecurityLogFilter, limit: u32) -> AppResult<Vec<SecurityLogEntry>> {
        // Appends are chronological, so reverse order is newest first.
        Ok(self
            .entries
            .read()
            .await
            .iter()
            .rev()
            .filter(|e| filter.matches(e))
            .take(limit as usize)
            .cloned()
            .collect())
    }
}
