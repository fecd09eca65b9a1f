//! Access control rule administration.
//!
//! Rules are recorded and listed only; the role gate does not consult them.

use std::sync::Arc;
use std::time::Duration;

use serde_json::json;
use tracing::info;

use sentinel_core::AppError;
use sentinel_core::result::AppResult;
use sentinel_database::{AccessRuleStore, Stores, bounded};
use sentinel_entity::access_rule::{AccessRule, CreateAccessRule};
use sentinel_entity::security_log::{CreateSecurityLogEntry, LogSeverity};
use sentinel_entity::user::UserRole;

use crate::audit::{SecurityAuditLog, actions};
use crate::context::{AuthContext, RequestMeta};

/// Administers the additive access rule set.
#[derive(Debug, Clone)]
pub struct AccessControl {
    rules: Arc<dyn AccessRuleStore>,
    audit: SecurityAuditLog,
    timeout: Duration,
}

impl AccessControl {
    /// Creates the access control service.
    pub fn new(stores: &Stores, audit: SecurityAuditLog) -> Self {
        Self {
            rules: Arc::clone(&stores.access_rules),
            audit,
            timeout: stores.operation_timeout,
        }
    }

    /// Append a rule authored by `actor`. Identical rules are not merged.
    pub async fn create_rule(
        &self,
        actor: &AuthContext,
        rule: CreateAccessRule,
        meta: &RequestMeta,
    ) -> AppResult<AccessRule> {
        let rule = CreateAccessRule {
            created_by: actor.email().to_string(),
            ..rule
        }
        .normalized();
        if !rule.has_subject() {
            return Err(AppError::validation("A rule must target a role or a user"));
        }
        if rule.permissions.is_empty() {
            return Err(AppError::validation("A rule must grant at least one permission"));
        }

        let created = bounded(self.timeout, "access_rules.insert", self.rules.insert(&rule)).await?;
        info!(rule_id = %created.id, admin_id = %actor.user_id(), "Access rule created");

        let mut entry = CreateSecurityLogEntry::new(
            LogSeverity::Info,
            actions::ACCESS_RULE_CREATED,
            actor.email(),
        )
        .with_actor_id(actor.user_id())
        .with_ip(meta.ip.clone())
        .with_details(json!({
            "rule_id": created.id,
            "role": created.role,
            "user_id": created.user_id,
            "permissions": created.permissions,
            "resources": created.resources,
        }));
        if let Some(domain) = &created.domain {
            entry = entry.with_domain(domain.clone());
        }
        self.audit.record(entry).await;
        Ok(created)
    }

    /// Every rule in creation order.
    pub async fn list_rules(&self) -> AppResult<Vec<AccessRule>> {
        bounded(self.timeout, "access_rules.list", self.rules.list()).await
    }

    /// Rules targeting `role`, in creation order.
    pub async fn rules_for_role(&self, role: UserRole) -> AppResult<Vec<AccessRule>> {
        bounded(self.timeout, "access_rules.list_by_role", self.rules.list_by_role(role)).await
    }
}
