//! Administrative account and session management.

use serde::Serialize;
use serde_json::json;
use tracing::{info, warn};
use uuid::Uuid;

use sentinel_core::AppError;
use sentinel_core::result::AppResult;
use sentinel_core::types::{PageRequest, PageResponse};
use sentinel_entity::security_log::{CreateSecurityLogEntry, LogSeverity, SecurityLogEntry, SecurityLogFilter};
use sentinel_entity::session::Session;
use sentinel_entity::user::{UpdateUser, UserFilter, UserProfile};

use crate::audit::{SecurityAuditLog, actions};
use crate::context::{AuthContext, RequestMeta};
use crate::credentials::CredentialStore;
use crate::session::SessionLedger;

/// Number of audit entries shown on the dashboard.
const DASHBOARD_RECENT_ENTRIES: u32 = 10;

/// Headline numbers for the admin dashboard.
#[derive(Debug, Clone, Serialize)]
pub struct DashboardStats {
    /// Registered accounts.
    pub total_users: u64,
    /// Unrevoked, unexpired sessions.
    pub active_sessions: u64,
    /// Newest security log entries.
    pub recent_activity: Vec<SecurityLogEntry>,
}

/// Account administration. Every mutation is audited with the acting admin.
#[derive(Debug, Clone)]
pub struct UserAdministration {
    credentials: CredentialStore,
    ledger: SessionLedger,
    audit: SecurityAuditLog,
}

impl UserAdministration {
    /// Creates the administration service.
    pub fn new(credentials: CredentialStore, ledger: SessionLedger, audit: SecurityAuditLog) -> Self {
        Self {
            credentials,
            ledger,
            audit,
        }
    }

    /// Paginated user listing.
    pub async fn list_users(
        &self,
        filter: &UserFilter,
        page: &PageRequest,
    ) -> AppResult<PageResponse<UserProfile>> {
        Ok(self.credentials.list(filter, page).await?.map(|u| u.profile()))
    }

    /// One user's projection.
    pub async fn get_user(&self, id: Uuid) -> AppResult<UserProfile> {
        self.credentials
            .find_by_id(id)
            .await?
            .map(|u| u.profile())
            .ok_or_else(|| AppError::not_found("User not found"))
    }

    /// Edit email, full name or role.
    pub async fn update_user(
        &self,
        actor: &AuthContext,
        id: Uuid,
        data: UpdateUser,
        meta: &RequestMeta,
    ) -> AppResult<UserProfile> {
        let changed = json!({
            "user_id": id,
            "email": data.email.is_some(),
            "full_name": data.full_name.is_some(),
            "role": data.role,
        });
        let user = self.credentials.update_fields(id, data).await?;
        info!(admin_id = %actor.user_id(), user_id = %id, "User updated");
        self.audit
            .record(
                CreateSecurityLogEntry::new(LogSeverity::Info, actions::USER_UPDATED, actor.email())
                    .with_actor_id(actor.user_id())
                    .with_ip(meta.ip.clone())
                    .with_details(changed),
            )
            .await;
        Ok(user.profile())
    }

    /// Enable or disable an account. Disabling also revokes its sessions.
    pub async fn set_active(
        &self,
        actor: &AuthContext,
        id: Uuid,
        active: bool,
        meta: &RequestMeta,
    ) -> AppResult<UserProfile> {
        let user = self.credentials.set_active(id, active).await?;
        let revoked = if active {
            0
        } else {
            self.revoke_sessions(id).await
        };
        info!(admin_id = %actor.user_id(), user_id = %id, active, revoked, "User status changed");

        let (severity, action) = if active {
            (LogSeverity::Success, actions::USER_ACTIVATED)
        } else {
            (LogSeverity::Warning, actions::USER_DEACTIVATED)
        };
        self.audit
            .record(
                CreateSecurityLogEntry::new(severity, action, actor.email())
                    .with_actor_id(actor.user_id())
                    .with_ip(meta.ip.clone())
                    .with_details(json!({ "user_id": id, "email": user.email, "sessions_revoked": revoked })),
            )
            .await;
        Ok(user.profile())
    }

    /// Delete an account and revoke its sessions.
    pub async fn delete_user(&self, actor: &AuthContext, id: Uuid, meta: &RequestMeta) -> AppResult<()> {
        let email = self.get_user(id).await?.email;
        self.credentials.delete(id).await?;
        let revoked = self.revoke_sessions(id).await;
        info!(admin_id = %actor.user_id(), user_id = %id, revoked, "User deleted");
        self.audit
            .record(
                CreateSecurityLogEntry::new(LogSeverity::Danger, actions::USER_DELETED, actor.email())
                    .with_actor_id(actor.user_id())
                    .with_ip(meta.ip.clone())
                    .with_details(json!({ "user_id": id, "email": email, "sessions_revoked": revoked })),
            )
            .await;
        Ok(())
    }

    /// A user's live sessions.
    pub async fn user_sessions(&self, id: Uuid) -> AppResult<Vec<Session>> {
        self.get_user(id).await?;
        self.ledger.active_for_user(id).await
    }

    /// Revoke one session.
    pub async fn revoke_session(
        &self,
        actor: &AuthContext,
        session_id: Uuid,
        meta: &RequestMeta,
    ) -> AppResult<()> {
        let session = self
            .ledger
            .find(session_id)
            .await?
            .ok_or_else(|| AppError::not_found("Session not found"))?;
        let revoked = self.ledger.revoke(session_id).await?;
        info!(admin_id = %actor.user_id(), session_id = %session_id, revoked, "Session revoked");
        self.audit
            .record(
                CreateSecurityLogEntry::new(LogSeverity::Warning, actions::SESSION_REVOKED, actor.email())
                    .with_actor_id(actor.user_id())
                    .with_ip(meta.ip.clone())
                    .with_details(json!({ "session_id": session_id, "user_id": session.user_id })),
            )
            .await;
        Ok(())
    }

    /// Revoke all of a user's sessions after the account change is committed.
    /// Best-effort: the guard already refuses inactive or deleted users.
    async fn revoke_sessions(&self, id: Uuid) -> u64 {
        match self.ledger.revoke_all_for_user(id).await {
            Ok(revoked) => revoked,
            Err(e) => {
                warn!(user_id = %id, error = %e, "Failed to revoke user sessions");
                0
            }
        }
    }

    /// Dashboard counters and the latest audit entries.
    pub async fn dashboard(&self) -> AppResult<DashboardStats> {
        let filter = SecurityLogFilter::default();
        let (total_users, active_sessions, recent_activity) = tokio::try_join!(
            self.credentials.count(),
            self.ledger.count_active(),
            self.audit.recent(&filter, Some(DASHBOARD_RECENT_ENTRIES)),
        )?;
        Ok(DashboardStats {
            total_users,
            active_sessions,
            recent_activity,
        })
    }

    /// Security log query.
    pub async fn security_log(
        &self,
        filter: &SecurityLogFilter,
        limit: Option<u32>,
    ) -> AppResult<Vec<SecurityLogEntry>> {
        self.audit.recent(filter, limit).await
    }
}
