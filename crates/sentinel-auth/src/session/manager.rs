//! Session lifecycle manager: login, registration, logout, password reset request.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::json;
use tracing::{error, info, warn};
use uuid::Uuid;

use sentinel_core::error::ErrorKind;
use sentinel_core::result::AppResult;
use sentinel_entity::security_log::{CreateSecurityLogEntry, LogSeverity};
use sentinel_entity::user::{User, UserProfile, UserRole};

use crate::audit::{SecurityAuditLog, actions};
use crate::context::{AuthContext, RequestMeta};
use crate::credentials::{CredentialStore, normalize_email};
use crate::jwt::JwtEncoder;

use super::ledger::SessionLedger;

/// Token and projection handed back after login or registration.
#[derive(Clone, Serialize)]
pub struct AuthGrant {
    /// Bearer token.
    pub access_token: String,
    /// Always `"bearer"`.
    pub token_type: &'static str,
    /// Absolute token expiry.
    pub expires_at: DateTime<Utc>,
    /// Session the token is recorded under.
    pub session_id: Uuid,
    /// Public projection of the user.
    pub user: UserProfile,
}

impl std::fmt::Debug for AuthGrant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthGrant")
            .field("access_token", &"[REDACTED]")
            .field("expires_at", &self.expires_at)
            .field("session_id", &self.session_id)
            .field("user", &self.user)
            .finish()
    }
}

/// Orchestrates the credential store, token authority, session ledger and
/// audit log. Side effects happen in that order; the audit append is last
/// and never changes the outcome.
#[derive(Debug, Clone)]
pub struct SessionManager {
    credentials: CredentialStore,
    encoder: Arc<JwtEncoder>,
    ledger: SessionLedger,
    audit: SecurityAuditLog,
}

impl SessionManager {
    /// Creates a new session manager.
    pub fn new(
        credentials: CredentialStore,
        encoder: Arc<JwtEncoder>,
        ledger: SessionLedger,
        audit: SecurityAuditLog,
    ) -> Self {
        Self {
            credentials,
            encoder,
            ledger,
            audit,
        }
    }

    /// Authenticate with email and password and open a session.
    ///
    /// Rejections are audited as `login_failed` with the attempted email;
    /// the error the caller sees is unchanged.
    pub async fn login(&self, email: &str, password: &str, meta: &RequestMeta) -> AppResult<AuthGrant> {
        let user = match self.credentials.verify_credentials(email, password).await {
            Ok(user) => user,
            Err(e) if e.is(ErrorKind::InvalidCredentials) || e.is(ErrorKind::AccountDeactivated) => {
                warn!(reason = %e.kind, "Login rejected");
                self.audit
                    .record(
                        CreateSecurityLogEntry::new(
                            LogSeverity::Warning,
                            actions::LOGIN_FAILED,
                            normalize_email(email),
                        )
                        .with_ip(meta.ip.clone())
                        .with_details(json!({ "reason": e.kind.to_string() })),
                    )
                    .await;
                return Err(e);
            }
            Err(e) => return Err(e),
        };

        let grant = self.open_session(&user, meta).await?;
        self.credentials.touch_last_login(user.id).await;

        info!(user_id = %user.id, session_id = %grant.session_id, "Login successful");
        self.audit
            .record(
                CreateSecurityLogEntry::new(LogSeverity::Success, actions::LOGIN, &user.email)
                    .with_actor_id(user.id)
                    .with_ip(meta.ip.clone()),
            )
            .await;
        Ok(grant)
    }

    /// Create an account and open its first session.
    ///
    /// If the session cannot be recorded the new account is removed again,
    /// so a failed registration leaves nothing behind.
    pub async fn register(
        &self,
        email: &str,
        password: &str,
        full_name: &str,
        role: UserRole,
        meta: &RequestMeta,
    ) -> AppResult<AuthGrant> {
        let user = self.credentials.register(email, password, full_name, role).await?;

        let grant = match self.open_session(&user, meta).await {
            Ok(grant) => grant,
            Err(e) => {
                error!(user_id = %user.id, error = %e, "Registration rolled back: session not recorded");
                if let Err(rollback) = self.credentials.delete(user.id).await {
                    error!(user_id = %user.id, error = %rollback, "Failed to roll back registration");
                }
                return Err(e);
            }
        };

        self.audit
            .record(
                CreateSecurityLogEntry::new(LogSeverity::Success, actions::REGISTER, &user.email)
                    .with_actor_id(user.id)
                    .with_ip(meta.ip.clone())
                    .with_details(json!({ "role": user.role })),
            )
            .await;
        Ok(grant)
    }

    /// End the caller's session.
    pub async fn logout(&self, ctx: &AuthContext, meta: &RequestMeta) -> AppResult<()> {
        self.ledger.revoke(ctx.session_id).await?;
        info!(user_id = %ctx.user_id(), session_id = %ctx.session_id, "Logged out");
        self.audit
            .record(
                CreateSecurityLogEntry::new(LogSeverity::Info, actions::LOGOUT, ctx.email())
                    .with_actor_id(ctx.user_id())
                    .with_ip(meta.ip.clone()),
            )
            .await;
        Ok(())
    }

    /// Note a password reset request. No token is generated or delivered,
    /// and the outcome is the same whether or not the email is registered.
    pub async fn request_password_reset(&self, email: &str, meta: &RequestMeta) -> AppResult<()> {
        if let Some(user) = self.credentials.find_by_email(email).await? {
            self.audit
                .record(
                    CreateSecurityLogEntry::new(
                        LogSeverity::Info,
                        actions::PASSWORD_RESET_REQUEST,
                        &user.email,
                    )
                    .with_actor_id(user.id)
                    .with_ip(meta.ip.clone()),
                )
                .await;
        }
        Ok(())
    }

    async fn open_session(&self, user: &User, meta: &RequestMeta) -> AppResult<AuthGrant> {
        let session_id = Uuid::new_v4();
        let issued = self.encoder.issue_default(&user.email, session_id)?;
        self.ledger
            .record(session_id, user.id, &issued.token, issued.expires_at(), meta)
            .await?;

        Ok(AuthGrant {
            expires_at: issued.expires_at(),
            access_token: issued.token,
            token_type: "bearer",
            session_id,
            user: user.profile(),
        })
    }
}
