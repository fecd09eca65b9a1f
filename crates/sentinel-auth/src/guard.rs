//! Authorization guard: bearer token to user, plus the role gate.

use std::sync::Arc;
use std::time::Duration;

use tracing::debug;

use sentinel_core::AppError;
use sentinel_core::result::AppResult;
use sentinel_database::{Stores, UserStore, bounded};
use sentinel_entity::user::{User, UserProfile, UserRole};

use crate::context::AuthContext;
use crate::jwt::JwtDecoder;
use crate::session::SessionLedger;

/// Resolves bearer tokens to active users and enforces role requirements.
///
/// Every call re-reads the session and the user, so revocation and
/// deactivation take effect on the next request.
#[derive(Debug, Clone)]
pub struct AuthorizationGuard {
    decoder: Arc<JwtDecoder>,
    ledger: SessionLedger,
    users: Arc<dyn UserStore>,
    timeout: Duration,
}

impl AuthorizationGuard {
    /// Creates a guard.
    pub fn new(decoder: Arc<JwtDecoder>, ledger: SessionLedger, stores: &Stores) -> Self {
        Self {
            decoder,
            ledger,
            users: Arc::clone(&stores.users),
            timeout: stores.operation_timeout,
        }
    }

    /// Resolve a bearer token.
    ///
    /// Every failure is `Unauthenticated` with the same message: bad token,
    /// unknown or revoked session, deleted user, or deactivated user.
    /// Store timeouts surface as `Transient`.
    pub async fn authenticate(&self, token: &str) -> AppResult<AuthContext> {
        let claims = self.decoder.verify(token)?;
        let session = self.ledger.validate(&claims, token).await?;

        let user = bounded(
            self.timeout,
            "users.find_by_email",
            self.users.find_by_email(&claims.sub),
        )
        .await?
        .ok_or_else(|| {
            debug!(session_id = %session.id, "Token subject no longer exists");
            AppError::unauthenticated()
        })?;

        if user.id != session.user_id {
            debug!(session_id = %session.id, "Session belongs to a different account");
            return Err(AppError::unauthenticated());
        }
        if !user.is_active {
            debug!(user_id = %user.id, "Token presented for deactivated account");
            return Err(AppError::unauthenticated());
        }

        Ok(AuthContext {
            user,
            session_id: session.id,
            claims,
        })
    }

    /// Roles are compared by equality.
    pub fn require_role(&self, user: &User, role: UserRole) -> AppResult<()> {
        if user.role == role {
            Ok(())
        } else {
            debug!(user_id = %user.id, required = %role, actual = %user.role, "Role gate denied");
            Err(AppError::forbidden(format!("Requires {role} role")))
        }
    }

    /// [`authenticate`](Self::authenticate) then [`require_role`](Self::require_role).
    pub async fn authorize(&self, token: &str, role: UserRole) -> AppResult<UserProfile> {
        let ctx = self.authenticate(token).await?;
        self.require_role(&ctx.user, role)?;
        Ok(ctx.profile())
    }
}
