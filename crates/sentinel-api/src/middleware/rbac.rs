//! Role gate helpers for route guarding.

use sentinel_auth::AuthContext;
use sentinel_core::result::AppResult;
use sentinel_entity::user::UserRole;

use crate::state::AppState;

/// Checks that the authenticated user has the Admin role.
pub fn require_admin(state: &AppState, ctx: &AuthContext) -> AppResult<()> {
    state.auth.guard.require_role(&ctx.user, UserRole::Admin)
}
