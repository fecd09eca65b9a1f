//! `AuthUser` and `AdminUser` extractors: pull the bearer token from the
//! Authorization header, resolve it through the guard, and inject the context.

use axum::extract::FromRequestParts;
use axum::http::header;
use axum::http::request::Parts;

use sentinel_auth::AuthContext;
use sentinel_core::error::AppError;

use crate::error::ApiError;
use crate::middleware::rbac::require_admin;
use crate::state::AppState;

/// Authenticated caller available in handlers.
#[derive(Debug, Clone)]
pub struct AuthUser(pub AuthContext);

impl std::ops::Deref for AuthUser {
    type Target = AuthContext;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

/// The raw token of a `Bearer` Authorization header.
pub fn bearer_token(parts: &Parts) -> Option<&str> {
    let value = parts.headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }
    let token = token.trim();
    (!token.is_empty()).then_some(token)
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts).ok_or_else(AppError::unauthenticated)?;
        let ctx = state.auth.guard.authenticate(token).await?;
        Ok(AuthUser(ctx))
    }
}

/// Authenticated caller holding the `admin` role.
#[derive(Debug, Clone)]
pub struct AdminUser(pub AuthContext);

impl std::ops::Deref for AdminUser {
    type Target = AuthContext;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl FromRequestParts<AppState> for AdminUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let AuthUser(ctx) = AuthUser::from_request_parts(parts, state).await?;
        require_admin(state, &ctx)?;
        Ok(AdminUser(ctx))
    }
}
