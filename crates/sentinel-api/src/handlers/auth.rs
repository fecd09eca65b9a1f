//! Auth handlers: register, login, me, logout, forgot-password.

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;

use sentinel_entity::user::UserProfile;

use crate::dto::request::{ForgotPasswordRequest, LoginRequest, RegisterRequest};
use crate::dto::response::{ApiResponse, MessageResponse, TokenResponse};
use crate::error::ApiResult;
use crate::extractors::{AuthUser, ClientMeta, ValidatedJson};
use crate::state::AppState;

/// Reply to every password reset request, known email or not.
pub const PASSWORD_RESET_MESSAGE: &str =
    "If an account exists for this email, password reset instructions have been sent";

/// POST /api/auth/register
pub async fn register(
    State(state): State<AppState>,
    meta: ClientMeta,
    ValidatedJson(req): ValidatedJson<RegisterRequest>,
) -> ApiResult<(StatusCode, Json<ApiResponse<TokenResponse>>)> {
    let grant = state
        .auth
        .sessions
        .register(&req.email, &req.password, &req.full_name, req.role, &meta)
        .await?;

    Ok((StatusCode::CREATED, Json(ApiResponse::ok(grant.into()))))
}

/// POST /api/auth/login
pub async fn login(
    State(state): State<AppState>,
    meta: ClientMeta,
    ValidatedJson(req): ValidatedJson<LoginRequest>,
) -> ApiResult<Json<ApiResponse<TokenResponse>>> {
    let grant = state
        .auth
        .sessions
        .login(&req.email, &req.password, &meta)
        .await?;

    Ok(Json(ApiResponse::ok(grant.into())))
}

/// GET /api/auth/me
pub async fn me(auth: AuthUser) -> Json<ApiResponse<UserProfile>> {
    Json(ApiResponse::ok(auth.profile()))
}

/// POST /api/auth/logout
pub async fn logout(
    State(state): State<AppState>,
    auth: AuthUser,
    meta: ClientMeta,
) -> ApiResult<Json<ApiResponse<MessageResponse>>> {
    state.auth.sessions.logout(&auth, &meta).await?;
    Ok(Json(ApiResponse::ok(MessageResponse::new(
        "Logged out successfully",
    ))))
}

/// POST /api/auth/forgot-password
pub async fn forgot_password(
    State(state): State<AppState>,
    meta: ClientMeta,
    ValidatedJson(req): ValidatedJson<ForgotPasswordRequest>,
) -> ApiResult<Json<ApiResponse<MessageResponse>>> {
    state
        .auth
        .sessions
        .request_password_reset(&req.email, &meta)
        .await?;
    Ok(Json(ApiResponse::ok(MessageResponse::new(
        PASSWORD_RESET_MESSAGE,
    ))))
}
