//! Admin user management handlers.

use axum::Json;
use axum::extract::{Path, Query, State};
use uuid::Uuid;

use sentinel_core::types::pagination::PageResponse;
use sentinel_entity::user::UserProfile;

use crate::dto::request::{SetActiveRequest, UpdateUserRequest, UserListQuery};
use crate::dto::response::{ApiResponse, MessageResponse, SessionResponse};
use crate::error::ApiResult;
use crate::extractors::{AdminUser, ClientMeta, PaginationParams, ValidatedJson};
use crate::state::AppState;

/// GET /api/admin/users
pub async fn list_users(
    State(state): State<AppState>,
    _admin: AdminUser,
    Query(params): Query<PaginationParams>,
    Query(query): Query<UserListQuery>,
) -> ApiResult<Json<ApiResponse<PageResponse<UserProfile>>>> {
    let page = state
        .auth
        .admin
        .list_users(&query.into(), &params.into_page_request())
        .await?;
    Ok(Json(ApiResponse::ok(page)))
}

/// GET /api/admin/users/{id}
pub async fn get_user(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<ApiResponse<UserProfile>>> {
    let user = state.auth.admin.get_user(id).await?;
    Ok(Json(ApiResponse::ok(user)))
}

/// PUT /api/admin/users/{id}
pub async fn update_user(
    State(state): State<AppState>,
    admin: AdminUser,
    meta: ClientMeta,
    Path(id): Path<Uuid>,
    ValidatedJson(req): ValidatedJson<UpdateUserRequest>,
) -> ApiResult<Json<ApiResponse<UserProfile>>> {
    let user = state
        .auth
        .admin
        .update_user(&admin, id, req.into(), &meta)
        .await?;
    Ok(Json(ApiResponse::ok(user)))
}

/// PUT /api/admin/users/{id}/status
pub async fn set_status(
    State(state): State<AppState>,
    admin: AdminUser,
    meta: ClientMeta,
    Path(id): Path<Uuid>,
    ValidatedJson(req): ValidatedJson<SetActiveRequest>,
) -> ApiResult<Json<ApiResponse<UserProfile>>> {
    let user = state
        .auth
        .admin
        .set_active(&admin, id, req.is_active, &meta)
        .await?;
    Ok(Json(ApiResponse::ok(user)))
}

/// DELETE /api/admin/users/{id}
pub async fn delete_user(
    State(state): State<AppState>,
    admin: AdminUser,
    meta: ClientMeta,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<ApiResponse<MessageResponse>>> {
    state.auth.admin.delete_user(&admin, id, &meta).await?;
    Ok(Json(ApiResponse::ok(MessageResponse::new("User deleted"))))
}

/// GET /api/admin/users/{id}/sessions
pub async fn user_sessions(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<ApiResponse<Vec<SessionResponse>>>> {
    let sessions = state.auth.admin.user_sessions(id).await?;
    Ok(Json(ApiResponse::ok(
        sessions.into_iter().map(SessionResponse::from).collect(),
    )))
}
