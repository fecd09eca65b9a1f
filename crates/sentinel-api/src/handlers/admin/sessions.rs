//! Admin session handlers.

use axum::Json;
use axum::extract::{Path, State};
use uuid::Uuid;

use crate::dto::response::{ApiResponse, MessageResponse};
use crate::error::ApiResult;
use crate::extractors::{AdminUser, ClientMeta};
use crate::state::AppState;

/// POST /api/admin/sessions/{id}/revoke
pub async fn revoke_session(
    State(state): State<AppState>,
    admin: AdminUser,
    meta: ClientMeta,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<ApiResponse<MessageResponse>>> {
    state.auth.admin.revoke_session(&admin, id, &meta).await?;
    Ok(Json(ApiResponse::ok(MessageResponse::new("Session revoked"))))
}
