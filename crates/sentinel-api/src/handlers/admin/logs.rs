//! Security log handler.

use axum::Json;
use axum::extract::{Query, State};

use sentinel_entity::security_log::SecurityLogEntry;

use crate::dto::request::LogQuery;
use crate::dto::response::ApiResponse;
use crate::error::ApiResult;
use crate::extractors::AdminUser;
use crate::state::AppState;

/// GET /api/admin/logs
pub async fn list_logs(
    State(state): State<AppState>,
    _admin: AdminUser,
    Query(query): Query<LogQuery>,
) -> ApiResult<Json<ApiResponse<Vec<SecurityLogEntry>>>> {
    let entries = state
        .auth
        .admin
        .security_log(&query.filter(), query.limit)
        .await?;
    Ok(Json(ApiResponse::ok(entries)))
}
