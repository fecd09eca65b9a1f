//! Admin dashboard handler.

use axum::Json;
use axum::extract::State;

use sentinel_auth::DashboardStats;

use crate::dto::response::ApiResponse;
use crate::error::ApiResult;
use crate::extractors::AdminUser;
use crate::state::AppState;

/// GET /api/admin/dashboard
pub async fn dashboard(
    State(state): State<AppState>,
    _admin: AdminUser,
) -> ApiResult<Json<ApiResponse<DashboardStats>>> {
    let stats = state.auth.admin.dashboard().await?;
    Ok(Json(ApiResponse::ok(stats)))
}
