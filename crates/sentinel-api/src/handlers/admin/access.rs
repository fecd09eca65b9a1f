//! Access control rule handlers.

use axum::Json;
use axum::extract::{Query, State};
use axum::http::StatusCode;

use sentinel_entity::access_rule::AccessRule;

use crate::dto::request::{AccessRuleQuery, CreateAccessRuleRequest};
use crate::dto::response::ApiResponse;
use crate::error::ApiResult;
use crate::extractors::{AdminUser, ClientMeta, ValidatedJson};
use crate::state::AppState;

/// GET /api/admin/access-control
pub async fn list_rules(
    State(state): State<AppState>,
    _admin: AdminUser,
    Query(query): Query<AccessRuleQuery>,
) -> ApiResult<Json<ApiResponse<Vec<AccessRule>>>> {
    let rules = match query.role {
        Some(role) => state.auth.access.rules_for_role(role).await?,
        None => state.auth.access.list_rules().await?,
    };
    Ok(Json(ApiResponse::ok(rules)))
}

/// POST /api/admin/access-control
pub async fn create_rule(
    State(state): State<AppState>,
    admin: AdminUser,
    meta: ClientMeta,
    ValidatedJson(req): ValidatedJson<CreateAccessRuleRequest>,
) -> ApiResult<(StatusCode, Json<ApiResponse<AccessRule>>)> {
    let rule = state
        .auth
        .access
        .create_rule(&admin, req.into(), &meta)
        .await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(rule))))
}
