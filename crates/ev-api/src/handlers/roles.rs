//! Roles API handlers
//!
//! Role creation is admin-gated; listing is public.

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use ev_core::{role, Id};
use ev_db::RoleRow;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::{ApiError, ApiResult};
use crate::extractors::AuthenticatedUser;
use crate::AppState;

#[derive(Debug, Deserialize, Validate)]
pub struct RolePayload {
    #[validate(length(min = 1, max = 255))]
    pub name: String,
}

#[derive(Debug, Serialize)]
pub struct RoleResponse {
    pub id: Id,
    pub name: String,
}

impl From<RoleRow> for RoleResponse {
    fn from(row: RoleRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
        }
    }
}

/// POST /roles (admin only)
pub async fn create_role(
    State(state): State<AppState>,
    caller: AuthenticatedUser,
    Json(body): Json<RolePayload>,
) -> ApiResult<impl IntoResponse> {
    state.guard.require_role(&caller, role::ADMIN)?;
    body.validate()
        .map_err(|e| ApiError::bad_request(e.to_string()))?;

    let created = state.roles.create(&body.name).await?;
    Ok((StatusCode::CREATED, Json(RoleResponse::from(created))))
}

/// GET /roles
pub async fn list_roles(State(state): State<AppState>) -> ApiResult<Json<Vec<RoleResponse>>> {
    let roles = state.roles.find_all().await?;
    Ok(Json(roles.into_iter().map(RoleResponse::from).collect()))
}
