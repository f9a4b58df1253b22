//! Users API handlers

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use ev_core::{role, Id};
use ev_db::{CreateUserDto, UserRow};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::{ApiError, ApiResult};
use crate::handlers::events::EventResponse;
use crate::AppState;

#[derive(Debug, Deserialize, Validate)]
pub struct CreateUserRequest {
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1))]
    pub password: String,
    /// Optional role assignment; defaults to the `usuario` role.
    pub role_id: Option<Id>,
}

/// User as exposed over the API. The digest never leaves the database layer.
#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: Id,
    pub name: String,
    pub email: String,
    pub role_id: Id,
    pub role: String,
}

impl From<UserRow> for UserResponse {
    fn from(row: UserRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            email: row.email,
            role_id: row.role_id,
            role: row.role,
        }
    }
}

/// Open registration endpoint.
///
/// POST /users
pub async fn create_user(
    State(state): State<AppState>,
    Json(body): Json<CreateUserRequest>,
) -> ApiResult<impl IntoResponse> {
    body.validate()
        .map_err(|e| ApiError::bad_request(e.to_string()))?;

    let role_id = match body.role_id {
        Some(id) => {
            state
                .roles
                .find_by_id(id)
                .await?
                .ok_or(ApiError::NotFound { resource: "role" })?
                .id
        }
        None => state
            .roles
            .find_by_name(role::USER)
            .await?
            .ok_or_else(|| {
                ApiError::bad_request(format!("default role '{}' is missing", role::USER))
            })?
            .id,
    };

    let digest = state
        .hasher
        .hash(&body.password)
        .map_err(|e| ApiError::Internal(e.to_string()))?;

    let user = state
        .users
        .create_user(CreateUserDto {
            name: body.name,
            email: body.email,
            password_digest: digest,
            role_id,
        })
        .await?;

    tracing::info!(user_id = user.id, "user registered");

    Ok((StatusCode::CREATED, Json(UserResponse::from(user))))
}

/// GET /users
pub async fn list_users(State(state): State<AppState>) -> ApiResult<Json<Vec<UserResponse>>> {
    let users = state.users.find_all().await?;
    Ok(Json(users.into_iter().map(UserResponse::from).collect()))
}

/// Events the user is registered for.
///
/// GET /users/:id/events
pub async fn user_events(
    State(state): State<AppState>,
    Path(user_id): Path<Id>,
) -> ApiResult<Json<Vec<EventResponse>>> {
    if state.users.find_user_by_id(user_id).await?.is_none() {
        return Err(ApiError::NotFound { resource: "user" });
    }

    let events = state.users.registered_events(user_id).await?;
    Ok(Json(events.into_iter().map(EventResponse::from).collect()))
}
