//! Events API handlers
//!
//! Creation is admin-only and the organizer is the caller; updates and
//! deletion require the organizer or an admin.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::{DateTime, Utc};
use ev_core::{role, Id};
use ev_db::{CreateEventDto, EventWithOrganizer, UpdateEventDto};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::{ApiError, ApiResult};
use crate::extractors::AuthenticatedUser;
use crate::AppState;

#[derive(Debug, Deserialize, Validate)]
pub struct EventPayload {
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    #[validate(length(min = 1))]
    pub description: String,
    pub date: DateTime<Utc>,
    #[validate(length(min = 1, max = 255))]
    pub location: String,
}

#[derive(Debug, Serialize)]
pub struct EventResponse {
    pub id: Id,
    pub name: String,
    pub description: String,
    pub date: DateTime<Utc>,
    pub location: String,
    pub organizer_id: Id,
    pub organizer_name: String,
}

impl From<EventWithOrganizer> for EventResponse {
    fn from(row: EventWithOrganizer) -> Self {
        Self {
            id: row.id,
            name: row.name,
            description: row.description,
            date: row.date,
            location: row.location,
            organizer_id: row.organizer_id,
            organizer_name: row.organizer_name,
        }
    }
}

/// POST /events (admin only; the caller becomes the organizer)
pub async fn create_event(
    State(state): State<AppState>,
    caller: AuthenticatedUser,
    Json(body): Json<EventPayload>,
) -> ApiResult<impl IntoResponse> {
    state.guard.require_role(&caller, role::ADMIN)?;
    body.validate()
        .map_err(|e| ApiError::bad_request(e.to_string()))?;

    let event = state
        .events
        .create(CreateEventDto {
            name: body.name,
            description: body.description,
            date: body.date,
            location: body.location,
            organizer_id: caller.0.id,
        })
        .await?;

    tracing::info!(event_id = event.id, organizer_id = caller.0.id, "event created");

    Ok((StatusCode::CREATED, Json(EventResponse::from(event))))
}

/// GET /events
pub async fn list_events(State(state): State<AppState>) -> ApiResult<Json<Vec<EventResponse>>> {
    let events = state.events.find_all_with_organizer().await?;
    Ok(Json(events.into_iter().map(EventResponse::from).collect()))
}

/// PUT /events/:id (organizer or admin)
pub async fn update_event(
    State(state): State<AppState>,
    caller: AuthenticatedUser,
    Path(event_id): Path<Id>,
    Json(body): Json<EventPayload>,
) -> ApiResult<Json<EventResponse>> {
    state.guard.require_owner_or_admin(event_id, &caller).await?;
    body.validate()
        .map_err(|e| ApiError::bad_request(e.to_string()))?;

    let updated = state
        .events
        .update(
            event_id,
            UpdateEventDto {
                name: body.name,
                description: body.description,
                date: body.date,
                location: body.location,
            },
        )
        .await?;

    Ok(Json(EventResponse::from(updated)))
}

/// DELETE /events/:id (organizer or admin)
pub async fn delete_event(
    State(state): State<AppState>,
    caller: AuthenticatedUser,
    Path(event_id): Path<Id>,
) -> ApiResult<StatusCode> {
    state.guard.require_owner_or_admin(event_id, &caller).await?;
    state.events.delete(event_id).await?;

    tracing::info!(event_id, caller_id = caller.0.id, "event deleted");

    Ok(StatusCode::NO_CONTENT)
}

/// POST /events/:id/registrations — the caller registers as a participant.
pub async fn register_participant(
    State(state): State<AppState>,
    caller: AuthenticatedUser,
    Path(event_id): Path<Id>,
) -> ApiResult<StatusCode> {
    if state.events.find_with_organizer(event_id).await?.is_none() {
        return Err(ApiError::NotFound { resource: "event" });
    }

    state.events.add_participant(event_id, caller.0.id).await?;
    Ok(StatusCode::NO_CONTENT)
}
