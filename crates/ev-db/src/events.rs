//! Event repository
//!
//! Database operations for events and the participant many-to-many table.
//! Listings join the organizer's display name. Participant registration is
//! idempotent; the composite primary key rules out duplicate membership.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use ev_auth::{EventRef, EventStore, StoreError};
use ev_core::Id;
use sqlx::{FromRow, SqlitePool};

use crate::repository::{RepositoryError, RepositoryResult};

/// Event database entity
#[derive(Debug, Clone, FromRow)]
pub struct EventRow {
    pub id: Id,
    pub name: String,
    pub description: String,
    pub date: DateTime<Utc>,
    pub location: String,
    pub organizer_id: Id,
}

/// Event with the organizer's display name joined in.
#[derive(Debug, Clone, FromRow)]
pub struct EventWithOrganizer {
    pub id: Id,
    pub name: String,
    pub description: String,
    pub date: DateTime<Utc>,
    pub location: String,
    pub organizer_id: Id,
    pub organizer_name: String,
}

/// DTO for creating an event
#[derive(Debug, Clone)]
pub struct CreateEventDto {
    pub name: String,
    pub description: String,
    pub date: DateTime<Utc>,
    pub location: String,
    pub organizer_id: Id,
}

/// DTO for updating an event. Full replacement; the organizer never changes.
#[derive(Debug, Clone)]
pub struct UpdateEventDto {
    pub name: String,
    pub description: String,
    pub date: DateTime<Utc>,
    pub location: String,
}

const SELECT_WITH_ORGANIZER: &str = r#"
    SELECT e.id, e.name, e.description, e.date, e.location,
           e.organizer_id, o.name AS organizer_name
    FROM events e
    JOIN users o ON o.id = e.organizer_id
"#;

/// Event repository implementation
#[derive(Clone)]
pub struct EventRepository {
    pool: SqlitePool,
}

impl EventRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, dto: CreateEventDto) -> RepositoryResult<EventWithOrganizer> {
        let result = sqlx::query(
            "INSERT INTO events (name, description, date, location, organizer_id) \
             VALUES (?, ?, ?, ?, ?)",
        )
        .bind(&dto.name)
        .bind(&dto.description)
        .bind(dto.date)
        .bind(&dto.location)
        .bind(dto.organizer_id)
        .execute(&self.pool)
        .await?;

        let id = result.last_insert_rowid();
        self.find_with_organizer(id)
            .await?
            .ok_or_else(|| RepositoryError::NotFound(format!("event {} after insert", id)))
    }

    pub async fn find_with_organizer(&self, id: Id) -> RepositoryResult<Option<EventWithOrganizer>> {
        let row = sqlx::query_as::<_, EventWithOrganizer>(&format!(
            "{} WHERE e.id = ?",
            SELECT_WITH_ORGANIZER
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    pub async fn find_all_with_organizer(&self) -> RepositoryResult<Vec<EventWithOrganizer>> {
        let rows = sqlx::query_as::<_, EventWithOrganizer>(&format!(
            "{} ORDER BY e.date ASC",
            SELECT_WITH_ORGANIZER
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    pub async fn update(&self, id: Id, dto: UpdateEventDto) -> RepositoryResult<EventWithOrganizer> {
        let result = sqlx::query(
            "UPDATE events SET name = ?, description = ?, date = ?, location = ? WHERE id = ?",
        )
        .bind(&dto.name)
        .bind(&dto.description)
        .bind(dto.date)
        .bind(&dto.location)
        .bind(id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound(format!("event {}", id)));
        }

        self.find_with_organizer(id)
            .await?
            .ok_or_else(|| RepositoryError::NotFound(format!("event {}", id)))
    }

    pub async fn delete(&self, id: Id) -> RepositoryResult<()> {
        let result = sqlx::query("DELETE FROM events WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound(format!("event {}", id)));
        }

        Ok(())
    }

    /// Register a participant. Idempotent.
    pub async fn add_participant(&self, event_id: Id, user_id: Id) -> RepositoryResult<()> {
        sqlx::query("INSERT OR IGNORE INTO event_participants (event_id, user_id) VALUES (?, ?)")
            .bind(event_id)
            .bind(user_id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    pub async fn participant_count(&self, event_id: Id) -> RepositoryResult<i64> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM event_participants WHERE event_id = ?")
                .bind(event_id)
                .fetch_one(&self.pool)
                .await?;

        Ok(count)
    }
}

#[async_trait]
impl EventStore for EventRepository {
    async fn find_ref(&self, event_id: Id) -> Result<Option<EventRef>, StoreError> {
        let row: Option<(Id, Id)> =
            sqlx::query_as("SELECT id, organizer_id FROM events WHERE id = ?")
                .bind(event_id)
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| StoreError(e.to_string()))?;

        Ok(row.map(|(id, organizer_id)| EventRef { id, organizer_id }))
    }
}
