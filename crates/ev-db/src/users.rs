//! User repository
//!
//! Database operations for users. Every read joins the role name so the
//! guard gets a complete identity in one lookup. Email matching is
//! case-sensitive.

use async_trait::async_trait;
use ev_auth::{CredentialStore, Identity, NewIdentity, StoreError};
use ev_core::Id;
use sqlx::{FromRow, SqlitePool};

use crate::events::EventWithOrganizer;
use crate::repository::{is_unique_violation, RepositoryError, RepositoryResult};

/// User database entity with the role name joined in.
#[derive(Debug, Clone, FromRow)]
pub struct UserRow {
    pub id: Id,
    pub name: String,
    pub email: String,
    pub password_digest: String,
    pub role_id: Id,
    pub role: String,
}

impl From<UserRow> for Identity {
    fn from(row: UserRow) -> Self {
        Identity {
            id: row.id,
            name: row.name,
            email: row.email,
            password_digest: row.password_digest,
            role: row.role,
        }
    }
}

/// DTO for creating a user
#[derive(Debug, Clone)]
pub struct CreateUserDto {
    pub name: String,
    pub email: String,
    pub password_digest: String,
    pub role_id: Id,
}

const SELECT_USER: &str = r#"
    SELECT u.id, u.name, u.email, u.password_digest, u.role_id, r.name AS role
    FROM users u
    JOIN roles r ON r.id = u.role_id
"#;

/// User repository implementation
#[derive(Clone)]
pub struct UserRepository {
    pool: SqlitePool,
}

impl UserRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn create_user(&self, dto: CreateUserDto) -> RepositoryResult<UserRow> {
        let result = sqlx::query(
            "INSERT INTO users (name, email, password_digest, role_id) VALUES (?, ?, ?, ?)",
        )
        .bind(&dto.name)
        .bind(&dto.email)
        .bind(&dto.password_digest)
        .bind(dto.role_id)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                RepositoryError::Conflict(format!("email {} already registered", dto.email))
            } else {
                RepositoryError::Database(e)
            }
        })?;

        let id = result.last_insert_rowid();
        self.find_user_by_id(id)
            .await?
            .ok_or_else(|| RepositoryError::NotFound(format!("user {} after insert", id)))
    }

    pub async fn find_user_by_id(&self, id: Id) -> RepositoryResult<Option<UserRow>> {
        let row = sqlx::query_as::<_, UserRow>(&format!("{} WHERE u.id = ?", SELECT_USER))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row)
    }

    pub async fn find_user_by_email(&self, email: &str) -> RepositoryResult<Option<UserRow>> {
        let row = sqlx::query_as::<_, UserRow>(&format!("{} WHERE u.email = ?", SELECT_USER))
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row)
    }

    pub async fn find_all(&self) -> RepositoryResult<Vec<UserRow>> {
        let rows = sqlx::query_as::<_, UserRow>(&format!("{} ORDER BY u.id ASC", SELECT_USER))
            .fetch_all(&self.pool)
            .await?;

        Ok(rows)
    }

    /// Events the user is registered for as a participant.
    pub async fn registered_events(&self, user_id: Id) -> RepositoryResult<Vec<EventWithOrganizer>> {
        let rows = sqlx::query_as::<_, EventWithOrganizer>(
            r#"
            SELECT e.id, e.name, e.description, e.date, e.location,
                   e.organizer_id, o.name AS organizer_name
            FROM events e
            JOIN users o ON o.id = e.organizer_id
            JOIN event_participants p ON p.event_id = e.id
            WHERE p.user_id = ?
            ORDER BY e.date ASC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }
}

#[async_trait]
impl CredentialStore for UserRepository {
    async fn find_by_email(&self, email: &str) -> Result<Option<Identity>, StoreError> {
        let row = self.find_user_by_email(email).await.map_err(StoreError::from)?;
        Ok(row.map(Identity::from))
    }

    async fn find_by_id(&self, id: Id) -> Result<Option<Identity>, StoreError> {
        let row = self.find_user_by_id(id).await.map_err(StoreError::from)?;
        Ok(row.map(Identity::from))
    }

    async fn create(&self, identity: NewIdentity) -> Result<Identity, StoreError> {
        let row = self
            .create_user(CreateUserDto {
                name: identity.name,
                email: identity.email,
                password_digest: identity.password_digest,
                role_id: identity.role_id,
            })
            .await
            .map_err(StoreError::from)?;
        Ok(row.into())
    }
}
