//! Role repository
//!
//! Database operations for roles. Roles are referenced by users through a
//! foreign key; the two built-in roles are seeded at startup.

use ev_core::Id;
use sqlx::{FromRow, SqlitePool};

use crate::repository::{is_unique_violation, RepositoryError, RepositoryResult};

/// Role database entity
#[derive(Debug, Clone, FromRow)]
pub struct RoleRow {
    pub id: Id,
    pub name: String,
}

/// Role repository implementation
#[derive(Clone)]
pub struct RoleRepository {
    pool: SqlitePool,
}

impl RoleRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, name: &str) -> RepositoryResult<RoleRow> {
        let result = sqlx::query("INSERT INTO roles (name) VALUES (?)")
            .bind(name)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                if is_unique_violation(&e) {
                    RepositoryError::Conflict(format!("role {} already exists", name))
                } else {
                    RepositoryError::Database(e)
                }
            })?;

        Ok(RoleRow {
            id: result.last_insert_rowid(),
            name: name.to_string(),
        })
    }

    pub async fn find_by_id(&self, id: Id) -> RepositoryResult<Option<RoleRow>> {
        let row = sqlx::query_as::<_, RoleRow>("SELECT id, name FROM roles WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row)
    }

    pub async fn find_by_name(&self, name: &str) -> RepositoryResult<Option<RoleRow>> {
        let row = sqlx::query_as::<_, RoleRow>("SELECT id, name FROM roles WHERE name = ?")
            .bind(name)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row)
    }

    pub async fn find_all(&self) -> RepositoryResult<Vec<RoleRow>> {
        let rows = sqlx::query_as::<_, RoleRow>("SELECT id, name FROM roles ORDER BY id ASC")
            .fetch_all(&self.pool)
            .await?;

        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::Database;

    async fn repo() -> RoleRepository {
        let db = Database::in_memory().await.unwrap();
        db.migrate().await.unwrap();
        RoleRepository::new(db.pool().clone())
    }

    #[tokio::test]
    async fn test_seeded_roles_present() {
        let roles = repo().await;
        assert!(roles.find_by_name("admin").await.unwrap().is_some());
        assert!(roles.find_by_name("usuario").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_create_and_list() {
        let roles = repo().await;
        let created = roles.create("organizador").await.unwrap();
        assert_eq!(created.name, "organizador");

        let all = roles.find_all().await.unwrap();
        assert_eq!(all.len(), 3);
    }

    #[tokio::test]
    async fn test_duplicate_name_conflicts() {
        let roles = repo().await;
        assert!(matches!(
            roles.create("admin").await,
            Err(RepositoryError::Conflict(_))
        ));
    }
}
