//! Collaborator seams consumed by the guard.
//!
//! The guard never talks to the database directly; it sees identities and
//! event ownership through these traits. `ev-db` implements them over
//! SQLite, tests implement them in memory.

use async_trait::async_trait;
use ev_core::Id;
use serde::Serialize;
use thiserror::Error;

/// An authenticated (or authenticatable) user as the guard sees it.
#[derive(Debug, Clone, Serialize)]
pub struct Identity {
    pub id: Id,
    pub name: String,
    pub email: String,
    /// Stored password digest. Never serialized or logged.
    #[serde(skip_serializing)]
    pub password_digest: String,
    /// Role name, e.g. "admin" or "usuario"
    pub role: String,
}

impl Identity {
    pub fn is_admin(&self) -> bool {
        self.role == ev_core::role::ADMIN
    }
}

/// Parameters for creating an identity.
#[derive(Debug, Clone)]
pub struct NewIdentity {
    pub name: String,
    pub email: String,
    pub password_digest: String,
    pub role_id: Id,
}

/// The slice of an event the guard needs for ownership checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EventRef {
    pub id: Id,
    pub organizer_id: Id,
}

/// Storage-layer failure, opaque to the guard.
#[derive(Debug, Error)]
#[error("Storage error: {0}")]
pub struct StoreError(pub String);

/// Persisted user records holding the password digest.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    async fn find_by_email(&self, email: &str) -> Result<Option<Identity>, StoreError>;
    async fn find_by_id(&self, id: Id) -> Result<Option<Identity>, StoreError>;
    async fn create(&self, identity: NewIdentity) -> Result<Identity, StoreError>;
}

/// Event lookup for ownership checks.
#[async_trait]
pub trait EventStore: Send + Sync {
    async fn find_ref(&self, event_id: Id) -> Result<Option<EventRef>, StoreError>;
}
