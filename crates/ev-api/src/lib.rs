//! # ev-api
//!
//! HTTP API for Eventos RS: the router, handlers, error mapping, and the
//! authenticated-caller extractor over the `ev-auth` guard.

pub mod error;
pub mod extractors;
pub mod handlers;
pub mod routes;

use std::sync::Arc;
use std::time::Duration;

use ev_auth::{Guard, PasswordHasher, TokenService};
use ev_core::AppConfig;
use ev_db::{Database, EventRepository, RoleRepository, UserRepository};

pub use error::{ApiError, ApiResult};
pub use routes::build_router;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub users: UserRepository,
    pub roles: RoleRepository,
    pub events: EventRepository,
    pub guard: Arc<Guard>,
    pub hasher: PasswordHasher,
}

impl AppState {
    /// Wire repositories and the guard from a connected database and config.
    pub fn new(db: &Database, config: &AppConfig) -> Self {
        let users = UserRepository::new(db.pool().clone());
        let roles = RoleRepository::new(db.pool().clone());
        let events = EventRepository::new(db.pool().clone());

        let guard = Guard::new(
            TokenService::new(config.auth.jwt_secret.as_bytes()),
            PasswordHasher::new(),
            Arc::new(users.clone()),
            Arc::new(events.clone()),
            Duration::from_secs(config.auth.token_ttl_secs),
        );

        Self {
            users,
            roles,
            events,
            guard: Arc::new(guard),
            hasher: PasswordHasher::new(),
        }
    }
}
