//! # ev-db
//!
//! Database layer for Eventos RS: SQLite access through SQLx.
//!
//! - Connection pool management and schema bootstrap
//! - Repositories for users, roles, and events
//! - Implementations of the `ev-auth` store seams
//!
//! ## Example
//!
//! ```ignore
//! use ev_db::{Database, DatabaseConfig};
//!
//! let db = Database::connect(&DatabaseConfig::with_url("sqlite://eventos.db")).await?;
//! db.migrate().await?;
//! let users = ev_db::UserRepository::new(db.pool().clone());
//! ```

pub mod events;
pub mod pool;
pub mod repository;
pub mod roles;
pub mod schema;
pub mod users;

pub use events::{CreateEventDto, EventRepository, EventRow, EventWithOrganizer, UpdateEventDto};
pub use pool::{Database, DatabaseConfig};
pub use repository::{RepositoryError, RepositoryResult};
pub use roles::{RoleRepository, RoleRow};
pub use users::{CreateUserDto, UserRepository, UserRow};
