//! Shared types used across all crates.

/// Primary key type for all database entities.
pub type Id = i64;

/// Built-in role names.
///
/// Both roles are seeded at startup. `USER` is the default role assigned
/// on open registration; `ADMIN` unlocks event creation and role
/// administration.
pub mod role {
    pub const ADMIN: &str = "admin";
    pub const USER: &str = "usuario";
}
