//! API handlers

pub mod auth;
pub mod events;
pub mod roles;
pub mod users;
