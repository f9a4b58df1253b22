//! # ev-core
//!
//! Shared building blocks for Eventos RS:
//! - Common identifier and role-name types
//! - Application configuration loaded from the environment

pub mod config;
pub mod types;

pub use config::*;
pub use types::*;
