//! # ev-auth
//!
//! Authentication and authorization core for Eventos RS.
//!
//! ## Features
//!
//! - Argon2 password hashing with per-digest salts
//! - JWT issuance and verification with a single opaque failure mode
//! - Role- and ownership-based access control via the [`guard::Guard`]

pub mod guard;
pub mod password;
pub mod store;
pub mod token;

pub use guard::{Guard, GuardError};
pub use password::{PasswordError, PasswordHasher};
pub use store::{CredentialStore, EventRef, EventStore, Identity, NewIdentity, StoreError};
pub use token::{extract_bearer_token, Claims, TokenError, TokenService, DEFAULT_TOKEN_TTL};
