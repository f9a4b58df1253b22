//! Password hashing
//!
//! Argon2 with a fresh random salt per digest. The digest is a
//! self-describing PHC string, so verification recovers the algorithm,
//! cost parameters, and salt from the stored value.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher as _, PasswordVerifier, SaltString},
    Argon2,
};
use thiserror::Error;

/// Password hashing errors. Only hashing can fail; verification never does.
#[derive(Debug, Error)]
pub enum PasswordError {
    #[error("Password hashing failed: {0}")]
    HashingFailed(String),
}

/// Password hasher using argon2 with default parameters.
#[derive(Debug, Clone, Copy, Default)]
pub struct PasswordHasher;

impl PasswordHasher {
    pub fn new() -> Self {
        Self
    }

    fn argon2(&self) -> Argon2<'static> {
        Argon2::default()
    }

    /// Hash a plaintext password into a PHC-format digest.
    ///
    /// Every call salts with fresh randomness, so the same password never
    /// produces the same digest twice.
    pub fn hash(&self, password: &str) -> Result<String, PasswordError> {
        let salt = SaltString::generate(&mut OsRng);
        let digest = self
            .argon2()
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| PasswordError::HashingFailed(e.to_string()))?;
        Ok(digest.to_string())
    }

    /// Verify a plaintext password against a stored digest.
    ///
    /// All failure modes collapse to `false`: a wrong password, a
    /// truncated or empty digest, and an unrecognized algorithm tag are
    /// indistinguishable to the caller.
    pub fn verify(&self, password: &str, digest: &str) -> bool {
        let parsed = match PasswordHash::new(digest) {
            Ok(parsed) => parsed,
            Err(_) => return false,
        };
        self.argon2()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok()
    }
}
