//! Authorization guard
//!
//! Derives the current caller from a presented token and enforces role-
//! and ownership-based rules before mutating operations proceed. Every
//! operation takes the token or resolved identity as an explicit argument;
//! there is no ambient caller state.

use std::sync::Arc;
use std::time::Duration;

use ev_core::{role, Id};
use thiserror::Error;

use crate::password::PasswordHasher;
use crate::store::{CredentialStore, EventRef, EventStore, Identity, StoreError};
use crate::token::{TokenError, TokenService};

/// Guard errors.
///
/// `InvalidCredentials`, `InvalidToken`, and `UnknownSubject` are all
/// unauthenticated to the outside world; they stay distinct here because
/// the HTTP layer logs them differently. `Forbidden` and `NotFound` are
/// safe to distinguish post-authentication.
#[derive(Debug, Error)]
pub enum GuardError {
    #[error("Invalid email or password")]
    InvalidCredentials,
    #[error("Invalid token")]
    InvalidToken,
    #[error("Token subject no longer exists")]
    UnknownSubject,
    #[error("Forbidden: {0}")]
    Forbidden(String),
    #[error("Event not found")]
    NotFound,
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("Token issuance failed: {0}")]
    Issuance(String),
}

impl From<TokenError> for GuardError {
    fn from(err: TokenError) -> Self {
        match err {
            TokenError::Invalid => GuardError::InvalidToken,
            TokenError::EncodingFailed(msg) => GuardError::Issuance(msg),
        }
    }
}

/// Authorization guard over the token service and stores.
pub struct Guard {
    tokens: TokenService,
    hasher: PasswordHasher,
    users: Arc<dyn CredentialStore>,
    events: Arc<dyn EventStore>,
    token_ttl: Duration,
}

impl Guard {
    pub fn new(
        tokens: TokenService,
        hasher: PasswordHasher,
        users: Arc<dyn CredentialStore>,
        events: Arc<dyn EventStore>,
        token_ttl: Duration,
    ) -> Self {
        Self {
            tokens,
            hasher,
            users,
            events,
            token_ttl,
        }
    }

    /// Authenticate an email/password pair for login.
    ///
    /// Unknown email and wrong password are indistinguishable to the
    /// caller, preventing user enumeration.
    pub async fn authenticate(&self, email: &str, password: &str) -> Result<Identity, GuardError> {
        let identity = match self.users.find_by_email(email).await? {
            Some(identity) => identity,
            None => {
                tracing::debug!(email, "login attempt for unknown email");
                return Err(GuardError::InvalidCredentials);
            }
        };

        if !self.hasher.verify(password, &identity.password_digest) {
            tracing::debug!(email, "login attempt with wrong password");
            return Err(GuardError::InvalidCredentials);
        }

        Ok(identity)
    }

    /// Issue a token for an authenticated identity.
    pub fn issue_token(&self, identity: &Identity) -> Result<String, GuardError> {
        Ok(self
            .tokens
            .issue(&identity.email, &identity.role, self.token_ttl)?)
    }

    /// Resolve the caller behind a presented token.
    ///
    /// Verifies the token, then re-resolves the subject against the
    /// credential store: a valid token for a deleted identity fails with
    /// `UnknownSubject`, not `InvalidToken`.
    pub async fn resolve_caller(&self, token: &str) -> Result<Identity, GuardError> {
        let claims = self.tokens.verify(token)?;

        self.users
            .find_by_email(&claims.sub)
            .await?
            .ok_or(GuardError::UnknownSubject)
    }

    /// Require the identity to hold the named role.
    pub fn require_role(&self, identity: &Identity, role: &str) -> Result<(), GuardError> {
        if identity.role == role {
            Ok(())
        } else {
            Err(GuardError::Forbidden(format!(
                "requires the {} role",
                role
            )))
        }
    }

    /// Require the identity to be the event's organizer or an admin.
    ///
    /// Fails `NotFound` for an absent event regardless of the caller.
    pub async fn require_owner_or_admin(
        &self,
        event_id: Id,
        identity: &Identity,
    ) -> Result<EventRef, GuardError> {
        let event = self
            .events
            .find_ref(event_id)
            .await?
            .ok_or(GuardError::NotFound)?;

        if event.organizer_id == identity.id || identity.role == role::ADMIN {
            Ok(event)
        } else {
            Err(GuardError::Forbidden(
                "only the organizer or an admin may modify this event".to_string(),
            ))
        }
    }
}
