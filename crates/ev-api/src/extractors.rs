//! Axum extractors for API handlers

use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use ev_auth::{extract_bearer_token, Identity};

use crate::error::ApiError;
use crate::AppState;

/// Authenticated caller, resolved from the bearer token by the guard.
pub struct AuthenticatedUser(pub Identity);

#[async_trait]
impl<S> FromRequestParts<S> for AuthenticatedUser
where
    S: Send + Sync,
    AppState: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let app_state = AppState::from_ref(state);

        let token = parts
            .headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .and_then(extract_bearer_token)
            .ok_or_else(|| ApiError::unauthorized("Not authenticated"))?;

        let identity = app_state.guard.resolve_caller(token).await?;
        Ok(AuthenticatedUser(identity))
    }
}

impl std::ops::Deref for AuthenticatedUser {
    type Target = Identity;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}
