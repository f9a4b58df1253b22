//! Login handler
//!
//! Exchanges an email/password form for a signed bearer token.

use axum::{extract::State, Form, Json};
use serde::{Deserialize, Serialize};

use crate::error::ApiResult;
use crate::AppState;

/// Login form. `username` carries the email.
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: &'static str,
}

/// POST /login
pub async fn login(
    State(state): State<AppState>,
    Form(form): Form<LoginForm>,
) -> ApiResult<Json<TokenResponse>> {
    let identity = state
        .guard
        .authenticate(&form.username, &form.password)
        .await?;
    let token = state.guard.issue_token(&identity)?;

    tracing::info!(user_id = identity.id, "login succeeded");

    Ok(Json(TokenResponse {
        access_token: token,
        token_type: "bearer",
    }))
}
