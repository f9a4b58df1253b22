//! Router assembly.

use axum::{
    routing::{get, post, put},
    Json, Router,
};

use crate::handlers::{auth, events, roles, users};
use crate::AppState;

/// Build the application router.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/login", post(auth::login))
        .route("/users", post(users::create_user).get(users::list_users))
        .route("/users/:id/events", get(users::user_events))
        .route("/roles", post(roles::create_role).get(roles::list_roles))
        .route("/events", post(events::create_event).get(events::list_events))
        .route(
            "/events/:id",
            put(events::update_event).delete(events::delete_event),
        )
        .route("/events/:id/registrations", post(events::register_participant))
        .with_state(state)
}

/// Liveness endpoint, no auth.
async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use ev_core::{role, AppConfig, Id};
    use ev_db::{CreateUserDto, Database};
    use tower::ServiceExt;

    const TEST_SECRET: &str = "test-secret-key-at-least-32-bytes";

    async fn setup() -> AppState {
        let db = Database::in_memory().await.unwrap();
        db.migrate().await.unwrap();

        let mut config = AppConfig::default();
        config.auth.jwt_secret = TEST_SECRET.into();
        AppState::new(&db, &config)
    }

    async fn send(state: &AppState, req: Request<Body>) -> (StatusCode, serde_json::Value) {
        let response = build_router(state.clone()).oneshot(req).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json = if bytes.is_empty() {
            serde_json::Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, json)
    }

    fn json_request(method: &str, uri: &str, token: Option<&str>, body: serde_json::Value) -> Request<Body> {
        let mut builder = Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json");
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        builder.body(Body::from(body.to_string())).unwrap()
    }

    fn get_request(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    async fn seed_user(state: &AppState, name: &str, email: &str, password: &str, role_name: &str) -> Id {
        let role = state.roles.find_by_name(role_name).await.unwrap().unwrap();
        let digest = state.hasher.hash(password).unwrap();
        state
            .users
            .create_user(CreateUserDto {
                name: name.into(),
                email: email.into(),
                password_digest: digest,
                role_id: role.id,
            })
            .await
            .unwrap()
            .id
    }

    async fn login(state: &AppState, email: &str, password: &str) -> (StatusCode, serde_json::Value) {
        let body = format!("username={}&password={}", email, password);
        let req = Request::builder()
            .method("POST")
            .uri("/login")
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(body))
            .unwrap();
        send(state, req).await
    }

    async fn login_token(state: &AppState, email: &str, password: &str) -> String {
        let (status, json) = login(state, email, password).await;
        assert_eq!(status, StatusCode::OK);
        json["access_token"].as_str().unwrap().to_string()
    }

    fn event_body(name: &str) -> serde_json::Value {
        serde_json::json!({
            "name": name,
            "description": "A conference",
            "date": "2026-10-01T10:00:00Z",
            "location": "Auditorio 1",
        })
    }

    async fn create_event(state: &AppState, token: &str, name: &str) -> Id {
        let (status, json) = send(state, json_request("POST", "/events", Some(token), event_body(name))).await;
        assert_eq!(status, StatusCode::CREATED);
        json["id"].as_i64().unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let state = setup().await;
        let (status, json) = send(&state, get_request("/health")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["status"], "ok");
    }

    #[tokio::test]
    async fn test_registration_defaults_to_user_role() {
        let state = setup().await;
        let (status, json) = send(
            &state,
            json_request(
                "POST",
                "/users",
                None,
                serde_json::json!({
                    "name": "Alice",
                    "email": "alice@x.com",
                    "password": "pw123",
                }),
            ),
        )
        .await;

        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(json["role"], "usuario");
        assert!(json.get("password_digest").is_none());
    }

    #[tokio::test]
    async fn test_duplicate_email_conflicts() {
        let state = setup().await;
        seed_user(&state, "Alice", "alice@x.com", "pw123", role::USER).await;

        let (status, _) = send(
            &state,
            json_request(
                "POST",
                "/users",
                None,
                serde_json::json!({
                    "name": "Alice Again",
                    "email": "alice@x.com",
                    "password": "other",
                }),
            ),
        )
        .await;

        assert_eq!(status, StatusCode::CONFLICT);
    }

    // Scenario A: login returns a token whose claims carry the email and role.
    #[tokio::test]
    async fn test_login_returns_token_with_subject_and_role() {
        let state = setup().await;
        seed_user(&state, "Alice", "alice@x.com", "pw123", role::USER).await;

        let (status, json) = login(&state, "alice@x.com", "pw123").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["token_type"], "bearer");

        let token = json["access_token"].as_str().unwrap();
        let claims = ev_auth::TokenService::new(TEST_SECRET.as_bytes())
            .verify(token)
            .unwrap();
        assert_eq!(claims.sub, "alice@x.com");
        assert_eq!(claims.rol, "usuario");
    }

    // Scenario B: wrong password yields an opaque 401 and no token.
    #[tokio::test]
    async fn test_login_wrong_password_is_opaque() {
        let state = setup().await;
        seed_user(&state, "Alice", "alice@x.com", "pw123", role::USER).await;

        let (status, json) = login(&state, "alice@x.com", "wrongpw").await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert!(json.get("access_token").is_none());

        // Unknown email fails with the identical body.
        let (status2, json2) = login(&state, "nobody@x.com", "pw123").await;
        assert_eq!(status2, StatusCode::UNAUTHORIZED);
        assert_eq!(json, json2);
    }

    // Scenario C: non-owner forbidden, admin deletes, lookup then misses.
    #[tokio::test]
    async fn test_event_deletion_ownership() {
        let state = setup().await;
        seed_user(&state, "Admin", "admin@x.com", "adminpw", role::ADMIN).await;
        seed_user(&state, "Bob", "bob@x.com", "bobpw", role::USER).await;

        let admin_token = login_token(&state, "admin@x.com", "adminpw").await;
        let bob_token = login_token(&state, "bob@x.com", "bobpw").await;

        let event_id = create_event(&state, &admin_token, "RustConf").await;

        let (status, _) = send(
            &state,
            json_request("DELETE", &format!("/events/{}", event_id), Some(&bob_token), serde_json::json!({})),
        )
        .await;
        assert_eq!(status, StatusCode::FORBIDDEN);

        let (status, _) = send(
            &state,
            json_request("DELETE", &format!("/events/{}", event_id), Some(&admin_token), serde_json::json!({})),
        )
        .await;
        assert_eq!(status, StatusCode::NO_CONTENT);

        let (status, _) = send(
            &state,
            json_request("PUT", &format!("/events/{}", event_id), Some(&admin_token), event_body("gone")),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_event_creation_requires_admin() {
        let state = setup().await;
        seed_user(&state, "Bob", "bob@x.com", "bobpw", role::USER).await;
        let bob_token = login_token(&state, "bob@x.com", "bobpw").await;

        let (status, _) = send(&state, json_request("POST", "/events", Some(&bob_token), event_body("Nope"))).await;
        assert_eq!(status, StatusCode::FORBIDDEN);

        let (status, _) = send(&state, json_request("POST", "/events", None, event_body("Nope"))).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_organizer_may_update_own_event() {
        let state = setup().await;
        seed_user(&state, "Admin", "admin@x.com", "adminpw", role::ADMIN).await;
        let admin_token = login_token(&state, "admin@x.com", "adminpw").await;

        let event_id = create_event(&state, &admin_token, "RustConf").await;
        let (status, json) = send(
            &state,
            json_request("PUT", &format!("/events/{}", event_id), Some(&admin_token), event_body("RustConf 2026")),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["name"], "RustConf 2026");
        assert_eq!(json["organizer_name"], "Admin");
    }

    #[tokio::test]
    async fn test_role_creation_is_admin_gated() {
        let state = setup().await;
        seed_user(&state, "Admin", "admin@x.com", "adminpw", role::ADMIN).await;
        seed_user(&state, "Bob", "bob@x.com", "bobpw", role::USER).await;

        let bob_token = login_token(&state, "bob@x.com", "bobpw").await;
        let (status, _) = send(
            &state,
            json_request("POST", "/roles", Some(&bob_token), serde_json::json!({"name": "organizador"})),
        )
        .await;
        assert_eq!(status, StatusCode::FORBIDDEN);

        let admin_token = login_token(&state, "admin@x.com", "adminpw").await;
        let (status, json) = send(
            &state,
            json_request("POST", "/roles", Some(&admin_token), serde_json::json!({"name": "organizador"})),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(json["name"], "organizador");

        let (status, json) = send(&state, get_request("/roles")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json.as_array().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_participant_registration_flow() {
        let state = setup().await;
        seed_user(&state, "Admin", "admin@x.com", "adminpw", role::ADMIN).await;
        let bob_id = seed_user(&state, "Bob", "bob@x.com", "bobpw", role::USER).await;

        let admin_token = login_token(&state, "admin@x.com", "adminpw").await;
        let bob_token = login_token(&state, "bob@x.com", "bobpw").await;

        let event_id = create_event(&state, &admin_token, "RustConf").await;

        for _ in 0..2 {
            let (status, _) = send(
                &state,
                json_request(
                    "POST",
                    &format!("/events/{}/registrations", event_id),
                    Some(&bob_token),
                    serde_json::json!({}),
                ),
            )
            .await;
            assert_eq!(status, StatusCode::NO_CONTENT);
        }

        let (status, json) = send(&state, get_request(&format!("/users/{}/events", bob_id))).await;
        assert_eq!(status, StatusCode::OK);
        let events = json.as_array().unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0]["name"], "RustConf");

        let (status, _) = send(&state, get_request("/users/9999/events")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_tampered_token_rejected() {
        let state = setup().await;
        seed_user(&state, "Admin", "admin@x.com", "adminpw", role::ADMIN).await;
        let token = login_token(&state, "admin@x.com", "adminpw").await;

        let sig_start = token.rfind('.').unwrap() + 1;
        let mut tampered = token[..sig_start].to_string();
        let first = token.as_bytes()[sig_start] as char;
        tampered.push(if first == 'A' { 'Q' } else { 'A' });
        tampered.push_str(&token[sig_start + 1..]);

        let (status, _) = send(&state, json_request("POST", "/events", Some(&tampered), event_body("Nope"))).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_event_listing_includes_organizer_name() {
        let state = setup().await;
        seed_user(&state, "Admin", "admin@x.com", "adminpw", role::ADMIN).await;
        let admin_token = login_token(&state, "admin@x.com", "adminpw").await;
        create_event(&state, &admin_token, "RustConf").await;

        let (status, json) = send(&state, get_request("/events")).await;
        assert_eq!(status, StatusCode::OK);
        let events = json.as_array().unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0]["organizer_name"], "Admin");
    }
}
