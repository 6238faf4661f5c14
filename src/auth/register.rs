//! The endpoint for creating a new user account.

use axum::{Json, extract::State, response::IntoResponse};
use axum_extra::extract::PrivateCookieJar;
use serde::Deserialize;

use crate::{
    Error,
    auth::{PasswordHash, cookie::set_auth_cookie},
    state::AppState,
    user::create_user,
};

/// The data sent in a registration request.
#[derive(Debug, Deserialize)]
pub struct RegisterData {
    /// The desired username.
    pub username: String,
    /// The plain text password to be validated and hashed.
    pub password: String,
}

/// A route handler for creating a new user.
///
/// On success the user is logged in straight away: the response sets the
/// auth cookie and returns the created user.
///
/// # Errors
///
/// Returns an error response if the username is empty or taken, or if the
/// password is too weak.
pub async fn register_endpoint(
    State(state): State<AppState>,
    jar: PrivateCookieJar,
    Json(data): Json<RegisterData>,
) -> Result<impl IntoResponse, Error> {
    let username = data.username.trim();
    if username.is_empty() {
        return Err(Error::EmptyUsername);
    }

    let password_hash = PasswordHash::from_raw_password(&data.password, PasswordHash::DEFAULT_COST)?;

    let connection = state
        .db_connection
        .lock()
        .map_err(|_| Error::DatabaseLockError)?;
    let user = create_user(username, password_hash, &connection)?;

    let jar = set_auth_cookie(jar, user.id, state.cookie_duration);

    Ok((jar, Json(user)))
}

#[cfg(test)]
mod register_tests {
    use axum::http::StatusCode;
    use axum_test::TestServer;
    use rusqlite::Connection;
    use serde_json::{Value, json};

    use crate::{build_router, state::AppState};

    fn test_server() -> TestServer {
        let connection = Connection::open_in_memory().unwrap();
        let state = AppState::new(connection, "42").unwrap();

        TestServer::new(build_router(state))
    }

    #[tokio::test]
    async fn register_creates_user_and_sets_cookie() {
        let server = test_server();

        let response = server
            .post("/api/register")
            .json(&json!({
                "username": "alice",
                "password": "f3yahx0quee9Ohs4",
            }))
            .await;

        response.assert_status_ok();
        let body = response.json::<Value>();
        assert_eq!(body["username"], "alice");
        assert!(body.get("password_hash").is_none());
        assert!(!response.cookie("auth_token").value().is_empty());
    }

    #[tokio::test]
    async fn register_fails_on_weak_password() {
        let server = test_server();

        let response = server
            .post("/api/register")
            .json(&json!({
                "username": "alice",
                "password": "hunter2",
            }))
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn register_fails_on_duplicate_username() {
        let server = test_server();
        let credentials = json!({
            "username": "alice",
            "password": "f3yahx0quee9Ohs4",
        });

        server.post("/api/register").json(&credentials).await;
        let response = server.post("/api/register").json(&credentials).await;

        response.assert_status(StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn register_fails_on_empty_username() {
        let server = test_server();

        let response = server
            .post("/api/register")
            .json(&json!({
                "username": "   ",
                "password": "f3yahx0quee9Ohs4",
            }))
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
    }
}
