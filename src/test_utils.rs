//! Shared helpers for endpoint tests that need a running server and a
//! logged-in user.

use axum_test::{TestServer, TestServerConfig};
use rusqlite::Connection;
use serde_json::json;

use crate::{
    auth::PasswordHash,
    build_router,
    state::AppState,
    user::{User, create_user},
};

pub(crate) const TEST_USERNAME: &str = "alice";
pub(crate) const TEST_PASSWORD: &str = "f3yahx0quee9Ohs4";

/// Create an [AppState] backed by a fresh in-memory database.
pub(crate) fn new_test_state() -> AppState {
    let connection = Connection::open_in_memory().unwrap();
    AppState::new(connection, "42").unwrap()
}

/// Create a test server that keeps cookies between requests.
pub(crate) fn new_test_server(state: AppState) -> TestServer {
    let config = TestServerConfig {
        save_cookies: true,
        ..Default::default()
    };

    TestServer::new_with_config(build_router(state), config)
}

/// Create a test server with a registered user that is already logged in.
///
/// Returns the server, the state (for seeding further data) and the user.
pub(crate) async fn logged_in_server() -> (TestServer, AppState, User) {
    let state = new_test_state();

    let user = {
        // Low cost keeps the test fast. The hash is still a real bcrypt hash.
        let password_hash = PasswordHash::from_raw_password(TEST_PASSWORD, 4).unwrap();
        let connection = state.db_connection.lock().unwrap();
        create_user(TEST_USERNAME, password_hash, &connection).unwrap()
    };

    let server = new_test_server(state.clone());

    server
        .post("/api/log_in")
        .json(&json!({
            "username": TEST_USERNAME,
            "password": TEST_PASSWORD,
        }))
        .await
        .assert_status_ok();

    (server, state, user)
}
