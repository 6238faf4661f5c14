//! The endpoint for logging in with a username and password.

use axum::{Json, extract::State, response::IntoResponse};
use axum_extra::extract::PrivateCookieJar;
use serde::Deserialize;

use crate::{
    Error,
    auth::cookie::set_auth_cookie,
    state::AppState,
    user::get_user_by_username,
};

/// The credentials sent in a log-in request.
#[derive(Debug, Deserialize)]
pub struct LogInData {
    /// The username entered at log-in.
    pub username: String,
    /// The plain text password entered at log-in.
    pub password: String,
}

/// A route handler for logging in.
///
/// On success the auth cookie is set and the logged in user is returned.
///
/// An unknown username and a wrong password both produce the same
/// [Error::InvalidCredentials] response, so a client cannot probe which
/// usernames are registered.
pub async fn log_in_endpoint(
    State(state): State<AppState>,
    jar: PrivateCookieJar,
    Json(data): Json<LogInData>,
) -> Result<impl IntoResponse, Error> {
    let user = {
        let connection = state
            .db_connection
            .lock()
            .map_err(|_| Error::DatabaseLockError)?;

        match get_user_by_username(&data.username, &connection) {
            Ok(user) => user,
            Err(Error::NotFound) => return Err(Error::InvalidCredentials),
            Err(error) => return Err(error),
        }
    };

    match user.password_hash.verify(&data.password) {
        Ok(true) => {}
        Ok(false) => return Err(Error::InvalidCredentials),
        Err(error) => return Err(Error::HashingError(error.to_string())),
    }

    let jar = set_auth_cookie(jar, user.id, state.cookie_duration);

    Ok((jar, Json(user)))
}
