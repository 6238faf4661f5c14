//! The endpoint for logging out.

use axum::{Json, response::IntoResponse};
use axum_extra::extract::PrivateCookieJar;
use serde_json::json;

use crate::auth::cookie::invalidate_auth_cookie;

/// A route handler for logging out.
///
/// Invalidates the auth cookie. Safe to call without being logged in.
pub async fn log_out_endpoint(jar: PrivateCookieJar) -> impl IntoResponse {
    let jar = invalidate_auth_cookie(jar);

    (jar, Json(json!({ "success": true })))
}
