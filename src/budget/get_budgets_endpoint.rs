//! The endpoint for listing the caller's budgets.

use axum::{Extension, Json, extract::State, response::IntoResponse};

use crate::{Error, budget::core::get_budgets, state::AppState, user::UserId};

/// A route handler for listing the caller's budgets with their allocations
/// expanded, newest month first.
pub async fn get_budgets_endpoint(
    State(state): State<AppState>,
    Extension(user_id): Extension<UserId>,
) -> Result<impl IntoResponse, Error> {
    let connection = state
        .db_connection
        .lock()
        .map_err(|_| Error::DatabaseLockError)?;

    get_budgets(user_id, &connection).map(Json)
}
