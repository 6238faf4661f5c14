//! The endpoint for creating a monthly budget.

use axum::{Extension, Json, extract::State, response::IntoResponse};

use crate::{
    Error,
    budget::core::{BudgetData, create_budget},
    state::AppState,
    user::UserId,
};

/// A route handler for creating a new budget owned by the caller.
///
/// A user can have at most one budget per calendar month; creating a second
/// one for the same month fails with a conflict-style error rather than
/// replacing the first.
pub async fn create_budget_endpoint(
    State(state): State<AppState>,
    Extension(user_id): Extension<UserId>,
    Json(data): Json<BudgetData>,
) -> Result<impl IntoResponse, Error> {
    let connection = state
        .db_connection
        .lock()
        .map_err(|_| Error::DatabaseLockError)?;

    create_budget(data, user_id, &connection).map(Json)
}
