//! The endpoint for the month-to-date dashboard summary.

use axum::{Extension, Json, extract::State, response::IntoResponse};
use time::OffsetDateTime;

use crate::{
    Error,
    budget::get_budget_total,
    dashboard::aggregation::summarize,
    state::AppState,
    transaction::get_transactions,
    user::UserId,
};

/// A route handler for the caller's dashboard summary.
///
/// Loads the caller's transactions and current-month budget and summarises
/// them against today's date.
pub async fn get_dashboard_endpoint(
    State(state): State<AppState>,
    Extension(user_id): Extension<UserId>,
) -> Result<impl IntoResponse, Error> {
    let connection = state
        .db_connection
        .lock()
        .map_err(|_| Error::DatabaseLockError)?;

    let today = OffsetDateTime::now_utc().date();
    let transactions = get_transactions(user_id, &connection)?;
    let budget_total = get_budget_total(
        today.month() as u8,
        today.year(),
        user_id,
        &connection,
    )?;

    Ok(Json(summarize(&transactions, budget_total, today)))
}
