//! The endpoint for recording a new income or expense transaction.

use axum::{Extension, Json, extract::State, response::IntoResponse};

use crate::{
    Error,
    state::AppState,
    transaction::core::{TransactionData, create_transaction},
    user::UserId,
};

/// A route handler for creating a new transaction owned by the caller.
///
/// The transaction date is always the current date.
pub async fn create_transaction_endpoint(
    State(state): State<AppState>,
    Extension(user_id): Extension<UserId>,
    Json(data): Json<TransactionData>,
) -> Result<impl IntoResponse, Error> {
    let connection = state
        .db_connection
        .lock()
        .map_err(|_| Error::DatabaseLockError)?;

    create_transaction(data, user_id, &connection).map(Json)
}

#[cfg(test)]
mod create_transaction_endpoint_tests {
    use axum::http::StatusCode;
    use serde_json::json;
    use time::OffsetDateTime;

    use crate::{
        category::{CategoryName, CategoryType, create_category},
        test_utils::logged_in_server,
        transaction::Transaction,
    };

    #[tokio::test]
    async fn create_transaction_returns_transaction_with_todays_date() {
        let (server, state, user) = logged_in_server().await;
        let category_id = {
            let connection = state.db_connection.lock().unwrap();
            create_category(
                CategoryName::new_unchecked("Groceries"),
                CategoryType::Expense,
                user.id,
                &connection,
            )
            .unwrap()
            .id
        };

        let response = server
            .post("/api/transactions")
            .json(&json!({
                "amount": 12.34,
                "description": "Weekly shop",
                "type": "expense",
                "category_id": category_id,
            }))
            .await;

        response.assert_status_ok();
        let transaction: Transaction = response.json();
        assert_eq!(transaction.amount, 12.34);
        assert_eq!(transaction.user_id, user.id);
        assert_eq!(transaction.date, OffsetDateTime::now_utc().date());
    }

    #[tokio::test]
    async fn create_transaction_rejects_zero_amount() {
        let (server, state, user) = logged_in_server().await;
        let category_id = {
            let connection = state.db_connection.lock().unwrap();
            create_category(
                CategoryName::new_unchecked("Groceries"),
                CategoryType::Expense,
                user.id,
                &connection,
            )
            .unwrap()
            .id
        };

        let response = server
            .post("/api/transactions")
            .json(&json!({
                "amount": 0.0,
                "description": "Weekly shop",
                "type": "expense",
                "category_id": category_id,
            }))
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn create_transaction_rejects_mismatched_category_type() {
        let (server, state, user) = logged_in_server().await;
        let category_id = {
            let connection = state.db_connection.lock().unwrap();
            create_category(
                CategoryName::new_unchecked("Groceries"),
                CategoryType::Expense,
                user.id,
                &connection,
            )
            .unwrap()
            .id
        };

        let response = server
            .post("/api/transactions")
            .json(&json!({
                "amount": 100.0,
                "description": "Pay day",
                "type": "income",
                "category_id": category_id,
            }))
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn create_transaction_requires_authentication() {
        let (_, state, _) = logged_in_server().await;
        let server = crate::test_utils::new_test_server(state);

        let response = server
            .post("/api/transactions")
            .json(&json!({
                "amount": 12.34,
                "description": "Weekly shop",
                "type": "expense",
                "category_id": 1,
            }))
            .await;

        response.assert_status(StatusCode::UNAUTHORIZED);
    }
}
