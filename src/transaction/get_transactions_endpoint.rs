//! The endpoint for listing the caller's transactions.

use axum::{Extension, Json, extract::State, response::IntoResponse};

use crate::{Error, state::AppState, transaction::core::get_transactions, user::UserId};

/// A route handler for listing the caller's transactions, newest first.
///
/// Each transaction is returned with its category resolved so clients do not
/// need a second round trip for category names.
pub async fn get_transactions_endpoint(
    State(state): State<AppState>,
    Extension(user_id): Extension<UserId>,
) -> Result<impl IntoResponse, Error> {
    let connection = state
        .db_connection
        .lock()
        .map_err(|_| Error::DatabaseLockError)?;

    get_transactions(user_id, &connection).map(Json)
}

#[cfg(test)]
mod get_transactions_endpoint_tests {
    use axum::http::StatusCode;
    use serde_json::{Value, json};

    use crate::{
        category::{CategoryName, CategoryType, create_category},
        test_utils::logged_in_server,
        transaction::{TransactionData, create_transaction},
    };

    #[tokio::test]
    async fn get_transactions_returns_transactions_with_categories() {
        let (server, state, user) = logged_in_server().await;
        {
            let connection = state.db_connection.lock().unwrap();
            let category = create_category(
                CategoryName::new_unchecked("Groceries"),
                CategoryType::Expense,
                user.id,
                &connection,
            )
            .unwrap();

            for description in ["Weekly shop", "Top-up shop"] {
                create_transaction(
                    TransactionData {
                        amount: 12.34,
                        description: description.to_owned(),
                        transaction_type: CategoryType::Expense,
                        category_id: category.id,
                    },
                    user.id,
                    &connection,
                )
                .unwrap();
            }
        }

        let response = server.get("/api/transactions").await;

        response.assert_status_ok();
        let transactions: Vec<Value> = response.json();
        assert_eq!(transactions.len(), 2);
        // Same date, so the newest (highest id) comes first.
        assert_eq!(transactions[0]["description"], json!("Top-up shop"));
        assert_eq!(transactions[0]["category"]["name"], json!("Groceries"));
    }

    #[tokio::test]
    async fn get_transactions_returns_empty_list_for_new_user() {
        let (server, _, _) = logged_in_server().await;

        let response = server.get("/api/transactions").await;

        response.assert_status_ok();
        let transactions: Vec<Value> = response.json();
        assert!(transactions.is_empty());
    }

    #[tokio::test]
    async fn get_transactions_requires_authentication() {
        let (_, state, _) = logged_in_server().await;
        let server = crate::test_utils::new_test_server(state);

        let response = server.get("/api/transactions").await;

        response.assert_status(StatusCode::UNAUTHORIZED);
    }
}
