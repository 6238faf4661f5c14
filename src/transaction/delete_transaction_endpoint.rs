//! The endpoint for deleting a transaction.

use axum::{
    Extension, Json,
    extract::{Path, State},
    response::IntoResponse,
};
use serde_json::json;

use crate::{
    Error, database_id::TransactionId, state::AppState, transaction::core::delete_transaction,
    user::UserId,
};

/// A route handler for deleting one of the caller's transactions.
pub async fn delete_transaction_endpoint(
    State(state): State<AppState>,
    Extension(user_id): Extension<UserId>,
    Path(transaction_id): Path<TransactionId>,
) -> Result<impl IntoResponse, Error> {
    let connection = state
        .db_connection
        .lock()
        .map_err(|_| Error::DatabaseLockError)?;

    delete_transaction(transaction_id, user_id, &connection)?;

    Ok(Json(json!({ "success": true })))
}

#[cfg(test)]
mod delete_transaction_endpoint_tests {
    use axum::http::StatusCode;
    use serde_json::json;

    use crate::{
        auth::PasswordHash,
        category::{CategoryName, CategoryType, create_category},
        test_utils::logged_in_server,
        transaction::{Transaction, TransactionData, create_transaction},
        user::create_user,
    };

    #[tokio::test]
    async fn delete_transaction_removes_own_transaction() {
        let (server, state, user) = logged_in_server().await;
        let transaction_id = {
            let connection = state.db_connection.lock().unwrap();
            let category = create_category(
                CategoryName::new_unchecked("Groceries"),
                CategoryType::Expense,
                user.id,
                &connection,
            )
            .unwrap();
            create_transaction(
                TransactionData {
                    amount: 12.34,
                    description: "Weekly shop".to_owned(),
                    transaction_type: CategoryType::Expense,
                    category_id: category.id,
                },
                user.id,
                &connection,
            )
            .unwrap()
            .id
        };

        let response = server
            .delete(&format!("/api/transactions/{transaction_id}"))
            .await;

        response.assert_status_ok();
        response.assert_json(&json!({ "success": true }));

        let transactions: Vec<Transaction> = server.get("/api/transactions").await.json();
        assert!(transactions.is_empty());
    }

    #[tokio::test]
    async fn delete_transaction_fails_for_missing_transaction() {
        let (server, _, _) = logged_in_server().await;

        let response = server.delete("/api/transactions/999").await;

        response.assert_status(StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn delete_transaction_fails_for_other_users_transaction() {
        let (server, state, _) = logged_in_server().await;
        let transaction_id = {
            let connection = state.db_connection.lock().unwrap();
            let bob = create_user("bob", PasswordHash::new_unchecked("dummy_hash"), &connection)
                .unwrap();
            let category = create_category(
                CategoryName::new_unchecked("Groceries"),
                CategoryType::Expense,
                bob.id,
                &connection,
            )
            .unwrap();
            create_transaction(
                TransactionData {
                    amount: 12.34,
                    description: "Bob's shop".to_owned(),
                    transaction_type: CategoryType::Expense,
                    category_id: category.id,
                },
                bob.id,
                &connection,
            )
            .unwrap()
            .id
        };

        let response = server
            .delete(&format!("/api/transactions/{transaction_id}"))
            .await;

        response.assert_status(StatusCode::FORBIDDEN);
    }
}
