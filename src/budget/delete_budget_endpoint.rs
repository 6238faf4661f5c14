//! The endpoint for deleting a budget.

use axum::{
    Extension, Json,
    extract::{Path, State},
    response::IntoResponse,
};
use serde_json::json;

use crate::{
    Error, budget::core::delete_budget, database_id::BudgetId, state::AppState, user::UserId,
};

/// A route handler for deleting one of the caller's budgets along with its
/// allocations.
pub async fn delete_budget_endpoint(
    State(state): State<AppState>,
    Extension(user_id): Extension<UserId>,
    Path(budget_id): Path<BudgetId>,
) -> Result<impl IntoResponse, Error> {
    let connection = state
        .db_connection
        .lock()
        .map_err(|_| Error::DatabaseLockError)?;

    delete_budget(budget_id, user_id, &connection)?;

    Ok(Json(json!({ "success": true })))
}

#[cfg(test)]
mod delete_budget_endpoint_tests {
    use axum::http::StatusCode;
    use serde_json::{Value, json};

    use crate::{
        budget::{BudgetAllocation, BudgetData, create_budget},
        category::{CategoryName, CategoryType, create_category},
        test_utils::logged_in_server,
    };

    #[tokio::test]
    async fn delete_budget_removes_own_budget() {
        let (server, state, user) = logged_in_server().await;
        let budget_id = {
            let connection = state.db_connection.lock().unwrap();
            let category = create_category(
                CategoryName::new_unchecked("Food"),
                CategoryType::Expense,
                user.id,
                &connection,
            )
            .unwrap();
            create_budget(
                BudgetData {
                    month: 6,
                    year: 2025,
                    categories: vec![BudgetAllocation {
                        category_id: category.id,
                        amount: 50000.0,
                    }],
                },
                user.id,
                &connection,
            )
            .unwrap()
            .budget
            .id
        };

        let response = server.delete(&format!("/api/budgets/{budget_id}")).await;

        response.assert_status_ok();
        response.assert_json(&json!({ "success": true }));

        let budgets: Vec<Value> = server.get("/api/budgets").await.json();
        assert!(budgets.is_empty());
    }

    #[tokio::test]
    async fn delete_budget_fails_for_missing_budget() {
        let (server, _, _) = logged_in_server().await;

        let response = server.delete("/api/budgets/999").await;

        response.assert_status(StatusCode::NOT_FOUND);
    }
}
