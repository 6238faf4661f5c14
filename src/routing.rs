//! Application router configuration with protected and unprotected route
//! definitions.

use axum::{
    Json, Router,
    http::StatusCode,
    middleware,
    response::{Html, IntoResponse, Response},
    routing::{delete, get, post},
};
use serde_json::json;

use crate::{
    AppState,
    auth::{auth_guard, log_in_endpoint, log_out_endpoint, register_endpoint},
    budget::{create_budget_endpoint, delete_budget_endpoint, get_budgets_endpoint},
    category::{create_category_endpoint, delete_category_endpoint, list_categories_endpoint},
    dashboard::get_dashboard_endpoint,
    endpoints,
    transaction::{
        create_transaction_endpoint, delete_transaction_endpoint, get_transactions_endpoint,
    },
};

/// Return a router with all the app's routes.
pub fn build_router(state: AppState) -> Router {
    let unprotected_routes = Router::new()
        .route(endpoints::COFFEE, get(get_coffee))
        .route(endpoints::REGISTER, post(register_endpoint))
        .route(endpoints::LOG_IN, post(log_in_endpoint))
        .route(endpoints::LOG_OUT, post(log_out_endpoint));

    let protected_routes = Router::new()
        .route(endpoints::DASHBOARD, get(get_dashboard_endpoint))
        .route(
            endpoints::CATEGORIES,
            get(list_categories_endpoint).post(create_category_endpoint),
        )
        .route(endpoints::CATEGORY, delete(delete_category_endpoint))
        .route(
            endpoints::TRANSACTIONS,
            get(get_transactions_endpoint).post(create_transaction_endpoint),
        )
        .route(endpoints::TRANSACTION, delete(delete_transaction_endpoint))
        .route(
            endpoints::BUDGETS,
            get(get_budgets_endpoint).post(create_budget_endpoint),
        )
        .route(endpoints::BUDGET, delete(delete_budget_endpoint))
        .layer(middleware::from_fn_with_state(state.clone(), auth_guard));

    protected_routes
        .merge(unprotected_routes)
        .fallback(get_404_not_found)
        .with_state(state)
}

/// Attempt to get a cup of coffee from the server.
async fn get_coffee() -> Response {
    (StatusCode::IM_A_TEAPOT, Html("I'm a teapot")).into_response()
}

/// The JSON body returned for unknown routes.
async fn get_404_not_found() -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(json!({ "error": "not found" })),
    )
        .into_response()
}

#[cfg(test)]
mod routing_tests {
    use axum::http::StatusCode;
    use serde_json::{Value, json};

    use crate::test_utils::{logged_in_server, new_test_server, new_test_state};

    #[tokio::test]
    async fn coffee_is_a_teapot() {
        let server = new_test_server(new_test_state());

        let response = server.get("/coffee").await;

        response.assert_status(StatusCode::IM_A_TEAPOT);
    }

    #[tokio::test]
    async fn unknown_route_returns_json_404() {
        let server = new_test_server(new_test_state());

        let response = server.get("/api/does_not_exist").await;

        response.assert_status(StatusCode::NOT_FOUND);
        let body: Value = response.json();
        assert_eq!(body["error"], json!("not found"));
    }

    #[tokio::test]
    async fn protected_routes_reject_anonymous_requests() {
        let server = new_test_server(new_test_state());

        for route in [
            "/api/dashboard",
            "/api/categories",
            "/api/transactions",
            "/api/budgets",
        ] {
            let response = server.get(route).await;

            response.assert_status(StatusCode::UNAUTHORIZED);
        }
    }

    #[tokio::test]
    async fn protected_routes_accept_logged_in_requests() {
        let (server, _, _) = logged_in_server().await;

        for route in [
            "/api/dashboard",
            "/api/categories",
            "/api/transactions",
            "/api/budgets",
        ] {
            let response = server.get(route).await;

            response.assert_status_ok();
        }
    }
}
