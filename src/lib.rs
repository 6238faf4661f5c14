//! Bajeti is a web app for tracking your income, expenses and monthly
//! budgets.
//!
//! This library provides an authenticated JSON API over a SQLite database:
//! income/expense transactions recorded against categories, one budget per
//! month with per-category allocations, and a dashboard summarising the
//! current month against the previous one.

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_server::Handle;
use serde_json::json;
use tokio::signal;

mod auth;
mod budget;
mod category;
mod dashboard;
mod database_id;
mod db;
mod endpoints;
mod logging;
mod routing;
mod state;
#[cfg(test)]
mod test_utils;
mod transaction;
mod user;

pub use auth::{PasswordHash, ValidatedPassword};
pub use category::CategoryType;
pub use db::initialize as initialize_db;
pub use logging::logging_middleware;
pub use routing::build_router;
pub use state::AppState;
pub use user::{User, UserId};

/// An async task that waits for either the ctrl+c or terminate signal,
/// whichever comes first, and then signals the server to shut down
/// gracefully.
///
/// `handle` is a handle to an Axum `Server`.
pub async fn graceful_shutdown(handle: Handle<SocketAddr>) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::debug!("Received ctrl+c signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
        _ = terminate => {
            tracing::debug!("Received terminate signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
    }
}

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// The request did not carry a valid auth cookie.
    #[error("you must be logged in")]
    Unauthorized,

    /// The username or password did not match a registered user.
    #[error("the username or password is incorrect")]
    InvalidCredentials,

    /// The user provided a password that is too easy to guess.
    #[error("password is too weak: {0}")]
    TooWeak(String),

    /// An unexpected error occurred with the underlying hashing library.
    ///
    /// The error string should only be logged for debugging on the server.
    /// When communicating with the application client this error should be
    /// replaced with a general error type indicating an internal server
    /// error.
    #[error("hashing failed: {0}")]
    HashingError(String),

    /// The username used to register already belongs to another user.
    #[error("the username \"{0}\" is already taken")]
    DuplicateUsername(String),

    /// An empty string was used as a username.
    #[error("username cannot be empty")]
    EmptyUsername,

    /// A transaction was created with a zero or negative amount.
    #[error("amount must be greater than 0, got {0}")]
    NonPositiveAmount(f64),

    /// A transaction was created with an empty description.
    #[error("description is required")]
    EmptyDescription,

    /// The referenced category is not of the type the operation expects,
    /// e.g. an income transaction pointing at an expense category.
    #[error("category type must be {0}")]
    CategoryTypeMismatch(CategoryType),

    /// An empty string was used to create a category name.
    #[error("category name cannot be empty")]
    EmptyCategoryName,

    /// Tried to delete a category that is shared by all users.
    #[error("system categories cannot be deleted")]
    SystemCategoryImmutable,

    /// A budget was created with a month outside 1-12.
    #[error("month must be between 1 and 12, got {0}")]
    MonthOutOfRange(u8),

    /// A budget was created with no category allocations.
    #[error("at least one category allocation is required")]
    EmptyBudget,

    /// One or more of a budget's category ids did not resolve to an
    /// existing expense category, or the same id was given twice.
    #[error("one or more categories are invalid or not expense categories")]
    InvalidBudgetCategories,

    /// The caller already has a budget for the given month and year.
    #[error("a budget for {month}/{year} already exists")]
    DuplicateBudget {
        /// The month of the existing budget, 1-12.
        month: u8,
        /// The year of the existing budget.
        year: i32,
    },

    /// The requested resource was not found.
    ///
    /// The client should check that the parameters (e.g., ID) are correct
    /// and that the resource has been created. Internally, this error may
    /// occur when a query returns no rows.
    #[error("the requested resource could not be found")]
    NotFound,

    /// The resource exists but belongs to another user.
    #[error("you do not have permission to access this resource")]
    Forbidden,

    /// Could not acquire the database lock.
    #[error("could not acquire the database lock")]
    DatabaseLockError,

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        match value {
            rusqlite::Error::QueryReturnedNoRows => Error::NotFound,
            error => {
                tracing::error!("an unhandled SQL error occurred: {}", error);
                Error::SqlError(error)
            }
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = match &self {
            Error::Unauthorized | Error::InvalidCredentials => StatusCode::UNAUTHORIZED,
            Error::NotFound => StatusCode::NOT_FOUND,
            Error::Forbidden | Error::SystemCategoryImmutable => StatusCode::FORBIDDEN,
            Error::TooWeak(_)
            | Error::DuplicateUsername(_)
            | Error::EmptyUsername
            | Error::NonPositiveAmount(_)
            | Error::EmptyDescription
            | Error::CategoryTypeMismatch(_)
            | Error::EmptyCategoryName
            | Error::MonthOutOfRange(_)
            | Error::EmptyBudget
            | Error::InvalidBudgetCategories
            | Error::DuplicateBudget { .. } => StatusCode::BAD_REQUEST,
            Error::HashingError(_) | Error::DatabaseLockError | Error::SqlError(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        // Internal errors are not intended to be shown to the client.
        let message = if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!("An unexpected error occurred: {}", self);
            "an unexpected error occurred, check the server logs for more details".to_owned()
        } else {
            self.to_string()
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}

#[cfg(test)]
mod error_tests {
    use axum::{http::StatusCode, response::IntoResponse};

    use crate::Error;

    #[test]
    fn unauthorized_maps_to_401() {
        let response = Error::Unauthorized.into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn validation_errors_map_to_400() {
        for error in [
            Error::NonPositiveAmount(-5.0),
            Error::EmptyDescription,
            Error::MonthOutOfRange(13),
            Error::EmptyBudget,
            Error::DuplicateBudget {
                month: 6,
                year: 2025,
            },
        ] {
            let response = error.into_response();
            assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        }
    }

    #[test]
    fn ownership_errors_map_to_403() {
        let response = Error::Forbidden.into_response();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[test]
    fn sql_errors_map_to_500() {
        let response = Error::SqlError(rusqlite::Error::InvalidQuery).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
