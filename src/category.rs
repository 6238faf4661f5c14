//! This file defines the `Category` type and its query/action endpoints.
//!
//! Categories come in two flavours: system categories are seeded at start-up,
//! shared by all users and immutable; user categories are private to their
//! creator. Every transaction and budget allocation references a category,
//! and the category's type must match the referencing record's role.

use std::fmt::Display;

use axum::{
    Extension, Json,
    extract::{Path, State},
    response::IntoResponse,
};
use rusqlite::{Connection, Row};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::{Error, database_id::CategoryId, state::AppState, user::UserId};

/// Whether a category (and the transactions that reference it) records money
/// coming in or going out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Hash)]
#[serde(rename_all = "lowercase")]
pub enum CategoryType {
    /// Money coming in, e.g. salary.
    Income,
    /// Money going out, e.g. groceries.
    Expense,
}

impl CategoryType {
    /// The string stored in the database for this category type.
    pub fn as_str(&self) -> &'static str {
        match self {
            CategoryType::Income => "income",
            CategoryType::Expense => "expense",
        }
    }
}

impl Display for CategoryType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The name of a category.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, Hash)]
pub struct CategoryName(String);

impl CategoryName {
    /// Create a category name.
    ///
    /// # Errors
    ///
    /// This function will return an error if `name` is an empty string.
    pub fn new(name: &str) -> Result<Self, Error> {
        if name.trim().is_empty() {
            Err(Error::EmptyCategoryName)
        } else {
            Ok(Self(name.to_string()))
        }
    }

    /// Create a category name without validation.
    ///
    /// The caller should ensure that the string is not empty.
    pub fn new_unchecked(name: &str) -> Self {
        Self(name.to_string())
    }
}

impl AsRef<str> for CategoryName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Display for CategoryName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A category for income or expenses, e.g. 'Food & Dining', 'Salary'.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    /// The ID of the category.
    pub id: CategoryId,
    /// The name of the category.
    pub name: CategoryName,
    /// Whether the category is for income or expense transactions.
    #[serde(rename = "type")]
    pub category_type: CategoryType,
    /// Whether the category is shared by all users.
    pub is_system: bool,
    /// The owner of the category. `None` for system categories.
    pub user_id: Option<UserId>,
}

// ============================================================================
// DATABASE FUNCTIONS
// ============================================================================

/// The categories every user starts with, seeded once at start-up.
const SYSTEM_CATEGORIES: [(&str, CategoryType); 19] = [
    ("Food & Dining", CategoryType::Expense),
    ("Transportation", CategoryType::Expense),
    ("Housing", CategoryType::Expense),
    ("Utilities", CategoryType::Expense),
    ("Healthcare", CategoryType::Expense),
    ("Education", CategoryType::Expense),
    ("Entertainment", CategoryType::Expense),
    ("Shopping", CategoryType::Expense),
    ("Personal Care", CategoryType::Expense),
    ("Travel", CategoryType::Expense),
    ("Gifts & Donations", CategoryType::Expense),
    ("Business", CategoryType::Expense),
    ("Other Expenses", CategoryType::Expense),
    ("Salary", CategoryType::Income),
    ("Business Income", CategoryType::Income),
    ("Investments", CategoryType::Income),
    ("Rental Income", CategoryType::Income),
    ("Gifts", CategoryType::Income),
    ("Other Income", CategoryType::Income),
];

/// Create the category table.
///
/// # Errors
///
/// This function will return an error if the SQL query failed.
pub fn create_category_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS category (
                id INTEGER PRIMARY KEY,
                name TEXT NOT NULL,
                type TEXT NOT NULL CHECK (type IN ('income', 'expense')),
                is_system INTEGER NOT NULL DEFAULT 0,
                user_id INTEGER REFERENCES user(id) ON DELETE CASCADE
                )",
        (),
    )?;

    Ok(())
}

/// Insert the system categories if they have not been seeded yet.
///
/// # Errors
///
/// This function will return an error if the SQL query failed.
pub fn seed_system_categories(connection: &Connection) -> Result<(), rusqlite::Error> {
    let count: i64 = connection.query_row(
        "SELECT COUNT(*) FROM category WHERE is_system = 1",
        [],
        |row| row.get(0),
    )?;

    if count > 0 {
        return Ok(());
    }

    let mut statement = connection
        .prepare("INSERT INTO category (name, type, is_system) VALUES (?1, ?2, 1)")?;

    for (name, category_type) in SYSTEM_CATEGORIES {
        statement.execute((name, category_type.as_str()))?;
    }

    Ok(())
}

/// Parse the `type` column of a row into a [CategoryType].
///
/// `column` is only used to report which column held the bad value.
pub(crate) fn parse_category_type(
    raw: &str,
    column: usize,
) -> Result<CategoryType, rusqlite::Error> {
    match raw {
        "income" => Ok(CategoryType::Income),
        "expense" => Ok(CategoryType::Expense),
        other => Err(rusqlite::Error::FromSqlConversionFailure(
            column,
            rusqlite::types::Type::Text,
            format!("invalid category type {other:?}").into(),
        )),
    }
}

/// Convert a database row into a [Category].
///
/// **Note:** This function expects the columns `id, name, type, is_system,
/// user_id` in that order.
pub(crate) fn map_category_row(row: &Row) -> Result<Category, rusqlite::Error> {
    map_category_row_at(row, 0)
}

/// Convert the columns `id, name, type, is_system, user_id` starting at
/// `offset` into a [Category]. Used for rows that join category onto another
/// table.
pub(crate) fn map_category_row_at(row: &Row, offset: usize) -> Result<Category, rusqlite::Error> {
    let id = row.get(offset)?;
    let raw_name: String = row.get(offset + 1)?;
    let raw_type: String = row.get(offset + 2)?;
    let is_system = row.get(offset + 3)?;
    let raw_user_id: Option<i64> = row.get(offset + 4)?;

    let category_type = parse_category_type(&raw_type, offset + 2)?;

    Ok(Category {
        id,
        name: CategoryName::new_unchecked(&raw_name),
        category_type,
        is_system,
        user_id: raw_user_id.map(UserId::new),
    })
}

/// Create a new user category in the database.
///
/// # Errors
/// This function will return an error if there is an SQL error.
pub fn create_category(
    name: CategoryName,
    category_type: CategoryType,
    user_id: UserId,
    connection: &Connection,
) -> Result<Category, Error> {
    connection.execute(
        "INSERT INTO category (name, type, is_system, user_id) VALUES (?1, ?2, 0, ?3)",
        (name.as_ref(), category_type.as_str(), user_id.as_i64()),
    )?;

    let id = connection.last_insert_rowid();

    Ok(Category {
        id,
        name,
        category_type,
        is_system: false,
        user_id: Some(user_id),
    })
}

/// Get a category by its `category_id`.
///
/// # Errors
/// This function will return an [Error::NotFound] if the category does not
/// exist, or an [Error::SqlError] if there is some other SQL error.
pub fn get_category(category_id: CategoryId, connection: &Connection) -> Result<Category, Error> {
    connection
        .prepare("SELECT id, name, type, is_system, user_id FROM category WHERE id = :id")?
        .query_row(&[(":id", &category_id)], map_category_row)
        .map_err(|error| error.into())
}

/// Get the categories visible to `user_id`: all system categories followed
/// by the user's own categories.
///
/// # Errors
/// This function will return an error if there is an SQL error.
pub fn list_categories(user_id: UserId, connection: &Connection) -> Result<Vec<Category>, Error> {
    connection
        .prepare(
            "SELECT id, name, type, is_system, user_id FROM category
             WHERE is_system = 1 OR user_id = :user_id
             ORDER BY is_system DESC, id ASC",
        )?
        .query_map(&[(":user_id", &user_id.as_i64())], map_category_row)?
        .map(|maybe_category| maybe_category.map_err(|error| error.into()))
        .collect()
}

/// Delete the user category with `category_id`.
///
/// # Errors
/// This function will return:
/// - [Error::NotFound] if the category does not exist,
/// - [Error::SystemCategoryImmutable] if the category is a system category,
/// - [Error::Forbidden] if the category belongs to another user.
pub fn delete_category(
    category_id: CategoryId,
    user_id: UserId,
    connection: &Connection,
) -> Result<(), Error> {
    let category = get_category(category_id, connection)?;

    if category.is_system {
        return Err(Error::SystemCategoryImmutable);
    }

    if category.user_id != Some(user_id) {
        return Err(Error::Forbidden);
    }

    connection.execute(
        "DELETE FROM category WHERE id = :id",
        &[(":id", &category_id)],
    )?;

    Ok(())
}

// ============================================================================
// ROUTE HANDLERS
// ============================================================================

/// The data needed to create a new user category.
#[derive(Debug, Deserialize)]
pub struct CategoryData {
    /// The name of the new category.
    pub name: String,
    /// Whether the new category is for income or expenses.
    #[serde(rename = "type")]
    pub category_type: CategoryType,
}

/// A route handler for listing the categories visible to the caller.
pub async fn list_categories_endpoint(
    State(state): State<AppState>,
    Extension(user_id): Extension<UserId>,
) -> Result<impl IntoResponse, Error> {
    let connection = state
        .db_connection
        .lock()
        .map_err(|_| Error::DatabaseLockError)?;

    list_categories(user_id, &connection).map(Json)
}

/// A route handler for creating a new user category.
pub async fn create_category_endpoint(
    State(state): State<AppState>,
    Extension(user_id): Extension<UserId>,
    Json(data): Json<CategoryData>,
) -> Result<impl IntoResponse, Error> {
    let name = CategoryName::new(&data.name)?;

    let connection = state
        .db_connection
        .lock()
        .map_err(|_| Error::DatabaseLockError)?;

    create_category(name, data.category_type, user_id, &connection).map(Json)
}

/// A route handler for deleting a user category.
pub async fn delete_category_endpoint(
    State(state): State<AppState>,
    Extension(user_id): Extension<UserId>,
    Path(category_id): Path<CategoryId>,
) -> Result<impl IntoResponse, Error> {
    let connection = state
        .db_connection
        .lock()
        .map_err(|_| Error::DatabaseLockError)?;

    delete_category(category_id, user_id, &connection)?;

    Ok(Json(json!({ "success": true })))
}
