//! Defines the core data model and database queries for transactions.

use rusqlite::{Connection, Row};
use serde::{Deserialize, Serialize};
use time::{Date, OffsetDateTime};

use crate::{
    Error,
    category::{Category, CategoryType, get_category, map_category_row_at, parse_category_type},
    database_id::{CategoryId, TransactionId},
    user::UserId,
};

/// An income or expense, i.e. an event where money was either earned or
/// spent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// The ID of the transaction.
    pub id: TransactionId,
    /// The owner of the transaction.
    pub user_id: UserId,
    /// The category the transaction belongs to.
    pub category_id: CategoryId,
    /// The amount of money earned or spent. Always positive; the direction
    /// is given by `type`.
    pub amount: f64,
    /// A text description of what the transaction was for.
    pub description: String,
    /// Whether money was earned or spent.
    #[serde(rename = "type")]
    pub transaction_type: CategoryType,
    /// When the transaction happened. Always the creation date; callers
    /// cannot backdate transactions.
    pub date: Date,
    /// When the transaction row was created.
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

/// A transaction joined with its resolved category.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TransactionWithCategory {
    /// The transaction itself.
    #[serde(flatten)]
    pub transaction: Transaction,
    /// The category the transaction references.
    pub category: Category,
}

/// The data needed to create a new transaction.
#[derive(Debug, Deserialize)]
pub struct TransactionData {
    /// The amount of money earned or spent. Must be greater than zero.
    pub amount: f64,
    /// What the transaction was for.
    pub description: String,
    /// Whether money was earned or spent.
    #[serde(rename = "type")]
    pub transaction_type: CategoryType,
    /// The category to record the transaction against.
    pub category_id: CategoryId,
}

/// Create the transaction table.
///
/// # Errors
///
/// This function will return an error if the SQL query failed.
pub fn create_transaction_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS \"transaction\" (
                id INTEGER PRIMARY KEY,
                user_id INTEGER NOT NULL REFERENCES user(id) ON DELETE CASCADE,
                category_id INTEGER NOT NULL REFERENCES category(id),
                amount REAL NOT NULL,
                description TEXT NOT NULL,
                type TEXT NOT NULL CHECK (type IN ('income', 'expense')),
                date TEXT NOT NULL,
                created_at TEXT NOT NULL
                )",
        (),
    )?;

    Ok(())
}

/// Convert a database row into a [Transaction].
///
/// **Note:** This function expects the transaction table's columns in the
/// order they were defined.
pub(crate) fn map_transaction_row(row: &Row) -> Result<Transaction, rusqlite::Error> {
    let raw_type: String = row.get(5)?;

    Ok(Transaction {
        id: row.get(0)?,
        user_id: UserId::new(row.get(1)?),
        category_id: row.get(2)?,
        amount: row.get(3)?,
        description: row.get(4)?,
        transaction_type: parse_category_type(&raw_type, 5)?,
        date: row.get(6)?,
        created_at: row.get(7)?,
    })
}

/// Validate and create a new transaction owned by `user_id`.
///
/// The transaction date is set to the current date; callers cannot backdate
/// transactions.
///
/// # Errors
/// This function will return:
/// - [Error::NonPositiveAmount] if `data.amount` is zero or negative,
/// - [Error::EmptyDescription] if `data.description` is blank,
/// - [Error::NotFound] if `data.category_id` does not resolve to a category,
/// - [Error::CategoryTypeMismatch] if the category's type does not match
///   `data.transaction_type`,
/// - [Error::SqlError] if there is some other SQL error.
pub fn create_transaction(
    data: TransactionData,
    user_id: UserId,
    connection: &Connection,
) -> Result<Transaction, Error> {
    if data.amount <= 0.0 {
        return Err(Error::NonPositiveAmount(data.amount));
    }

    if data.description.trim().is_empty() {
        return Err(Error::EmptyDescription);
    }

    let category = get_category(data.category_id, connection)?;
    if category.category_type != data.transaction_type {
        return Err(Error::CategoryTypeMismatch(data.transaction_type));
    }

    let created_at = OffsetDateTime::now_utc();

    connection
        .prepare(
            "INSERT INTO \"transaction\"
                (user_id, category_id, amount, description, type, date, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
             RETURNING id, user_id, category_id, amount, description, type, date, created_at",
        )?
        .query_row(
            (
                user_id.as_i64(),
                data.category_id,
                data.amount,
                &data.description,
                data.transaction_type.as_str(),
                created_at.date(),
                created_at,
            ),
            map_transaction_row,
        )
        .map_err(|error| error.into())
}

/// Delete the transaction with `transaction_id`.
///
/// # Errors
/// This function will return:
/// - [Error::NotFound] if the transaction does not exist,
/// - [Error::Forbidden] if the transaction belongs to another user.
pub fn delete_transaction(
    transaction_id: TransactionId,
    user_id: UserId,
    connection: &Connection,
) -> Result<(), Error> {
    let owner_id: i64 = connection
        .prepare("SELECT user_id FROM \"transaction\" WHERE id = :id")?
        .query_row(&[(":id", &transaction_id)], |row| row.get(0))
        .map_err(Error::from)?;

    if owner_id != user_id.as_i64() {
        return Err(Error::Forbidden);
    }

    connection.execute(
        "DELETE FROM \"transaction\" WHERE id = :id",
        &[(":id", &transaction_id)],
    )?;

    Ok(())
}

/// Get all of the user's transactions joined with their categories, newest
/// first.
///
/// # Errors
/// This function will return an error if there is an SQL error.
pub fn get_transactions(
    user_id: UserId,
    connection: &Connection,
) -> Result<Vec<TransactionWithCategory>, Error> {
    connection
        .prepare(
            "SELECT t.id, t.user_id, t.category_id, t.amount, t.description, t.type,
                    t.date, t.created_at,
                    c.id, c.name, c.type, c.is_system, c.user_id
             FROM \"transaction\" t
             INNER JOIN category c ON t.category_id = c.id
             WHERE t.user_id = :user_id
             ORDER BY t.date DESC, t.id DESC",
        )?
        .query_map(&[(":user_id", &user_id.as_i64())], |row| {
            Ok(TransactionWithCategory {
                transaction: map_transaction_row(row)?,
                category: map_category_row_at(row, 8)?,
            })
        })?
        .map(|maybe_transaction| maybe_transaction.map_err(|error| error.into()))
        .collect()
}
