//! Defines the core data model and database queries for monthly budgets.
//!
//! A budget belongs to one user and one calendar month, and holds an amount
//! allocated per expense category. A user can have at most one budget per
//! month, enforced by a unique constraint on the budget table.

use rusqlite::{Connection, Row, Transaction as SqlTransaction, TransactionBehavior};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::{
    Error,
    category::{Category, CategoryType, get_category, map_category_row_at},
    database_id::{BudgetId, CategoryId, DatabaseId},
    user::UserId,
};

/// A plan for how much to spend per expense category in one calendar month.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Budget {
    /// The ID of the budget.
    pub id: BudgetId,
    /// The owner of the budget.
    pub user_id: UserId,
    /// The calendar month the budget covers (1 = January).
    pub month: u8,
    /// The calendar year the budget covers.
    pub year: i32,
    /// When the budget row was created.
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

/// An amount allocated to one expense category within a budget, with the
/// category resolved.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BudgetCategory {
    /// The ID of the allocation row.
    pub id: DatabaseId,
    /// The amount of money allocated.
    pub amount: f64,
    /// The expense category the money is allocated to.
    pub category: Category,
}

/// A budget with its per-category allocations expanded.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BudgetWithCategories {
    /// The budget itself.
    #[serde(flatten)]
    pub budget: Budget,
    /// The budget's per-category allocations.
    pub categories: Vec<BudgetCategory>,
}

/// One requested allocation in a create-budget request.
#[derive(Debug, Deserialize)]
pub struct BudgetAllocation {
    /// The expense category to allocate money to.
    pub category_id: CategoryId,
    /// The amount of money to allocate.
    pub amount: f64,
}

/// The data needed to create a new budget.
#[derive(Debug, Deserialize)]
pub struct BudgetData {
    /// The calendar month the budget covers (1 = January).
    pub month: u8,
    /// The calendar year the budget covers.
    pub year: i32,
    /// The per-category allocations. Must be non-empty and reference only
    /// expense categories.
    pub categories: Vec<BudgetAllocation>,
}

/// Create the budget table.
///
/// The unique constraint on `(user_id, month, year)` guarantees at most one
/// budget per user per calendar month.
///
/// # Errors
///
/// This function will return an error if the SQL query failed.
pub fn create_budget_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS budget (
                id INTEGER PRIMARY KEY,
                user_id INTEGER NOT NULL REFERENCES user(id) ON DELETE CASCADE,
                month INTEGER NOT NULL,
                year INTEGER NOT NULL,
                created_at TEXT NOT NULL,
                UNIQUE(user_id, month, year)
                )",
        (),
    )?;

    Ok(())
}

/// Create the budget allocation table.
///
/// # Errors
///
/// This function will return an error if the SQL query failed.
pub fn create_budget_category_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS budget_category (
                id INTEGER PRIMARY KEY,
                budget_id INTEGER NOT NULL REFERENCES budget(id) ON DELETE CASCADE,
                category_id INTEGER NOT NULL REFERENCES category(id),
                amount REAL NOT NULL
                )",
        (),
    )?;

    Ok(())
}

/// Convert a database row into a [Budget].
///
/// **Note:** This function expects the budget table's columns in the order
/// they were defined.
fn map_budget_row(row: &Row) -> Result<Budget, rusqlite::Error> {
    Ok(Budget {
        id: row.get(0)?,
        user_id: UserId::new(row.get(1)?),
        month: row.get(2)?,
        year: row.get(3)?,
        created_at: row.get(4)?,
    })
}

/// Validate and create a new budget owned by `user_id`, along with its
/// per-category allocations, in a single SQL transaction.
///
/// # Errors
/// This function will return:
/// - [Error::MonthOutOfRange] if `data.month` is not in `1..=12`,
/// - [Error::EmptyBudget] if `data.categories` is empty,
/// - [Error::InvalidBudgetCategories] if any referenced category does not
///   exist or is not an expense category,
/// - [Error::DuplicateBudget] if the user already has a budget for the
///   month,
/// - [Error::SqlError] if there is some other SQL error.
pub fn create_budget(
    data: BudgetData,
    user_id: UserId,
    connection: &Connection,
) -> Result<BudgetWithCategories, Error> {
    if !(1..=12).contains(&data.month) {
        return Err(Error::MonthOutOfRange(data.month));
    }

    if data.categories.is_empty() {
        return Err(Error::EmptyBudget);
    }

    let mut resolved = Vec::with_capacity(data.categories.len());

    for allocation in &data.categories {
        let category = match get_category(allocation.category_id, connection) {
            Ok(category) => category,
            Err(Error::NotFound) => return Err(Error::InvalidBudgetCategories),
            Err(error) => return Err(error),
        };

        if category.category_type != CategoryType::Expense {
            return Err(Error::InvalidBudgetCategories);
        }

        resolved.push(category);
    }

    let created_at = OffsetDateTime::now_utc();
    let sql_transaction =
        SqlTransaction::new_unchecked(connection, TransactionBehavior::Exclusive)?;

    let budget = sql_transaction
        .prepare(
            "INSERT INTO budget (user_id, month, year, created_at)
             VALUES (?1, ?2, ?3, ?4)
             RETURNING id, user_id, month, year, created_at",
        )?
        .query_row(
            (user_id.as_i64(), data.month, data.year, created_at),
            map_budget_row,
        )
        .map_err(|error| match error {
            rusqlite::Error::SqliteFailure(
                rusqlite::ffi::Error {
                    code: _,
                    extended_code: rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE,
                },
                _,
            ) => Error::DuplicateBudget {
                month: data.month,
                year: data.year,
            },
            error => error.into(),
        })?;

    let mut categories = Vec::with_capacity(data.categories.len());

    for (allocation, category) in data.categories.iter().zip(resolved) {
        let id: DatabaseId = sql_transaction
            .prepare(
                "INSERT INTO budget_category (budget_id, category_id, amount)
                 VALUES (?1, ?2, ?3)
                 RETURNING id",
            )?
            .query_row(
                (budget.id, allocation.category_id, allocation.amount),
                |row| row.get(0),
            )?;

        categories.push(BudgetCategory {
            id,
            amount: allocation.amount,
            category,
        });
    }

    sql_transaction.commit()?;

    Ok(BudgetWithCategories { budget, categories })
}

/// Delete the budget with `budget_id` and its allocations.
///
/// # Errors
/// This function will return:
/// - [Error::NotFound] if the budget does not exist,
/// - [Error::Forbidden] if the budget belongs to another user.
pub fn delete_budget(
    budget_id: BudgetId,
    user_id: UserId,
    connection: &Connection,
) -> Result<(), Error> {
    let owner_id: i64 = connection
        .prepare("SELECT user_id FROM budget WHERE id = :id")?
        .query_row(&[(":id", &budget_id)], |row| row.get(0))
        .map_err(Error::from)?;

    if owner_id != user_id.as_i64() {
        return Err(Error::Forbidden);
    }

    // ON DELETE CASCADE removes the budget_category rows.
    connection.execute("DELETE FROM budget WHERE id = :id", &[(":id", &budget_id)])?;

    Ok(())
}

/// Get all of the user's budgets with their allocations expanded, newest
/// month first.
///
/// # Errors
/// This function will return an error if there is an SQL error.
pub fn get_budgets(
    user_id: UserId,
    connection: &Connection,
) -> Result<Vec<BudgetWithCategories>, Error> {
    let budgets: Vec<Budget> = connection
        .prepare(
            "SELECT id, user_id, month, year, created_at
             FROM budget
             WHERE user_id = :user_id
             ORDER BY year DESC, month DESC",
        )?
        .query_map(&[(":user_id", &user_id.as_i64())], map_budget_row)?
        .collect::<Result<_, _>>()?;

    budgets
        .into_iter()
        .map(|budget| {
            let categories = get_budget_categories(budget.id, connection)?;
            Ok(BudgetWithCategories { budget, categories })
        })
        .collect()
}

/// Get the sum allocated across all of a budget's categories for the given
/// month, if the user has a budget for that month.
///
/// # Errors
/// This function will return an error if there is an SQL error.
pub fn get_budget_total(
    month: u8,
    year: i32,
    user_id: UserId,
    connection: &Connection,
) -> Result<Option<f64>, Error> {
    let budget_id = connection
        .prepare("SELECT id FROM budget WHERE user_id = :user_id AND month = :month AND year = :year")?
        .query_row(
            rusqlite::named_params! {
                ":user_id": user_id.as_i64(),
                ":month": month,
                ":year": year,
            },
            |row| row.get::<_, BudgetId>(0),
        );

    let budget_id = match budget_id {
        Ok(budget_id) => budget_id,
        Err(rusqlite::Error::QueryReturnedNoRows) => return Ok(None),
        Err(error) => return Err(error.into()),
    };

    let total = connection.query_one(
        "SELECT COALESCE(SUM(amount), 0.0) FROM budget_category WHERE budget_id = ?1",
        [budget_id],
        |row| row.get(0),
    )?;

    Ok(Some(total))
}

/// Get a budget's allocations with their categories resolved.
fn get_budget_categories(
    budget_id: BudgetId,
    connection: &Connection,
) -> Result<Vec<BudgetCategory>, Error> {
    connection
        .prepare(
            "SELECT bc.id, bc.amount,
                    c.id, c.name, c.type, c.is_system, c.user_id
             FROM budget_category bc
             INNER JOIN category c ON bc.category_id = c.id
             WHERE bc.budget_id = :budget_id
             ORDER BY bc.id ASC",
        )?
        .query_map(&[(":budget_id", &budget_id)], |row| {
            Ok(BudgetCategory {
                id: row.get(0)?,
                amount: row.get(1)?,
                category: map_category_row_at(row, 2)?,
            })
        })?
        .map(|maybe_category| maybe_category.map_err(|error| error.into()))
        .collect()
}
