//! Database schema initialization.

use rusqlite::{Connection, Transaction as SqlTransaction, TransactionBehavior};

use crate::{
    Error,
    budget::{create_budget_category_table, create_budget_table},
    category::{create_category_table, seed_system_categories},
    transaction::create_transaction_table,
    user::create_user_table,
};

/// Create the application's tables and seed the system categories.
///
/// Table creation uses `IF NOT EXISTS`, so calling this on an existing
/// database is a no-op. The whole setup runs in a single exclusive
/// transaction.
///
/// # Errors
/// Returns an [Error::SqlError] if there was an SQL error.
pub fn initialize(connection: &Connection) -> Result<(), Error> {
    connection.execute("PRAGMA foreign_keys = ON", ())?;

    let transaction =
        SqlTransaction::new_unchecked(connection, TransactionBehavior::Exclusive)?;

    create_user_table(&transaction)?;
    create_category_table(&transaction)?;
    create_transaction_table(&transaction)?;
    create_budget_table(&transaction)?;
    create_budget_category_table(&transaction)?;
    seed_system_categories(&transaction)?;

    transaction.commit()?;

    Ok(())
}
