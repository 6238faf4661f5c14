//! Records and queries the money a user has earned and spent.

mod core;
mod create_transaction_endpoint;
mod delete_transaction_endpoint;
mod get_transactions_endpoint;

pub use core::{TransactionWithCategory, create_transaction_table, get_transactions};
pub use create_transaction_endpoint::create_transaction_endpoint;
pub use delete_transaction_endpoint::delete_transaction_endpoint;
pub use get_transactions_endpoint::get_transactions_endpoint;

#[cfg(test)]
pub use core::{Transaction, TransactionData, create_transaction};
