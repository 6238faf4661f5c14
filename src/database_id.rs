//! Database ID type definitions.

/// Alias for the integer type used for mapping to database IDs.
pub type DatabaseId = i64;
/// The ID of a row in the category table.
pub type CategoryId = i64;
/// The ID of a row in the transaction table.
pub type TransactionId = i64;
/// The ID of a row in the budget table.
pub type BudgetId = i64;
