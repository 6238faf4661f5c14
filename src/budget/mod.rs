//! Plans and queries monthly spending budgets.

mod core;
mod create_budget_endpoint;
mod delete_budget_endpoint;
mod get_budgets_endpoint;

pub use core::{create_budget_category_table, create_budget_table, get_budget_total};
pub use create_budget_endpoint::create_budget_endpoint;
pub use delete_budget_endpoint::delete_budget_endpoint;
pub use get_budgets_endpoint::get_budgets_endpoint;

#[cfg(test)]
pub use core::{BudgetAllocation, BudgetData, create_budget};
