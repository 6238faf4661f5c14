//! Route path constants for the JSON API.

/// Attempt to get a cup of coffee from the server.
pub const COFFEE: &str = "/coffee";

/// Create a new user account.
pub const REGISTER: &str = "/api/register";
/// Log in with a username and password.
pub const LOG_IN: &str = "/api/log_in";
/// Log out and clear the auth cookie.
pub const LOG_OUT: &str = "/api/log_out";

/// List (GET) or create (POST) categories.
pub const CATEGORIES: &str = "/api/categories";
/// Delete a category by ID.
pub const CATEGORY: &str = "/api/categories/{category_id}";

/// List (GET) or create (POST) transactions.
pub const TRANSACTIONS: &str = "/api/transactions";
/// Delete a transaction by ID.
pub const TRANSACTION: &str = "/api/transactions/{transaction_id}";

/// List (GET) or create (POST) budgets.
pub const BUDGETS: &str = "/api/budgets";
/// Delete a budget by ID.
pub const BUDGET: &str = "/api/budgets/{budget_id}";

/// The dashboard summary for the current month.
pub const DASHBOARD: &str = "/api/dashboard";
