//! Pure derivation of the dashboard summary from a user's transactions and
//! budget. Takes today's date as an argument so the month arithmetic can be
//! tested without a real clock.

use serde::Serialize;
use time::{Date, Month};

use crate::{
    category::CategoryType,
    database_id::TransactionId,
    transaction::TransactionWithCategory,
};

/// A month-to-date summary of a user's finances.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardSummary {
    /// Money earned this month.
    pub total_income: f64,
    /// Money spent this month.
    pub total_expenses: f64,
    /// Income minus expenses for this month.
    pub balance: f64,
    /// Percentage change in income compared to the previous month.
    pub income_change: i64,
    /// Percentage change in expenses compared to the previous month.
    pub expense_change: i64,
    /// Percentage change in balance compared to the previous month.
    pub balance_change: i64,
    /// How much of this month's budget has been spent, as a percentage.
    /// `None` when there is no budget for this month.
    pub budget_usage: Option<i64>,
    /// How many days remain in this month. `None` when there is no budget
    /// for this month.
    pub days_left: Option<u8>,
    /// The user's five most recent transactions.
    pub recent_transactions: Vec<RecentTransaction>,
}

/// A compact view of a transaction for the dashboard's recent activity list.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecentTransaction {
    /// The ID of the transaction.
    pub id: TransactionId,
    /// The amount of money earned or spent.
    pub amount: f64,
    /// What the transaction was for.
    pub description: String,
    /// When the transaction happened.
    pub date: Date,
    /// Whether money was earned or spent.
    #[serde(rename = "type")]
    pub transaction_type: CategoryType,
    /// The name of the transaction's category.
    pub category: String,
}

/// How many transactions the recent activity list shows.
const RECENT_TRANSACTION_COUNT: usize = 5;

/// Summarise `transactions` for the month containing `today`.
///
/// `transactions` must be ordered by date descending (the order
/// [get_transactions](crate::transaction::get_transactions) returns them
/// in). `budget_total` is the total amount allocated in this month's budget,
/// or `None` when no budget exists for this month.
///
/// The percentage-change figures compare against the previous calendar
/// month. A previous month with no income counts as a 100% increase, while a
/// previous month with no expenses counts as a 0% change.
pub fn summarize(
    transactions: &[TransactionWithCategory],
    budget_total: Option<f64>,
    today: Date,
) -> DashboardSummary {
    let current_month_start = first_day_of_month(today);
    let previous_month_start = first_day_of_previous_month(today);

    let mut current_income = 0.0;
    let mut current_expenses = 0.0;
    let mut previous_income = 0.0;
    let mut previous_expenses = 0.0;

    for transaction_with_category in transactions {
        let transaction = &transaction_with_category.transaction;

        let (income, expenses) = if transaction.date >= current_month_start {
            (&mut current_income, &mut current_expenses)
        } else if transaction.date >= previous_month_start {
            (&mut previous_income, &mut previous_expenses)
        } else {
            continue;
        };

        match transaction.transaction_type {
            CategoryType::Income => *income += transaction.amount,
            CategoryType::Expense => *expenses += transaction.amount,
        }
    }

    let income_change = if previous_income == 0.0 {
        100
    } else {
        percentage_change(current_income, previous_income)
    };

    let expense_change = if previous_expenses == 0.0 {
        0
    } else {
        percentage_change(current_expenses, previous_expenses)
    };

    let balance = current_income - current_expenses;
    let previous_balance = previous_income - previous_expenses;

    let balance_change = if previous_balance == 0.0 {
        if balance > 0.0 { 100 } else { 0 }
    } else {
        percentage_change(balance, previous_balance)
    };

    let budget_usage = budget_total.map(|total| {
        if total > 0.0 {
            (current_expenses / total * 100.0).round() as i64
        } else {
            0
        }
    });

    let days_left = budget_total.map(|_| days_left_in_month(today));

    let recent_transactions = transactions
        .iter()
        .take(RECENT_TRANSACTION_COUNT)
        .map(|transaction_with_category| RecentTransaction {
            id: transaction_with_category.transaction.id,
            amount: transaction_with_category.transaction.amount,
            description: transaction_with_category.transaction.description.clone(),
            date: transaction_with_category.transaction.date,
            transaction_type: transaction_with_category.transaction.transaction_type,
            category: transaction_with_category.category.name.as_ref().to_owned(),
        })
        .collect();

    DashboardSummary {
        total_income: current_income,
        total_expenses: current_expenses,
        balance,
        income_change,
        expense_change,
        balance_change,
        budget_usage,
        days_left,
        recent_transactions,
    }
}

/// The percentage change from `previous` to `current`, rounded to the
/// nearest whole number. `previous` must be non-zero. The change is relative
/// to the magnitude of `previous`, so a balance going from -100 to 50 is a
/// 150% increase.
fn percentage_change(current: f64, previous: f64) -> i64 {
    ((current - previous) / previous.abs() * 100.0).round() as i64
}

fn first_day_of_month(date: Date) -> Date {
    // The first of the month is always a valid date.
    Date::from_calendar_date(date.year(), date.month(), 1)
        .unwrap_or(date)
}

fn first_day_of_previous_month(date: Date) -> Date {
    let (year, month) = if date.month() == Month::January {
        (date.year() - 1, Month::December)
    } else {
        (date.year(), date.month().previous())
    };

    Date::from_calendar_date(year, month, 1).unwrap_or(date)
}

fn days_left_in_month(today: Date) -> u8 {
    today.month().length(today.year()) - today.day()
}
