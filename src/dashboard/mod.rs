//! Summarises a user's month-to-date finances.

mod aggregation;
mod get_dashboard_endpoint;

pub use get_dashboard_endpoint::get_dashboard_endpoint;
