//! User authentication: password hashing, the auth cookie and the
//! register/log-in/log-out endpoints.
//!
//! Route handlers behind [auth_guard] receive the caller's
//! [UserId](crate::user::UserId) as a request extension; the core
//! operations themselves always take the caller explicitly.

mod cookie;
mod log_in;
mod log_out;
mod middleware;
mod password;
mod register;
mod token;

pub use log_in::log_in_endpoint;
pub use log_out::log_out_endpoint;
pub use middleware::auth_guard;
pub use password::{PasswordHash, ValidatedPassword};
pub use register::register_endpoint;
