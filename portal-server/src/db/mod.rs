//! PostgreSQL repositories
//!
//! Plain async functions over `&PgPool` (or any `PgExecutor` where a
//! transaction is needed). Business rules live in the service modules.

pub mod appointments;
pub mod employees;
pub mod executions;
pub mod login_records;
pub mod treatments;
