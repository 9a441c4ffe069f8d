//! Data models
//!
//! Shared between the portal server and the browser client (via API).
//! DB row types use `#[cfg_attr(feature = "db", derive(sqlx::FromRow))]`.
//! Timestamps are Unix milliseconds; calendar dates are `YYYY-MM-DD` strings.

pub mod appointment;
pub mod capability;
pub mod employee;
pub mod execution;
pub mod login_record;
pub mod roster;
pub mod stats;
pub mod treatment;

// Re-exports
pub use appointment::*;
pub use capability::*;
pub use employee::*;
pub use execution::*;
pub use login_record::*;
pub use roster::*;
pub use stats::*;
pub use treatment::*;
