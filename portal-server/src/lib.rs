//! portal-server - clinic staff portal backend
//!
//! - Employee login (ID + nickname) with JWT sessions
//! - Daily customer roster from the booking system feed
//! - Execution ledger with role-based fees
//! - Personal and clinic-wide earnings stats
//! - Employee, fee schedule and login audit administration

pub mod api;
pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod ledger;
pub mod login;
pub mod roster;
pub mod state;
pub mod stats;
pub mod utils;

pub use config::{Config, NicknamePolicy};
pub use error::{ServiceError, ServiceResult};
pub use state::AppState;

pub type BoxError = Box<dyn std::error::Error + Send + Sync>;
