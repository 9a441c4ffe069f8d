//! Shared types for the clinic staff portal
//!
//! Domain models, error codes and small utilities used by the portal server
//! and serialized to the browser client.

pub mod error;
pub mod models;
pub mod session;
pub mod util;

// Re-exports
pub use axum::{Json, body};
pub use http;
pub use serde::{Deserialize, Serialize};

pub use error::{ApiResponse, AppError, AppResult, ErrorCategory, ErrorCode};
