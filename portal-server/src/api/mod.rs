//! HTTP API
//!
//! One module per resource, each exposing `router()`. Handlers return
//! `ApiResult<T>`; service errors convert into `AppError` via `?`.

pub mod auth;
pub mod employees;
pub mod executions;
pub mod health;
pub mod login_records;
pub mod roster;
pub mod stats;
pub mod treatments;

use axum::{Json, Router, middleware};
use shared::error::{AppError, ErrorCode};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::state::AppState;

pub type ApiResult<T> = Result<Json<T>, AppError>;

/// Log an infrastructure error and hide it behind a generic InternalError
pub(crate) fn internal(e: impl std::fmt::Display) -> AppError {
    tracing::error!("Database error: {e}");
    AppError::new(ErrorCode::InternalError)
}

/// All routes, no middleware
pub fn build_router() -> Router<AppState> {
    Router::new()
        .merge(health::router())
        .merge(auth::router())
        .merge(employees::router())
        .merge(treatments::router())
        .merge(executions::router())
        .merge(roster::router())
        .merge(stats::router())
        .merge(login_records::router())
}

/// Fully configured application (auth, CORS, tracing) with state applied
pub fn build_app(state: AppState) -> Router {
    build_router()
        .layer(middleware::from_fn_with_state(
            state.clone(),
            crate::auth::require_auth,
        ))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
