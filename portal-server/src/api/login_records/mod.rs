//! Login Audit API Module (administrators only)

mod handler;

use axum::{
    Router, middleware,
    routing::{delete, get},
};

use crate::auth::require_admin;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/login-records", get(handler::list))
        .route("/api/login-records/{id}", delete(handler::delete))
        .route_layer(middleware::from_fn(require_admin))
}
