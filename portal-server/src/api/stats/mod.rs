//! Stats API Module

mod handler;

use axum::{Router, routing::get};

use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/stats/me", get(handler::my_totals))
        .route("/api/stats/clinic", get(handler::clinic_totals))
}
