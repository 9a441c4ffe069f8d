//! Treatment (fee schedule) API Module

mod handler;

use axum::{
    Router,
    routing::{get, put},
};

use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().nest("/api/treatments", routes())
}

fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handler::list_active).post(handler::create))
        .route("/all", get(handler::list_all))
        .route("/{id}", put(handler::update).delete(handler::delete))
}
