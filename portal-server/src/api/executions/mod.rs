//! Execution Recorder API Module

mod handler;

use axum::{
    Router,
    routing::{delete, get, post, put},
};

use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().nest("/api/executions", routes())
}

fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handler::list_for_date).post(handler::record))
        .route("/batch", post(handler::record_batch))
        .route("/mine", get(handler::list_mine))
        .route("/{id}", delete(handler::delete))
        .route("/{id}/assignment", put(handler::reassign))
}
