//! Auth API Module
//!
//! Login steps (`identify`, `setup`, `verify`) are public; the rest require a
//! bearer token.

mod handler;

use axum::{
    Router,
    routing::{get, post, put},
};

use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().nest("/api/auth", routes())
}

fn routes() -> Router<AppState> {
    Router::new()
        .route("/identify", post(handler::identify))
        .route("/setup", post(handler::setup))
        .route("/verify", post(handler::verify))
        .route("/session", get(handler::session))
        .route("/logout", post(handler::logout))
        .route("/nickname", put(handler::change_nickname))
}
