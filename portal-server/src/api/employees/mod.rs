//! Employee API Module

mod handler;

use axum::{
    Router, middleware,
    routing::{get, post, put},
};

use crate::auth::require_admin;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().nest("/api/employees", routes())
}

fn routes() -> Router<AppState> {
    // Listing is needed by record editors for reassignment pickers
    let read_routes = Router::new().route("/", get(handler::list));

    let manage_routes = Router::new()
        .route("/", post(handler::create))
        .route(
            "/{id}",
            get(handler::get_by_id)
                .put(handler::update)
                .delete(handler::delete),
        )
        .route("/{id}/edit-permission", put(handler::set_edit_permission))
        .route("/{id}/reset-nickname", post(handler::reset_nickname))
        .route_layer(middleware::from_fn(require_admin));

    read_routes.merge(manage_routes)
}
