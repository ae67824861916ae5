//! Filter Value API module

mod handler;

use axum::{Router, routing::get};

use crate::auth::require_admin;
use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new()
        .nest("/api/filter-values", routes())
        .route_layer(axum::middleware::from_fn(require_admin))
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::list).post(handler::create))
        .route(
            "/{id}",
            get(handler::get_by_id)
                .put(handler::update)
                .delete(handler::delete),
        )
}
