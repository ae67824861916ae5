//! Product Tab API module

mod handler;

use axum::{
    Router,
    routing::{get, put},
};

use crate::auth::require_admin;
use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new()
        .nest("/api/product-tabs", routes())
        .route_layer(axum::middleware::from_fn(require_admin))
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::list).post(handler::create))
        // Batch sort order update (must be before /{id} to avoid path conflicts)
        .route("/sort-order", put(handler::batch_update_sort_order))
        .route(
            "/{id}",
            get(handler::get_by_id)
                .put(handler::update)
                .delete(handler::delete),
        )
}
