//! Product Photo API module

mod handler;

use axum::{
    Router,
    routing::{get, post, put},
};

use crate::auth::require_admin;
use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new()
        .nest("/api/product-photos", routes())
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
        .route("/{id}/set-main", post(handler::set_main))
}
