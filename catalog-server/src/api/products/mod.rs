//! Product API module

mod handler;

use axum::{
    Router,
    routing::{get, post},
};

use crate::auth::require_admin;
use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new()
        .nest("/api/products", routes())
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
        .route("/{id}/full", get(handler::get_full))
        .route("/{id}/toggle-active", post(handler::toggle_active))
        .route("/{id}/filter-values", get(handler::list_filter_values))
        .route(
            "/{id}/filter-values/{fv_id}",
            post(handler::add_filter_value).delete(handler::remove_filter_value),
        )
}
