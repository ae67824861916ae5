//! API routes
//!
//! Structure:
//!
//! - [`health`] - health check (public)
//! - [`auth`] - token issuance (login public, rest authenticated)
//! - [`categories`] - category tree management
//! - [`products`] - product management
//! - [`product_photos`] - photo galleries (ordering + main selection)
//! - [`product_tabs`] - content tabs (ordering)
//! - [`filters`] - category-scoped filters
//! - [`filter_values`] - filter value taxonomy

use axum::Router;
use http::{HeaderName, HeaderValue};
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;
use tower_http::request_id::{
    MakeRequestId, PropagateRequestIdLayer, RequestId, SetRequestIdLayer,
};
use tower_http::trace::TraceLayer;
use uuid::Uuid;

use crate::core::ServerState;

pub mod auth;
pub mod categories;
pub mod filter_values;
pub mod filters;
pub mod health;
pub mod product_photos;
pub mod product_tabs;
pub mod products;

/// Custom request ID generator
#[derive(Clone)]
struct XRequestId;

impl MakeRequestId for XRequestId {
    fn make_request_id<B>(&mut self, _request: &http::Request<B>) -> Option<RequestId> {
        let id = Uuid::new_v4().to_string();
        Some(RequestId::new(HeaderValue::from_str(&id).unwrap()))
    }
}

/// Build a router with all routes registered (no middleware, no state)
pub fn build_router() -> Router<ServerState> {
    Router::new()
        .merge(auth::router())
        .merge(categories::router())
        .merge(products::router())
        .merge(product_photos::router())
        .merge(product_tabs::router())
        .merge(filters::router())
        .merge(filter_values::router())
        .merge(health::router())
}

/// Build a fully configured application with all middleware
pub fn build_app(state: &ServerState) -> Router<ServerState> {
    build_router()
        // ========== Tower HTTP Middleware ==========
        // CORS - Handle cross-origin requests
        .layer(CorsLayer::permissive())
        // Compression - Gzip compress responses
        .layer(CompressionLayer::new())
        // Trace - Request tracing (logs at INFO level)
        .layer(TraceLayer::new_for_http())
        // ========== Application Middleware ==========
        // Request ID - Generate unique ID for each request
        .layer(SetRequestIdLayer::new(
            HeaderName::from_static("x-request-id"),
            XRequestId,
        ))
        // Propagate request ID to response
        .layer(PropagateRequestIdLayer::new(HeaderName::from_static(
            "x-request-id",
        )))
        // JWT authentication - executes before routes, injects CurrentUser
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            crate::auth::require_auth,
        ))
}
