//! Authentication API module
//!
//! - /api/auth/login: public (no auth required)
//! - /api/auth/me: protected (requires auth)

mod handler;

use axum::{
    Router,
    routing::{get, post},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new()
        // Public route - no auth middleware applied
        .route("/api/auth/login", post(handler::login))
        // Protected route - requires authentication
        .route("/api/auth/me", get(handler::me))
}
