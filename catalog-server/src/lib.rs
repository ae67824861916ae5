//! Catalog management backend
//!
//! An HTTP service for hierarchical categories, products, per-product photo
//! galleries and content tabs, and category-scoped filters. The interesting
//! parts live in the photo/tab repositories: a sparse integer ordering with
//! a creation-time tie-break, and the single-main-photo selection invariant.
//!
//! # Module structure
//!
//! ```text
//! catalog-server/src/
//! ├── core/          # Config, state, HTTP server
//! ├── auth/          # JWT authentication, staff gate
//! ├── api/           # HTTP routes and handlers
//! ├── db/            # Embedded SurrealDB: models and repositories
//! └── utils/         # Errors, validation, time, logging
//! ```

pub mod api;
pub mod auth;
pub mod core;
pub mod db;
pub mod utils;

// Re-export common types
pub use auth::{CurrentUser, JwtService};
pub use core::{Config, Server, ServerState};
pub use utils::{AppError, AppResult};
pub use utils::logger::{init_logger, init_logger_with_file};
