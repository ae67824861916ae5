//! Repository Module
//!
//! Provides CRUD operations for the SurrealDB tables.

pub mod category;
pub mod filter;
pub mod filter_value;
pub mod ordering;
pub mod product;
pub mod product_photo;
pub mod product_tab;
pub mod user;

// Re-exports
pub use category::CategoryRepository;
pub use filter::FilterRepository;
pub use filter_value::FilterValueRepository;
pub use ordering::SortOrderUpdate;
pub use product::ProductRepository;
pub use product_photo::ProductPhotoRepository;
pub use product_tab::ProductTabRepository;
pub use user::UserRepository;

use surrealdb::RecordId;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;
use thiserror::Error;

/// Repository error types
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Duplicate: {0}")]
    Duplicate(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Validation error: {0}")]
    Validation(String),
}

impl From<surrealdb::Error> for RepoError {
    fn from(err: surrealdb::Error) -> Self {
        RepoError::Database(err.to_string())
    }
}

/// Result type for repository operations
pub type RepoResult<T> = Result<T, RepoError>;

/// Build a RecordId for `table` from either a bare key or a full
/// "table:key" string.
pub fn make_record_id(table: &str, id: &str) -> RecordId {
    match id.split_once(':') {
        Some((tb, key)) if tb == table => RecordId::from_table_key(table, key),
        _ => RecordId::from_table_key(table, id),
    }
}

/// Strip the "table:" prefix from an id if present
pub fn strip_table_prefix<'a>(table: &str, id: &'a str) -> &'a str {
    match id.split_once(':') {
        Some((tb, key)) if tb == table => key,
        _ => id,
    }
}

/// Base repository with database reference
#[derive(Clone)]
pub struct BaseRepository {
    db: Surreal<Db>,
}

impl BaseRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self { db }
    }

    pub fn db(&self) -> &Surreal<Db> {
        &self.db
    }
}
