//! Database Module
//!
//! Embedded SurrealDB storage (RocksDB backend)

pub mod models;
pub mod repository;

use crate::utils::AppError;
use surrealdb::Surreal;
use surrealdb::engine::local::{Db, RocksDb};

const NAMESPACE: &str = "catalog";
const DATABASE: &str = "catalog";

/// Database service - owns the embedded SurrealDB handle
#[derive(Clone, Debug)]
pub struct DbService {
    pub db: Surreal<Db>,
}

impl DbService {
    /// Open (or create) the embedded database under the given path
    pub async fn new(db_path: &str) -> Result<Self, AppError> {
        let db: Surreal<Db> = Surreal::new::<RocksDb>(db_path)
            .await
            .map_err(|e| AppError::database(format!("Failed to open database: {e}")))?;

        db.use_ns(NAMESPACE)
            .use_db(DATABASE)
            .await
            .map_err(|e| AppError::database(format!("Failed to select namespace: {e}")))?;

        tracing::info!("Database opened at {db_path} (embedded SurrealDB/RocksDB)");

        Ok(Self { db })
    }
}
