//! Server state - shared handles for config, database and auth

use std::path::PathBuf;
use std::sync::Arc;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

use crate::auth::JwtService;
use crate::core::Config;
use crate::db::DbService;
use crate::db::repository::UserRepository;
use crate::utils::AppError;

#[derive(Clone, Debug)]
pub struct ServerState {
    pub config: Config,
    pub db: Surreal<Db>,
    pub jwt_service: Arc<JwtService>,
}

impl ServerState {
    pub fn new(config: Config, db: Surreal<Db>, jwt_service: Arc<JwtService>) -> Self {
        Self {
            config,
            db,
            jwt_service,
        }
    }

    pub async fn initialize(config: &Config) -> Result<Self, AppError> {
        let db_path = PathBuf::from(&config.work_dir).join("catalog.db");
        let db_service = DbService::new(&db_path.to_string_lossy()).await?;
        let db = db_service.db;

        let jwt_service = Arc::new(JwtService::with_config(config.jwt.clone()));

        // Seed an admin account on first start
        UserRepository::new(db.clone())
            .ensure_default_admin(config.admin_password.as_deref())
            .await?;

        Ok(Self::new(config.clone(), db, jwt_service))
    }

    pub fn get_db(&self) -> Surreal<Db> {
        self.db.clone()
    }

    pub fn get_jwt_service(&self) -> Arc<JwtService> {
        self.jwt_service.clone()
    }
}
