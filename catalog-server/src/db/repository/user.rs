//! User Repository

use serde::Serialize;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

use super::{BaseRepository, RepoError, RepoResult};
use crate::db::models::{User, UserCreate};
use crate::utils::time::now_millis;

const TABLE: &str = "user";

#[derive(Clone)]
pub struct UserRepository {
    base: BaseRepository,
}

impl UserRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Find user by username
    pub async fn find_by_username(&self, username: &str) -> RepoResult<Option<User>> {
        let users: Vec<User> = self
            .base
            .db()
            .query("SELECT * FROM user WHERE username = $username")
            .bind(("username", username.to_string()))
            .await?
            .take(0)?;
        Ok(users.into_iter().next())
    }

    /// Create a user with an argon2-hashed password
    pub async fn create(&self, data: UserCreate) -> RepoResult<User> {
        if self.find_by_username(&data.username).await?.is_some() {
            return Err(RepoError::Duplicate(format!(
                "User '{}' already exists",
                data.username
            )));
        }

        let hash_pass = User::hash_password(&data.password)
            .map_err(|e| RepoError::Database(format!("Password hashing failed: {e}")))?;

        // hash_pass is skip_serializing on the model, so write a full row here
        #[derive(Serialize)]
        struct InternalUser {
            username: String,
            hash_pass: String,
            is_staff: bool,
            is_active: bool,
            created_at: i64,
        }

        let user = InternalUser {
            username: data.username,
            hash_pass,
            is_staff: data.is_staff.unwrap_or(false),
            is_active: true,
            created_at: now_millis(),
        };

        let created: Option<User> = self.base.db().create(TABLE).content(user).await?;
        created.ok_or_else(|| RepoError::Database("Failed to create user".to_string()))
    }

    /// Seed a staff admin account when the user table is empty
    pub async fn ensure_default_admin(&self, password: Option<&str>) -> RepoResult<()> {
        let users: Vec<User> = self.base.db().query("SELECT * FROM user").await?.take(0)?;
        if !users.is_empty() {
            return Ok(());
        }

        let password = match password {
            Some(p) => p.to_string(),
            None => {
                tracing::warn!(
                    "ADMIN_PASSWORD not set; seeding default admin credentials. DO NOT USE IN PRODUCTION!"
                );
                "admin".to_string()
            }
        };

        self.create(UserCreate {
            username: "admin".to_string(),
            password,
            is_staff: Some(true),
        })
        .await?;

        tracing::info!("Seeded default admin user");
        Ok(())
    }
}
