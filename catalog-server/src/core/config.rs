//! Server configuration

use crate::auth::JwtConfig;

#[derive(Debug, Clone)]
pub struct Config {
    pub work_dir: String,
    pub http_port: u16,
    pub jwt: JwtConfig,
    pub environment: String,
    /// Password for the seeded admin account (dev default when unset)
    pub admin_password: Option<String>,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            work_dir: std::env::var("WORK_DIR").unwrap_or_else(|_| "/var/lib/catalog".into()),
            http_port: std::env::var("HTTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(3000),
            jwt: JwtConfig::default(),
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into()),
            admin_password: std::env::var("ADMIN_PASSWORD").ok(),
        }
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}
