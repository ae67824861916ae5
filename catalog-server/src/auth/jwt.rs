//! JWT Token Service
//!
//! Handles JWT token generation, validation, and parsing.

use chrono::{Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// JWT Configuration
#[derive(Debug, Clone)]
pub struct JwtConfig {
    /// JWT secret key (should be at least 32 bytes)
    pub secret: String,
    /// Token expiration time in minutes
    pub expiration_minutes: i64,
    /// Token issuer
    pub issuer: String,
    /// Token audience
    pub audience: String,
}

impl Default for JwtConfig {
    fn default() -> Self {
        let secret = std::env::var("JWT_SECRET").unwrap_or_else(|_| {
            #[cfg(debug_assertions)]
            {
                tracing::warn!(
                    "JWT_SECRET not set! Using insecure default key. DO NOT USE IN PRODUCTION!"
                );
                "dev-secret-key-change-in-production-min-32-chars-long".to_string()
            }
            #[cfg(not(debug_assertions))]
            {
                panic!("FATAL: JWT_SECRET environment variable is not set!");
            }
        });

        Self {
            secret,
            expiration_minutes: std::env::var("JWT_EXPIRATION_MINUTES")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(1440), // 24 hours default
            issuer: std::env::var("JWT_ISSUER").unwrap_or_else(|_| "catalog-server".to_string()),
            audience: std::env::var("JWT_AUDIENCE")
                .unwrap_or_else(|_| "catalog-admin".to_string()),
        }
    }
}

/// JWT Claims stored in the token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// User ID
    pub sub: String,
    /// Username
    pub username: String,
    /// Administrative flag
    pub is_staff: bool,
    /// Token type
    pub token_type: String,
    /// Expiration timestamp
    pub exp: i64,
    /// Issued at timestamp
    pub iat: i64,
    /// Issuer
    pub iss: String,
    /// Audience
    pub aud: String,
}

/// JWT Errors
#[derive(Error, Debug)]
pub enum JwtError {
    #[error("Invalid token: {0}")]
    InvalidToken(String),

    #[error("Token expired")]
    ExpiredToken,

    #[error("Invalid signature")]
    InvalidSignature,

    #[error("Token generation failed: {0}")]
    GenerationFailed(String),
}

/// JWT Token Service
#[derive(Debug, Clone)]
pub struct JwtService {
    pub config: JwtConfig,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl JwtService {
    /// Create a new JWT service with default config
    pub fn new() -> Self {
        Self::with_config(JwtConfig::default())
    }

    /// Create a new JWT service with custom config
    pub fn with_config(config: JwtConfig) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(config.secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(config.secret.as_bytes()),
            config,
        }
    }

    /// Generate a JWT token
    pub fn generate_token(
        &self,
        user_id: impl Into<String>,
        username: impl Into<String>,
        is_staff: bool,
    ) -> Result<String, JwtError> {
        let now = Utc::now();
        let expiration = now + Duration::minutes(self.config.expiration_minutes);

        let claims = Claims {
            sub: user_id.into(),
            username: username.into(),
            is_staff,
            token_type: "access".to_string(),
            exp: expiration.timestamp(),
            iat: now.timestamp(),
            iss: self.config.issuer.clone(),
            aud: self.config.audience.clone(),
        };

        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| JwtError::GenerationFailed(e.to_string()))
    }

    /// Validate and decode a JWT token
    pub fn validate_token(&self, token: &str) -> Result<Claims, JwtError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[&self.config.issuer]);
        validation.set_audience(&[&self.config.audience]);

        let token_data =
            decode::<Claims>(token, &self.decoding_key, &validation).map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => JwtError::ExpiredToken,
                ErrorKind::InvalidSignature => JwtError::InvalidSignature,
                _ => JwtError::InvalidToken(e.to_string()),
            })?;

        Ok(token_data.claims)
    }

    /// Extract token from Authorization header
    pub fn extract_from_header(header: &str) -> Option<&str> {
        header.strip_prefix("Bearer ")
    }
}

impl Default for JwtService {
    fn default() -> Self {
        Self::new()
    }
}

/// Current user context extracted from JWT
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub id: String,
    pub username: String,
    pub is_staff: bool,
}

impl From<Claims> for CurrentUser {
    fn from(claims: Claims) -> Self {
        Self {
            id: claims.sub,
            username: claims.username,
            is_staff: claims.is_staff,
        }
    }
}

impl CurrentUser {
    /// Check if user has administrative access
    pub fn is_admin(&self) -> bool {
        self.is_staff
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_jwt_generation_and_validation() {
        let service = JwtService::new();

        let token = service
            .generate_token("user123", "john_doe", true)
            .unwrap();

        let claims = service.validate_token(&token).unwrap();

        assert_eq!(claims.sub, "user123");
        assert_eq!(claims.username, "john_doe");
        assert!(claims.is_staff);
    }

    #[test]
    fn test_tampered_token_rejected() {
        let service = JwtService::new();
        let token = service.generate_token("user123", "john_doe", false).unwrap();

        let mut tampered = token.clone();
        tampered.push('x');
        assert!(service.validate_token(&tampered).is_err());
    }

    #[test]
    fn test_current_user_admin_flag() {
        let service = JwtService::new();
        let token = service.generate_token("1", "staff", true).unwrap();
        let user = CurrentUser::from(service.validate_token(&token).unwrap());
        assert!(user.is_admin());

        let token = service.generate_token("2", "viewer", false).unwrap();
        let user = CurrentUser::from(service.validate_token(&token).unwrap());
        assert!(!user.is_admin());
    }
}
