//! Authentication Handlers
//!
//! Token issuance for administrative access

use axum::{Extension, Json, extract::State};
use serde::{Deserialize, Serialize};

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::repository::UserRepository;
use crate::utils::{AppError, AppResult};

/// Login request payload
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Login response with JWT token
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: UserInfo,
}

/// User information returned after login
#[derive(Debug, Serialize)]
pub struct UserInfo {
    pub id: String,
    pub username: String,
    pub is_staff: bool,
}

/// POST /api/auth/login
///
/// Authenticates credentials and returns a JWT token. Only staff accounts
/// are granted tokens; everything behind the API is administrative.
pub async fn login(
    State(state): State<ServerState>,
    Json(req): Json<LoginRequest>,
) -> AppResult<Json<LoginResponse>> {
    let repo = UserRepository::new(state.get_db());

    let user = repo
        .find_by_username(&req.username)
        .await?
        .ok_or_else(AppError::invalid_credentials)?;

    if !user.is_active {
        return Err(AppError::forbidden("Account has been disabled"));
    }

    let password_valid = user
        .verify_password(&req.password)
        .map_err(|e| AppError::internal(format!("Password verification failed: {e}")))?;
    if !password_valid {
        return Err(AppError::invalid_credentials());
    }

    if !user.is_staff {
        return Err(AppError::forbidden("Access restricted to administrators"));
    }

    let user_id = user.id.as_ref().map(|t| t.to_string()).unwrap_or_default();
    let token = state
        .get_jwt_service()
        .generate_token(&user_id, &user.username, user.is_staff)
        .map_err(|e| AppError::internal(format!("Failed to generate token: {e}")))?;

    tracing::info!(
        user_id = %user_id,
        username = %user.username,
        "User logged in successfully"
    );

    Ok(Json(LoginResponse {
        token,
        user: UserInfo {
            id: user_id,
            username: user.username,
            is_staff: user.is_staff,
        },
    }))
}

/// GET /api/auth/me
pub async fn me(Extension(current_user): Extension<CurrentUser>) -> AppResult<Json<UserInfo>> {
    Ok(Json(UserInfo {
        id: current_user.id,
        username: current_user.username,
        is_staff: current_user.is_staff,
    }))
}
