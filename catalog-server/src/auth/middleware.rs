//! Authentication Middleware
//!
//! Provides Axum middleware for JWT authentication and authorization

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

use crate::auth::{CurrentUser, JwtError, JwtService};
use crate::core::ServerState;
use crate::utils::AppError;

/// Require authentication middleware
///
/// Extracts and validates the JWT token from the Authorization header.
/// If valid, adds the CurrentUser to the request extensions.
pub async fn require_auth(
    State(state): State<ServerState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let path = req.uri().path();

    // Allow OPTIONS requests for CORS preflight (skip auth)
    if req.method() == http::Method::OPTIONS {
        return Ok(next.run(req).await);
    }

    // Skip auth for non-API routes (let them return 404 normally)
    if !path.starts_with("/api/") {
        return Ok(next.run(req).await);
    }

    // Skip auth for public API routes
    let is_public_api_route = path == "/api/auth/login" || path == "/api/health";
    if is_public_api_route {
        return Ok(next.run(req).await);
    }

    let jwt_service = state.get_jwt_service();
    let auth_header = req
        .headers()
        .get(http::header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok());

    let token = match auth_header {
        Some(header) => JwtService::extract_from_header(header).ok_or(AppError::InvalidToken)?,
        None => {
            tracing::warn!(target: "security", uri = ?req.uri(), "Missing authorization header");
            return Err(AppError::Unauthorized);
        }
    };

    match jwt_service.validate_token(token) {
        Ok(claims) => {
            let user = CurrentUser::from(claims);

            tracing::debug!(
                user_id = %user.id,
                username = %user.username,
                "User authenticated successfully"
            );

            req.extensions_mut().insert(user);
            Ok(next.run(req).await)
        }
        Err(e) => {
            tracing::warn!(target: "security", error = %e, uri = ?req.uri(), "Authentication failed");

            match e {
                JwtError::ExpiredToken => Err(AppError::TokenExpired),
                _ => Err(AppError::InvalidToken),
            }
        }
    }
}

/// Require staff access middleware
///
/// All catalog mutations and reads are administrative; non-staff tokens are
/// rejected before reaching any handler.
pub async fn require_admin(req: Request, next: Next) -> Result<Response, AppError> {
    let user = req
        .extensions()
        .get::<CurrentUser>()
        .ok_or(AppError::Unauthorized)?;
    if !user.is_admin() {
        tracing::warn!(
            target: "security",
            user_id = %user.id,
            username = %user.username,
            "Admin access required"
        );
        return Err(AppError::Forbidden("Admin access required".to_string()));
    }

    Ok(next.run(req).await)
}
