//! Authentication: JWT tokens and request middleware

pub mod jwt;
pub mod middleware;

pub use jwt::{Claims, CurrentUser, JwtConfig, JwtError, JwtService};
pub use middleware::{require_admin, require_auth};
