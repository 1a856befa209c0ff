//! Authentication module
//!
//! JWT-based authentication with bcrypt password hashing. Two token
//! kinds exist: access (API calls) and confirmation (email confirmation
//! only); the kind lives inside the signed claims.

mod error;
mod identity;
mod jwt;
mod middleware;
mod password;

pub use error::AuthError;
pub use identity::{authenticate, resolve_current_user, UserStore};
pub use jwt::{
    Claims, TokenKind, TokenService, ACCESS_TOKEN_EXPIRE_MINUTES, CONFIRM_TOKEN_EXPIRE_MINUTES,
};
pub use middleware::CurrentUser;
pub use password::PasswordService;
