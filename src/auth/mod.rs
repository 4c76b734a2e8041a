//! Resolves the authenticated caller from the auth cookie.
//!
//! Log-in, registration and password handling are done elsewhere. Those collaborators call
//! [set_auth_cookie] once a user has proven who they are, after which [auth_guard] places the
//! user's [crate::UserID] on every protected request.

mod cookie;
mod middleware;
mod token;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::response::{ErrorDetails, error_response};

pub use cookie::{DEFAULT_COOKIE_DURATION, set_auth_cookie};
pub use middleware::auth_guard;
pub(crate) use token::Token;

#[cfg(test)]
pub(crate) use cookie::COOKIE_TOKEN;
#[cfg(test)]
pub(crate) use middleware::AuthState;

/// The reasons a request could not be authenticated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    /// The auth cookie is missing, or it could not be decrypted.
    #[error("auth cookie missing")]
    CookieMissing,

    /// The auth cookie does not hold a valid token.
    #[error("invalid auth token")]
    InvalidToken,

    /// The auth token has expired.
    #[error("auth token expired")]
    Expired,
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        error_response(
            StatusCode::UNAUTHORIZED,
            "Unauthorized",
            Some(ErrorDetails {
                errors: self.to_string(),
            }),
        )
    }
}
