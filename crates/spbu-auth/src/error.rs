//! Authentication error types.

use spbu_core::error::SpbuError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("invalid username or password")]
    InvalidCredentials,

    #[error("token has expired")]
    TokenExpired,

    #[error("token has been revoked")]
    TokenRevoked,

    #[error("invalid token: {0}")]
    TokenInvalid(String),

    #[error("password must be at least {0} characters")]
    PasswordTooShort(usize),

    #[error("cryptography error: {0}")]
    Crypto(String),
}

impl From<AuthError> for SpbuError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::InvalidCredentials
            | AuthError::TokenExpired
            | AuthError::TokenRevoked
            | AuthError::TokenInvalid(_) => SpbuError::AuthenticationFailed {
                reason: err.to_string(),
            },
            AuthError::PasswordTooShort(_) => SpbuError::Validation {
                message: err.to_string(),
            },
            AuthError::Crypto(msg) => SpbuError::Internal(msg),
        }
    }
}
