//! Client error type.

use spbu_core::error::SpbuError;
use thiserror::Error;

pub const NETWORK_ERROR_MESSAGE: &str = "Network error. Please check your connection.";
pub const SESSION_EXPIRED_MESSAGE: &str = "Your session has expired. Please sign in again.";

#[derive(Debug, Error)]
pub enum ClientError {
    /// The request never produced an HTTP response.
    #[error("Network error. Please check your connection.")]
    Network(#[source] reqwest::Error),

    /// The server answered 401 to an authenticated request; the session
    /// has been cleared.
    #[error("Your session has expired. Please sign in again.")]
    SessionExpired,

    #[error("You must sign in first")]
    NotSignedIn,

    /// Refused locally by the permission evaluator.
    #[error("{0}")]
    Forbidden(String),

    #[error("{0}")]
    Validation(String),

    /// Non-success response; `message` is the server's `{ "message" }`.
    #[error("{message}")]
    Api { status: u16, message: String },

    #[error("Unexpected response: {0}")]
    Decode(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

pub type ClientResult<T> = Result<T, ClientError>;

impl ClientError {
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Api { status, .. } => Some(*status),
            ClientError::SessionExpired => Some(401),
            _ => None,
        }
    }
}

impl From<SpbuError> for ClientError {
    fn from(err: SpbuError) -> Self {
        match err {
            SpbuError::Validation { message } => ClientError::Validation(message),
            SpbuError::AuthorizationDenied { reason } => ClientError::Forbidden(reason),
            other => ClientError::Validation(other.to_string()),
        }
    }
}
