//! Mapping of domain errors onto HTTP responses.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use spbu_auth::AuthError;
use spbu_core::error::SpbuError;
use tracing::{error, warn};

/// Error body: `{ "message": ... }`.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub message: String,
}

#[derive(Debug)]
pub struct ApiError(pub SpbuError);

pub type ApiResult<T> = Result<T, ApiError>;

impl ApiError {
    pub fn unauthorized(reason: impl Into<String>) -> Self {
        Self(SpbuError::AuthenticationFailed {
            reason: reason.into(),
        })
    }

    pub fn status(&self) -> StatusCode {
        match &self.0 {
            SpbuError::Validation { .. } => StatusCode::BAD_REQUEST,
            SpbuError::AuthenticationFailed { .. } => StatusCode::UNAUTHORIZED,
            SpbuError::AuthorizationDenied { .. } => StatusCode::FORBIDDEN,
            SpbuError::NotFound { .. } => StatusCode::NOT_FOUND,
            SpbuError::AlreadyExists { .. } | SpbuError::InvalidTransition { .. } => {
                StatusCode::CONFLICT
            }
            SpbuError::Database(_) | SpbuError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<SpbuError> for ApiError {
    fn from(err: SpbuError) -> Self {
        Self(err)
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        Self(err.into())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = if status.is_server_error() {
            error!(error = %self.0, "Request failed");
            "Internal server error".to_string()
        } else {
            warn!(status = status.as_u16(), error = %self.0, "Request rejected");
            self.0.to_string()
        };
        (status, Json(ErrorBody { message })).into_response()
    }
}
