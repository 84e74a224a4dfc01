//! Request extractors and the response envelope.

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{FromRequest, FromRequestParts};
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use serde::{Deserialize, Serialize};
use spbu_auth::AccessTokenClaims;
use spbu_core::models::user::User;

use spbu_core::error::SpbuError;

use crate::error::ApiError;
use crate::state::AppState;

/// Success body: `{ "data": ... }`.
#[derive(Debug, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub data: T,
}

pub fn data<T: Serialize>(data: T) -> Json<Envelope<T>> {
    Json(Envelope { data })
}

/// JSON request body whose rejections answer `{ "message": ... }` with 400.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct Body<T>(pub T);

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self(SpbuError::validation(rejection.body_text()))
    }
}

/// The authenticated caller, resolved from `Authorization: Bearer <token>`.
#[derive(Debug, Clone)]
pub struct Principal {
    pub user: User,
    pub claims: AccessTokenClaims,
}

impl FromRequestParts<AppState> for Principal {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, ApiError> {
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| ApiError::unauthorized("missing bearer token"))?;
        let token = header
            .strip_prefix("Bearer ")
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or_else(|| ApiError::unauthorized("malformed authorization header"))?;

        let (claims, user) = state.auth.authenticate(token).await?;
        Ok(Principal { user, claims })
    }
}
