//! Login, logout and current-user endpoints.

use axum::extract::State;
use axum::routing::{get, post};
use axum::{Json, Router};
use spbu_core::models::user::{LoginRequest, LoginResponse, UserProfile};
use spbu_core::permission;

use crate::error::ApiResult;
use crate::extract::{Body, Envelope, Principal, data};
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/auth/login", post(login))
        .route("/api/auth/logout", post(logout))
        .route("/api/auth/me", get(me))
}

async fn login(
    State(state): State<AppState>,
    Body(input): Body<LoginRequest>,
) -> ApiResult<Json<Envelope<LoginResponse>>> {
    let out = state.auth.login(&input.username, &input.password).await?;
    Ok(data(LoginResponse {
        token: out.access_token,
        expires_in: out.expires_in,
        user: out.user,
    }))
}

async fn logout(
    State(state): State<AppState>,
    principal: Principal,
) -> Json<Envelope<Option<()>>> {
    state.auth.logout(&principal.claims);
    data(None)
}

async fn me(principal: Principal) -> Json<Envelope<UserProfile>> {
    let permissions = permission::permission_map(Some(&principal.user));
    data(UserProfile {
        user: principal.user,
        permissions,
    })
}
