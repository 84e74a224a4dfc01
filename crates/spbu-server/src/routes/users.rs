//! User management.
//!
//! Admins hold limited access here: they may add Operators to their own
//! station only. Super Admins may create any user anywhere.

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use spbu_core::error::SpbuError;
use spbu_core::models::user::{CreateUser, User};
use spbu_core::permission::{self, AccessLevel, ResourceKey, Role};
use spbu_core::repository::UserRepository;

use super::scope;
use crate::error::ApiResult;
use crate::extract::{Body, Envelope, Principal, data};
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new().route("/api/users", get(list).post(create))
}

async fn list(
    State(state): State<AppState>,
    Principal { user, .. }: Principal,
) -> ApiResult<Json<Envelope<Vec<User>>>> {
    permission::require(&user, ResourceKey::Users, AccessLevel::Limited)?;
    Ok(data(state.users.list(scope(&user, None)).await?))
}

async fn create(
    State(state): State<AppState>,
    Principal { user, .. }: Principal,
    Body(mut input): Body<CreateUser>,
) -> ApiResult<(StatusCode, Json<Envelope<User>>)> {
    permission::require(&user, ResourceKey::Users, AccessLevel::Limited)?;

    if !permission::allows(Some(&user), ResourceKey::Users, AccessLevel::Full) {
        let only_operators = input
            .roles
            .iter()
            .all(|r| r.parse::<Role>().is_ok_and(|role| role == Role::Operator));
        if !only_operators {
            return Err(SpbuError::denied(format!(
                "{} may only create Operator accounts",
                user.username
            ))
            .into());
        }
        input.spbu_id = Some(permission::resolve_station(&user, input.spbu_id)?);
    }

    state.auth.check_password_policy(&input.password)?;
    let created = state.users.create(input).await?;
    Ok((StatusCode::CREATED, data(created)))
}
