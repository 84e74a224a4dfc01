use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use spbu_core::error::SpbuError;
use spbu_core::models::station::{CreateSpbu, Spbu};
use spbu_core::permission::{self, AccessLevel, ResourceKey};
use spbu_core::repository::StationRepository;

use super::scope;
use crate::error::ApiResult;
use crate::extract::{Body, Envelope, Principal, data};
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/spbu", get(list).post(create))
        .route("/api/spbu/{id}", get(show))
}

async fn list(
    State(state): State<AppState>,
    Principal { user, .. }: Principal,
) -> ApiResult<Json<Envelope<Vec<Spbu>>>> {
    permission::require(&user, ResourceKey::Spbu, AccessLevel::ReadOnly)?;
    Ok(data(state.stations.list(scope(&user, None)).await?))
}

async fn show(
    State(state): State<AppState>,
    Principal { user, .. }: Principal,
    Path(id): Path<i64>,
) -> ApiResult<Json<Envelope<Spbu>>> {
    permission::require(&user, ResourceKey::Spbu, AccessLevel::ReadOnly)?;
    if !permission::can_view_station(&user, id) {
        return Err(SpbuError::not_found("spbu", id).into());
    }
    Ok(data(state.stations.get_by_id(id).await?))
}

async fn create(
    State(state): State<AppState>,
    Principal { user, .. }: Principal,
    Body(input): Body<CreateSpbu>,
) -> ApiResult<(StatusCode, Json<Envelope<Spbu>>)> {
    permission::require(&user, ResourceKey::Spbu, AccessLevel::Full)?;
    let spbu = state.stations.create(input).await?;
    Ok((StatusCode::CREATED, data(spbu)))
}
