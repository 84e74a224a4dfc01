use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use spbu_core::error::SpbuError;
use spbu_core::models::tank::{CreateTank, Tank};
use spbu_core::permission::{self, AccessLevel, ResourceKey};
use spbu_core::repository::TankRepository;

use super::{StationQuery, scope};
use crate::error::ApiResult;
use crate::extract::{Body, Envelope, Principal, data};
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/tanks", get(list).post(create))
        .route("/api/tanks/{id}", get(show))
}

async fn list(
    State(state): State<AppState>,
    Principal { user, .. }: Principal,
    Query(query): Query<StationQuery>,
) -> ApiResult<Json<Envelope<Vec<Tank>>>> {
    permission::require(&user, ResourceKey::Tanks, AccessLevel::ReadOnly)?;
    Ok(data(state.tanks.list(scope(&user, query.spbu_id)).await?))
}

async fn show(
    State(state): State<AppState>,
    Principal { user, .. }: Principal,
    Path(id): Path<i64>,
) -> ApiResult<Json<Envelope<Tank>>> {
    permission::require(&user, ResourceKey::Tanks, AccessLevel::ReadOnly)?;
    let tank = state.tanks.get_by_id(id).await?;
    if !permission::can_view_station(&user, tank.spbu_id) {
        return Err(SpbuError::not_found("tank", id).into());
    }
    Ok(data(tank))
}

async fn create(
    State(state): State<AppState>,
    Principal { user, .. }: Principal,
    Body(input): Body<CreateTank>,
) -> ApiResult<(StatusCode, Json<Envelope<Tank>>)> {
    permission::require(&user, ResourceKey::Tanks, AccessLevel::Full)?;
    let spbu_id = permission::resolve_station(&user, input.spbu_id)?;
    let tank = state.tanks.create(spbu_id, input).await?;
    Ok((StatusCode::CREATED, data(tank)))
}
