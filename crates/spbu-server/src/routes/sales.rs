use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use spbu_core::models::sale::{CreateSale, Sale};
use spbu_core::permission::{self, AccessLevel, ResourceKey};
use spbu_core::repository::SaleRepository;

use super::{StationQuery, scope};
use crate::error::ApiResult;
use crate::extract::{Body, Envelope, Principal, data};
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new().route("/api/sales", get(list).post(record))
}

async fn list(
    State(state): State<AppState>,
    Principal { user, .. }: Principal,
    Query(query): Query<StationQuery>,
) -> ApiResult<Json<Envelope<Vec<Sale>>>> {
    permission::require(&user, ResourceKey::Sales, AccessLevel::ReadOnly)?;
    Ok(data(state.sales.list(scope(&user, query.spbu_id)).await?))
}

async fn record(
    State(state): State<AppState>,
    Principal { user, .. }: Principal,
    Body(input): Body<CreateSale>,
) -> ApiResult<(StatusCode, Json<Envelope<Sale>>)> {
    permission::require(&user, ResourceKey::Sales, AccessLevel::Limited)?;
    let spbu_id = permission::resolve_station(&user, input.spbu_id)?;
    let sale = state.sales.record(spbu_id, user.id, input).await?;
    Ok((StatusCode::CREATED, data(sale)))
}
