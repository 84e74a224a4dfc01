//! Fuel prices. Global prices apply to every station unless a station
//! has its own override.

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use chrono::Utc;
use serde::Deserialize;
use spbu_core::error::SpbuError;
use spbu_core::models::price::{self, CreatePrice, Price};
use spbu_core::permission::{self, AccessLevel, ResourceKey};
use spbu_core::repository::PriceRepository;

use super::{StationQuery, scope};
use crate::error::ApiResult;
use crate::extract::{Body, Envelope, Principal, data};
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/prices", get(list).post(create))
        .route("/api/prices/current", get(current))
}

async fn list(
    State(state): State<AppState>,
    Principal { user, .. }: Principal,
    Query(query): Query<StationQuery>,
) -> ApiResult<Json<Envelope<Vec<Price>>>> {
    permission::require(&user, ResourceKey::Prices, AccessLevel::ReadOnly)?;
    Ok(data(state.prices.list(scope(&user, query.spbu_id)).await?))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CurrentQuery {
    fuel_type: String,
    spbu_id: Option<i64>,
}

async fn current(
    State(state): State<AppState>,
    Principal { user, .. }: Principal,
    Query(query): Query<CurrentQuery>,
) -> ApiResult<Json<Envelope<Price>>> {
    permission::require(&user, ResourceKey::Prices, AccessLevel::ReadOnly)?;
    let spbu_id = scope(&user, query.spbu_id);
    let prices = state.prices.list(spbu_id).await?;
    let price = price::current_price(&prices, &query.fuel_type, spbu_id, Utc::now())
        .cloned()
        .ok_or_else(|| SpbuError::not_found("price", &query.fuel_type))?;
    Ok(data(price))
}

async fn create(
    State(state): State<AppState>,
    Principal { user, .. }: Principal,
    Body(input): Body<CreatePrice>,
) -> ApiResult<(StatusCode, Json<Envelope<Price>>)> {
    permission::require(&user, ResourceKey::Prices, AccessLevel::Full)?;
    let price = state.prices.create(input).await?;
    Ok((StatusCode::CREATED, data(price)))
}
