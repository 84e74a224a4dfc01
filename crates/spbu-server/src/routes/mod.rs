//! HTTP routes.

mod approvals;
mod auth;
mod prices;
mod reports;
mod sales;
mod stations;
mod tanks;
mod users;

use axum::Router;
use axum::routing::get;
use spbu_core::models::user::User;
use spbu_core::permission;
use spbu_core::workflow::{Adjustments, Deliveries, Deposits};

use crate::state::AppState;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(|| async { "ok" }))
        .merge(auth::routes())
        .merge(stations::routes())
        .merge(tanks::routes())
        .merge(prices::routes())
        .merge(sales::routes())
        .merge(reports::routes())
        .merge(users::routes())
        .merge(approvals::routes::<Adjustments>())
        .merge(approvals::routes::<Deposits>())
        .merge(approvals::routes::<Deliveries>())
        .route(
            "/api/deliveries/ready-for-confirmation",
            get(approvals::ready_for_confirmation),
        )
        .with_state(state)
}

/// Station filter for a list query: Super Admins may narrow to any
/// station, everyone else is pinned to their own.
fn scope(user: &User, requested: Option<i64>) -> Option<i64> {
    if permission::is_super_admin(user) {
        requested
    } else {
        permission::station_scope(user)
    }
}

/// Optional `?spbuId=` query parameter.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
struct StationQuery {
    spbu_id: Option<i64>,
}
