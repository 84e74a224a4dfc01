use axum::extract::{Query, State};
use axum::routing::get;
use axum::{Json, Router};
use spbu_core::models::report::{PendingCounts, ReportSummary};
use spbu_core::permission::{self, AccessLevel, ResourceKey};
use spbu_core::repository::{
    ApprovalFilter, ApprovalRepository, SaleRepository, TankRepository,
};

use super::{StationQuery, scope};
use crate::error::ApiResult;
use crate::extract::{Envelope, Principal, data};
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new().route("/api/reports/summary", get(summary))
}

async fn summary(
    State(state): State<AppState>,
    Principal { user, .. }: Principal,
    Query(query): Query<StationQuery>,
) -> ApiResult<Json<Envelope<ReportSummary>>> {
    permission::require(&user, ResourceKey::Reports, AccessLevel::ReadOnly)?;
    let spbu_id = scope(&user, query.spbu_id);
    let pending = ApprovalFilter::pending_in(spbu_id);
    let all = ApprovalFilter {
        spbu_id,
        status: None,
    };

    let sales = state.sales.list(spbu_id).await?;
    let deposits = state.deposits.list(all).await?;
    let tanks = state.tanks.list(spbu_id).await?;
    let counts = PendingCounts {
        adjustments: state.adjustments.list(pending).await?.len() as u64,
        deposits: state.deposits.list(pending).await?.len() as u64,
        deliveries: state.deliveries.list(pending).await?.len() as u64,
    };

    Ok(data(ReportSummary::build(
        spbu_id, &sales, &deposits, counts, &tanks,
    )))
}
