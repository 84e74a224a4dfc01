//! Generic CRUD and decision routes for approval-bearing entities.
//!
//! Every kind is served under `/api/{path}` with list, detail, create,
//! approve (or confirm) and reject endpoints. Records of other stations
//! answer 404 rather than 403 so their existence is not disclosed.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::{get, put};
use axum::{Json, Router};
use serde::Deserialize;
use spbu_core::error::{SpbuError, SpbuResult};
use spbu_core::models::delivery::Delivery;
use spbu_core::models::user::User;
use spbu_core::permission::{self, AccessLevel};
use spbu_core::repository::{ApprovalFilter, ApprovalRepository};
use spbu_core::workflow::{
    self, Adjustments, Approvable, ApprovalKind, ApprovalStatus, Decision, Deliveries, Deposits,
};
use spbu_db::repository::{MemoryApprovalRepository, StoredKind};

use super::scope;
use crate::error::ApiResult;
use crate::extract::{Body, Envelope, Principal, data};
use crate::state::AppState;

/// A stored kind with a repository in [`AppState`].
pub trait ServedKind: StoredKind + Sized {
    fn repo(state: &AppState) -> &MemoryApprovalRepository<Self>;
}

impl ServedKind for Adjustments {
    fn repo(state: &AppState) -> &MemoryApprovalRepository<Self> {
        &state.adjustments
    }
}

impl ServedKind for Deposits {
    fn repo(state: &AppState) -> &MemoryApprovalRepository<Self> {
        &state.deposits
    }
}

impl ServedKind for Deliveries {
    fn repo(state: &AppState) -> &MemoryApprovalRepository<Self> {
        &state.deliveries
    }
}

pub fn routes<K: ServedKind>() -> Router<AppState> {
    let base = format!("/api/{}", K::PATH);
    Router::new()
        .route(&base, get(list::<K>).post(create::<K>))
        .route(&format!("{base}/{{id}}"), get(show::<K>))
        .route(
            &format!("{base}/{{id}}/{}", K::APPROVE_ACTION),
            put(approve::<K>),
        )
        .route(
            &format!("{base}/{{id}}/{}", K::REJECT_ACTION),
            put(reject::<K>),
        )
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListQuery {
    status: Option<ApprovalStatus>,
    spbu_id: Option<i64>,
}

async fn list<K: ServedKind>(
    State(state): State<AppState>,
    Principal { user, .. }: Principal,
    Query(query): Query<ListQuery>,
) -> ApiResult<Json<Envelope<Vec<K::Entity>>>> {
    permission::require(&user, K::RESOURCE, AccessLevel::ReadOnly)?;
    let filter = ApprovalFilter {
        spbu_id: scope(&user, query.spbu_id),
        status: query.status,
    };
    Ok(data(K::repo(&state).list(filter).await?))
}

async fn show<K: ServedKind>(
    State(state): State<AppState>,
    Principal { user, .. }: Principal,
    Path(id): Path<i64>,
) -> ApiResult<Json<Envelope<K::Entity>>> {
    permission::require(&user, K::RESOURCE, AccessLevel::ReadOnly)?;
    Ok(data(visible::<K>(&state, &user, id).await?))
}

async fn create<K: ServedKind>(
    State(state): State<AppState>,
    Principal { user, .. }: Principal,
    Body(input): Body<K::Create>,
) -> ApiResult<(StatusCode, Json<Envelope<K::Entity>>)> {
    workflow::authorize_create::<K>(&user)?;
    let spbu_id = permission::resolve_station(&user, K::requested_station(&input))?;
    let entity = K::repo(&state).create(spbu_id, user.id, input).await?;
    Ok((StatusCode::CREATED, data(entity)))
}

async fn approve<K: ServedKind>(
    State(state): State<AppState>,
    Principal { user, .. }: Principal,
    Path(id): Path<i64>,
) -> ApiResult<Json<Envelope<K::Entity>>> {
    Ok(data(decide::<K>(&state, &user, id, Decision::Approve).await?))
}

async fn reject<K: ServedKind>(
    State(state): State<AppState>,
    Principal { user, .. }: Principal,
    Path(id): Path<i64>,
) -> ApiResult<Json<Envelope<K::Entity>>> {
    Ok(data(decide::<K>(&state, &user, id, Decision::Reject).await?))
}

/// Pending deliveries awaiting confirmation in the caller's scope.
pub async fn ready_for_confirmation(
    State(state): State<AppState>,
    Principal { user, .. }: Principal,
    Query(query): Query<ListQuery>,
) -> ApiResult<Json<Envelope<Vec<Delivery>>>> {
    permission::require(&user, Deliveries::RESOURCE, AccessLevel::ReadOnly)?;
    let filter = ApprovalFilter::pending_in(scope(&user, query.spbu_id));
    Ok(data(state.deliveries.list(filter).await?))
}

async fn visible<K: ServedKind>(state: &AppState, user: &User, id: i64) -> SpbuResult<K::Entity> {
    let entity = K::repo(state).get_by_id(id).await?;
    if permission::can_view_station(user, entity.spbu_id()) {
        Ok(entity)
    } else {
        Err(SpbuError::not_found(K::NAME, id))
    }
}

async fn decide<K: ServedKind>(
    state: &AppState,
    user: &User,
    id: i64,
    decision: Decision,
) -> SpbuResult<K::Entity> {
    visible::<K>(state, user, id).await?;
    K::repo(state).decide(id, decision, user).await
}
