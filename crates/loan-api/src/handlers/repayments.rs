//! Installment administration - /api/repayments

use axum::{
    extract::{rejection::JsonRejection, rejection::QueryRejection, Path, Query, State},
    Json,
};
use loan_core::services::{NewRepayment, RepaymentQuery};
use loan_core::stats::RepaymentStats;
use loan_core::{Repayment, RepaymentStatus};
use loan_shared::Paginated;
use uuid::Uuid;

use super::{created, ok, ApiResult, CreatedResult};
use crate::dto::{ListParams, RepaymentStatusRequest};
use crate::middleware::AuthSession;
use crate::state::AppState;

/// Also serves GET /api/payments; the service scopes users to their own rows
pub async fn list(
    State(state): State<AppState>,
    AuthSession(session): AuthSession,
    params: Result<Query<ListParams>, QueryRejection>,
) -> ApiResult<Paginated<Repayment>> {
    let Query(params) = params?;
    let query = RepaymentQuery {
        search: params.search().map(str::to_string),
        status: params.status(RepaymentStatus::from_str)?,
        pagination: params.pagination(),
    };
    ok(state.repayments.list(&session, &query).await?)
}

pub async fn create(
    State(state): State<AppState>,
    AuthSession(session): AuthSession,
    payload: Result<Json<NewRepayment>, JsonRejection>,
) -> CreatedResult<Repayment> {
    let Json(form) = payload?;
    created(state.repayments.add(&session, form).await?)
}

pub async fn update_status(
    State(state): State<AppState>,
    AuthSession(session): AuthSession,
    Path(id): Path<Uuid>,
    payload: Result<Json<RepaymentStatusRequest>, JsonRejection>,
) -> ApiResult<Repayment> {
    let Json(payload) = payload?;
    ok(state
        .repayments
        .update_status(&session, &id, payload.status, payload.method)
        .await?)
}

pub async fn stats(State(state): State<AppState>, AuthSession(session): AuthSession) -> ApiResult<RepaymentStats> {
    ok(state.repayments.stats(&session).await?)
}
