//! Borrower tables for admins and verifiers - /api/borrowers

use axum::{
    extract::{rejection::JsonRejection, rejection::QueryRejection, Path, Query, State},
    Json,
};
use loan_core::services::{BorrowerQuery, BorrowerView, NewBorrower};
use loan_core::stats::{BorrowerAccountStats, VerificationStats};
use loan_core::{AccountStatus, Borrower};
use loan_shared::Paginated;
use uuid::Uuid;

use super::{created, ok, ApiResult, CreatedResult};
use crate::dto::{AccountStatusRequest, ListParams, VerificationRequest};
use crate::middleware::AuthSession;
use crate::state::AppState;

pub async fn list(
    State(state): State<AppState>,
    AuthSession(session): AuthSession,
    params: Result<Query<ListParams>, QueryRejection>,
) -> ApiResult<Paginated<BorrowerView>> {
    let Query(params) = params?;
    let query = BorrowerQuery {
        search: params.search().map(str::to_string),
        status: params.status(AccountStatus::from_str)?,
        verification: params.verification()?,
        pagination: params.pagination(),
    };
    ok(state.borrowers.list(&session, &query).await?)
}

pub async fn get(
    State(state): State<AppState>,
    AuthSession(session): AuthSession,
    Path(id): Path<Uuid>,
) -> ApiResult<Borrower> {
    ok(state.borrowers.get(&session, &id).await?)
}

pub async fn create(
    State(state): State<AppState>,
    AuthSession(session): AuthSession,
    payload: Result<Json<NewBorrower>, JsonRejection>,
) -> CreatedResult<Borrower> {
    let Json(form) = payload?;
    created(state.borrowers.add(&session, form).await?)
}

pub async fn set_status(
    State(state): State<AppState>,
    AuthSession(session): AuthSession,
    Path(id): Path<Uuid>,
    payload: Result<Json<AccountStatusRequest>, JsonRejection>,
) -> ApiResult<Borrower> {
    let Json(payload) = payload?;
    ok(state.borrowers.set_status(&session, &id, payload.status).await?)
}

pub async fn verify(
    State(state): State<AppState>,
    AuthSession(session): AuthSession,
    Path(id): Path<Uuid>,
    payload: Result<Json<VerificationRequest>, JsonRejection>,
) -> ApiResult<Borrower> {
    let Json(payload) = payload?;
    ok(state.borrowers.verify(&session, &id, payload.verification).await?)
}

pub async fn account_stats(
    State(state): State<AppState>,
    AuthSession(session): AuthSession,
) -> ApiResult<BorrowerAccountStats> {
    ok(state.borrowers.account_stats(&session).await?)
}

pub async fn verification_stats(
    State(state): State<AppState>,
    AuthSession(session): AuthSession,
) -> ApiResult<VerificationStats> {
    ok(state.borrowers.verification_stats(&session).await?)
}
