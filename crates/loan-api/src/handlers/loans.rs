// ============================================================================
// LoanDesk API - Loan Handlers
// File: crates/loan-api/src/handlers/loans.rs
// ============================================================================
//! Loan tables, admin creation, self-service applications, lifecycle moves

use axum::{
    extract::{rejection::JsonRejection, rejection::QueryRejection, Path, Query, State},
    Json,
};
use loan_core::services::{LoanApplication, LoanQuery, NewLoan};
use loan_core::stats::LoanPortfolioStats;
use loan_core::{Loan, LoanStatus};
use loan_shared::Paginated;
use uuid::Uuid;

use super::{created, ok, ApiResult, CreatedResult};
use crate::dto::{ListParams, LoanStatusRequest};
use crate::middleware::AuthSession;
use crate::state::AppState;

/// GET /api/loans
pub async fn list(
    State(state): State<AppState>,
    AuthSession(session): AuthSession,
    params: Result<Query<ListParams>, QueryRejection>,
) -> ApiResult<Paginated<Loan>> {
    let Query(params) = params?;
    let query = LoanQuery {
        search: params.search().map(str::to_string),
        status: params.status(LoanStatus::from_str)?,
        pagination: params.pagination(),
    };
    ok(state.loans.list(&session, &query).await?)
}

/// GET /api/loans/{id}
pub async fn get(
    State(state): State<AppState>,
    AuthSession(session): AuthSession,
    Path(id): Path<Uuid>,
) -> ApiResult<Loan> {
    ok(state.loans.get(&session, &id).await?)
}

/// POST /api/loans
pub async fn create(
    State(state): State<AppState>,
    AuthSession(session): AuthSession,
    payload: Result<Json<NewLoan>, JsonRejection>,
) -> CreatedResult<Loan> {
    let Json(form) = payload?;
    created(state.loans.create(&session, form).await?)
}

/// POST /api/loans/apply
pub async fn apply(
    State(state): State<AppState>,
    AuthSession(session): AuthSession,
    payload: Result<Json<LoanApplication>, JsonRejection>,
) -> CreatedResult<Loan> {
    let Json(form) = payload?;
    created(state.loans.apply(&session, form).await?)
}

/// PUT /api/loans/{id}/status
pub async fn transition(
    State(state): State<AppState>,
    AuthSession(session): AuthSession,
    Path(id): Path<Uuid>,
    payload: Result<Json<LoanStatusRequest>, JsonRejection>,
) -> ApiResult<Loan> {
    let Json(payload) = payload?;
    ok(state.loans.transition(&session, &id, payload.status).await?)
}

/// GET /api/loans/{id}/transitions
pub async fn transitions(
    State(state): State<AppState>,
    AuthSession(session): AuthSession,
    Path(id): Path<Uuid>,
) -> ApiResult<Vec<LoanStatus>> {
    ok(state.loans.available_transitions(&session, &id).await?)
}

/// GET /api/loans/stats
pub async fn stats(
    State(state): State<AppState>,
    AuthSession(session): AuthSession,
) -> ApiResult<LoanPortfolioStats> {
    ok(state.loans.portfolio_stats(&session).await?)
}
