//! Personal budget - /api/budget

use axum::{
    extract::{rejection::JsonRejection, rejection::QueryRejection, Path, Query, State},
    Json,
};
use loan_core::services::NewBudgetItem;
use loan_core::stats::BudgetSummary;
use loan_core::BudgetItem;
use loan_shared::Paginated;
use uuid::Uuid;

use super::{created, ok, ApiResult, CreatedResult};
use crate::dto::ListParams;
use crate::middleware::AuthSession;
use crate::state::AppState;

pub async fn list(
    State(state): State<AppState>,
    AuthSession(session): AuthSession,
    params: Result<Query<ListParams>, QueryRejection>,
) -> ApiResult<Paginated<BudgetItem>> {
    let Query(params) = params?;
    ok(state.budget.list(&session, params.search(), params.pagination()).await?)
}

pub async fn create(
    State(state): State<AppState>,
    AuthSession(session): AuthSession,
    payload: Result<Json<NewBudgetItem>, JsonRejection>,
) -> CreatedResult<BudgetItem> {
    let Json(form) = payload?;
    created(state.budget.add(&session, form).await?)
}

pub async fn delete(
    State(state): State<AppState>,
    AuthSession(session): AuthSession,
    Path(id): Path<Uuid>,
) -> ApiResult<Uuid> {
    state.budget.delete(&session, &id).await?;
    ok(id)
}

pub async fn summary(State(state): State<AppState>, AuthSession(session): AuthSession) -> ApiResult<BudgetSummary> {
    ok(state.budget.summary(&session).await?)
}
