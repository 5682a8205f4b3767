//! Borrower payments - /api/payments

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    Json,
};
use loan_core::stats::PaymentStats;
use loan_core::PaymentReceipt;
use uuid::Uuid;

use super::{ok, ApiResult};
use crate::dto::PaymentRequest;
use crate::middleware::AuthSession;
use crate::state::AppState;

/// POST /api/payments/{repayment_id}
pub async fn pay(
    State(state): State<AppState>,
    AuthSession(session): AuthSession,
    Path(id): Path<Uuid>,
    payload: Result<Json<PaymentRequest>, JsonRejection>,
) -> ApiResult<PaymentReceipt> {
    let Json(payload) = payload?;
    ok(state
        .repayments
        .record_payment(&session, &id, payload.amount, payload.method)
        .await?)
}

/// GET /api/payments/stats
pub async fn stats(State(state): State<AppState>, AuthSession(session): AuthSession) -> ApiResult<PaymentStats> {
    ok(state.repayments.payment_stats(&session).await?)
}
