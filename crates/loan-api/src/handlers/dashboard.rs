//! Role dashboards

use axum::extract::State;
use loan_core::services::{AdminDashboard, UserDashboard, VerifierDashboard};

use super::{ok, ApiResult};
use crate::middleware::AuthSession;
use crate::state::AppState;

/// GET /api/admin/dashboard
pub async fn admin(State(state): State<AppState>, AuthSession(session): AuthSession) -> ApiResult<AdminDashboard> {
    ok(state.dashboards.admin(&session).await?)
}

/// GET /api/verifier/dashboard
pub async fn verifier(
    State(state): State<AppState>,
    AuthSession(session): AuthSession,
) -> ApiResult<VerifierDashboard> {
    ok(state.dashboards.verifier(&session).await?)
}

/// GET /api/dashboard
pub async fn user(State(state): State<AppState>, AuthSession(session): AuthSession) -> ApiResult<UserDashboard> {
    ok(state.dashboards.user(&session).await?)
}
