// ============================================================================
// LoanDesk API - Auth Handlers
// File: crates/loan-api/src/handlers/auth.rs
// ============================================================================
//! Authentication HTTP handlers (login, register, logout, profile)

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use loan_core::services::{LoginResult, UserInfo};

use super::{created, ok, ApiResult, CreatedResult};
use crate::dto::{LoginRequest, LogoutResponse, RegisterRequest};
use crate::error::ApiError;
use crate::middleware::AuthSession;
use crate::state::AppState;

/// Login handler - POST /api/auth/login
pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> ApiResult<LoginResult> {
    let Json(payload) = payload?;
    if payload.email.trim().is_empty() || payload.password.is_empty() {
        return Err(ApiError::BadRequest("Email and password are required".to_string()));
    }
    ok(state.auth.login(payload.email.trim(), &payload.password).await?)
}

/// Register handler - POST /api/auth/register
pub async fn register(
    State(state): State<AppState>,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> CreatedResult<UserInfo> {
    let Json(payload) = payload?;
    created(state.auth.register(&payload.name, &payload.email, &payload.password).await?)
}

/// Logout handler - POST /api/auth/logout
pub async fn logout(State(state): State<AppState>, AuthSession(session): AuthSession) -> ApiResult<LogoutResponse> {
    ok(LogoutResponse {
        logged_out: state.auth.logout(&session),
    })
}

/// Profile handler - GET /api/users/profile
pub async fn profile(State(state): State<AppState>, AuthSession(session): AuthSession) -> ApiResult<UserInfo> {
    ok(state.auth.profile(&session).await?)
}
