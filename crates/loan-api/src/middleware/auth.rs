// ============================================================================
// LoanDesk API - Session Extractor
// File: crates/loan-api/src/middleware/auth.rs
// ============================================================================
//! Resolves the bearer token of a request to a live session

use std::convert::Infallible;

use axum::extract::{FromRequestParts, OptionalFromRequestParts};
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use loan_security::Session;

use crate::error::ApiError;
use crate::state::AppState;

/// Session of the caller. Rejects with 401 when the token is missing,
/// invalid, expired, or its session has ended.
#[derive(Debug, Clone)]
pub struct AuthSession(pub Session);

fn bearer_token(parts: &Parts) -> Option<&str> {
    parts
        .headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

impl FromRequestParts<AppState> for AuthSession {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts).ok_or_else(|| ApiError::Unauthorized("Missing bearer token".to_string()))?;
        Ok(AuthSession(state.auth.authenticate(token)?))
    }
}

impl OptionalFromRequestParts<AppState> for AuthSession {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Option<Self>, Self::Rejection> {
        Ok(bearer_token(parts).and_then(|token| state.auth.authenticate(token).ok().map(AuthSession)))
    }
}
