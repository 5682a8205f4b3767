// ============================================================================
// LoanDesk API - Error Mapping
// File: crates/loan-api/src/error.rs
// ============================================================================
//! Converts domain and request errors into the JSON error envelope

use axum::{
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use loan_core::error::ErrorKind;
use loan_core::DomainError;
use loan_shared::constants::LOGIN_PATH;
use thiserror::Error;

use crate::response::ApiResponse;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Bad request: {0}")]
    BadRequest(String),
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl ApiError {
    fn status(&self) -> (StatusCode, &'static str) {
        match self {
            ApiError::Unauthorized(_) => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED"),
            ApiError::BadRequest(_) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR"),
            ApiError::Domain(e) => match e.kind() {
                ErrorKind::Validation => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR"),
                ErrorKind::Unauthenticated => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED"),
                ErrorKind::Forbidden => (StatusCode::FORBIDDEN, "FORBIDDEN"),
                ErrorKind::NotFound => (StatusCode::NOT_FOUND, "NOT_FOUND"),
                ErrorKind::Conflict => (StatusCode::CONFLICT, "CONFLICT"),
                ErrorKind::Internal => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
            },
        }
    }

    /// Login page for 401s, the role's home page for role denials
    fn redirect(&self) -> Option<&'static str> {
        match self {
            ApiError::Unauthorized(_) => Some(LOGIN_PATH),
            ApiError::Domain(e) if e.kind() == ErrorKind::Unauthenticated => Some(LOGIN_PATH),
            ApiError::Domain(e) => e.home_redirect(),
            ApiError::BadRequest(_) => None,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = self.status();

        let message = if status.is_server_error() {
            tracing::error!("Request failed: {}", self);
            "Internal server error".to_string()
        } else {
            tracing::warn!("Request rejected ({}): {}", status.as_u16(), self);
            match &self {
                ApiError::Domain(e) => e.to_string(),
                ApiError::Unauthorized(msg) | ApiError::BadRequest(msg) => msg.clone(),
            }
        };

        let body = ApiResponse::<()>::error(code, &message);
        let body = match self.redirect() {
            Some(path) => body.with_redirect(path),
            None => body,
        };
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn test_status_mapping() {
        let cases = [
            (ApiError::from(DomainError::ValidationError("x".into())), StatusCode::BAD_REQUEST),
            (ApiError::from(DomainError::InvalidCredentials), StatusCode::UNAUTHORIZED),
            (ApiError::from(DomainError::forbidden(loan_shared::Role::User, "x")), StatusCode::FORBIDDEN),
            (ApiError::from(DomainError::LoanNotFound(Uuid::new_v4())), StatusCode::NOT_FOUND),
            (ApiError::from(DomainError::EmailAlreadyExists("a@b.c".into())), StatusCode::CONFLICT),
            (
                ApiError::from(DomainError::StaleWrite { entity: "loan", id: Uuid::new_v4() }),
                StatusCode::CONFLICT,
            ),
            (ApiError::from(DomainError::InternalError("boom".into())), StatusCode::INTERNAL_SERVER_ERROR),
            (ApiError::Unauthorized("no token".into()), StatusCode::UNAUTHORIZED),
        ];
        for (error, expected) in cases {
            assert_eq!(error.into_response().status(), expected);
        }
    }

    #[test]
    fn test_redirect_targets() {
        assert_eq!(ApiError::Unauthorized("no token".into()).redirect(), Some(LOGIN_PATH));
        assert_eq!(ApiError::from(DomainError::InvalidCredentials).redirect(), Some(LOGIN_PATH));
        assert_eq!(
            ApiError::from(DomainError::forbidden(loan_shared::Role::Verifier, "x")).redirect(),
            Some("/verifier/dashboard")
        );
        assert_eq!(ApiError::from(DomainError::LoanNotFound(Uuid::new_v4())).redirect(), None);
    }
}
