//! HTTP handlers grouped by resource

pub mod auth;
pub mod users;
pub mod borrowers;
pub mod loans;
pub mod repayments;
pub mod payments;
pub mod budget;
pub mod dashboard;
pub mod navigation;
pub mod health;

use axum::{http::StatusCode, Json};
use serde::Serialize;

use crate::error::ApiError;
use crate::response::ApiResponse;

pub type ApiResult<T> = Result<Json<ApiResponse<T>>, ApiError>;
pub type CreatedResult<T> = Result<(StatusCode, Json<ApiResponse<T>>), ApiError>;

fn ok<T: Serialize>(data: T) -> ApiResult<T> {
    Ok(Json(ApiResponse::success(data)))
}

fn created<T: Serialize>(data: T) -> CreatedResult<T> {
    Ok((StatusCode::CREATED, Json(ApiResponse::success(data))))
}
