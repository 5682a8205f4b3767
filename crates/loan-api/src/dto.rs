//! Request payloads and query parameters

use loan_core::{AccountStatus, LoanStatus, PaymentMethod, RepaymentStatus, VerificationStatus};
use loan_shared::{Amount, Pagination, Role};
use serde::{Deserialize, Serialize};

use crate::error::ApiError;

/// `?search=&status=&verification=&page=&perPage=` shared by every table
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListParams {
    pub search: Option<String>,
    pub status: Option<String>,
    pub verification: Option<String>,
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

impl ListParams {
    pub fn pagination(&self) -> Pagination {
        Pagination::new(self.page, self.per_page)
    }

    pub fn search(&self) -> Option<&str> {
        self.search.as_deref().map(str::trim).filter(|s| !s.is_empty())
    }

    pub fn status<T>(&self, parse: fn(&str) -> Option<T>) -> Result<Option<T>, ApiError> {
        parse_filter(self.status.as_deref(), parse, "status")
    }

    pub fn verification(&self) -> Result<Option<VerificationStatus>, ApiError> {
        parse_filter(self.verification.as_deref(), VerificationStatus::from_str, "verification")
    }
}

/// Blank and `all` mean no filter
fn parse_filter<T>(value: Option<&str>, parse: fn(&str) -> Option<T>, field: &str) -> Result<Option<T>, ApiError> {
    match value.map(str::trim) {
        None | Some("") | Some("all") => Ok(None),
        Some(v) => parse(v)
            .map(Some)
            .ok_or_else(|| ApiError::BadRequest(format!("Unknown {} filter '{}'", field, v))),
    }
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    pub role: Role,
}

#[derive(Debug, Deserialize)]
pub struct ChangeRoleRequest {
    pub role: Role,
}

#[derive(Debug, Deserialize)]
pub struct AccountStatusRequest {
    pub status: AccountStatus,
}

#[derive(Debug, Deserialize)]
pub struct VerificationRequest {
    pub verification: VerificationStatus,
}

#[derive(Debug, Deserialize)]
pub struct LoanStatusRequest {
    pub status: LoanStatus,
}

#[derive(Debug, Deserialize)]
pub struct RepaymentStatusRequest {
    pub status: RepaymentStatus,
    pub method: Option<PaymentMethod>,
}

#[derive(Debug, Deserialize)]
pub struct PaymentRequest {
    pub amount: Amount,
    #[serde(default)]
    pub method: PaymentMethod,
}

#[derive(Debug, Deserialize)]
pub struct NavigationParams {
    pub path: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LogoutResponse {
    pub logged_out: bool,
}
