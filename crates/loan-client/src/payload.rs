// ============================================================================
// LoanDesk Client - Payload Mapping
// File: crates/loan-client/src/payload.rs
// ============================================================================
//! View models decoded from backend envelopes. Numeric aggregates are read
//! leniently: absent, null, or malformed values become 0.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

#[derive(Debug, Deserialize)]
pub(crate) struct Envelope<T> {
    pub data: Option<T>,
    pub error: Option<ErrorView>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ErrorView {
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub message: String,
}

fn number(value: &Value) -> Option<f64> {
    let n = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }?;
    n.is_finite().then_some(n)
}

pub fn lenient_u64<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u64, D::Error> {
    let value = Value::deserialize(deserializer)?;
    Ok(number(&value).filter(|n| *n >= 0.0).map(|n| n as u64).unwrap_or(0))
}

pub fn lenient_f64<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    let value = Value::deserialize(deserializer)?;
    Ok(number(&value).unwrap_or(0.0))
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct UserProfile {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: String,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LoginPayload {
    pub token: String,
    /// Home page of the signed-in role
    pub redirect: String,
    pub user: UserProfile,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LoanRow {
    pub id: String,
    pub borrower_name: String,
    #[serde(deserialize_with = "lenient_u64")]
    pub amount: u64,
    #[serde(deserialize_with = "lenient_u64")]
    pub amount_paid: u64,
    #[serde(deserialize_with = "lenient_f64")]
    pub interest_rate: f64,
    #[serde(deserialize_with = "lenient_u64")]
    pub term_months: u64,
    pub purpose: String,
    pub status: String,
    pub start_date: String,
}

/// One page of a backend table
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Page<T> {
    pub items: Vec<T>,
    #[serde(deserialize_with = "lenient_u64")]
    pub page: u64,
    #[serde(deserialize_with = "lenient_u64")]
    pub per_page: u64,
    #[serde(deserialize_with = "lenient_u64")]
    pub total: u64,
    #[serde(deserialize_with = "lenient_u64")]
    pub total_pages: u64,
}

impl<T> Default for Page<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            page: 0,
            per_page: 0,
            total: 0,
            total_pages: 0,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AdminStatsView {
    #[serde(deserialize_with = "lenient_u64")]
    pub active_users: u64,
    #[serde(deserialize_with = "lenient_u64")]
    pub borrowers: u64,
    #[serde(deserialize_with = "lenient_u64")]
    pub cash_disbursed: u64,
    #[serde(deserialize_with = "lenient_u64")]
    pub cash_received: u64,
    #[serde(deserialize_with = "lenient_u64")]
    pub repaid_loans: u64,
    #[serde(deserialize_with = "lenient_u64")]
    pub loans: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RecoveryRatesView {
    #[serde(deserialize_with = "lenient_f64")]
    pub overall: f64,
    #[serde(deserialize_with = "lenient_f64")]
    pub open_loans: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RecentLoanRow {
    pub id: String,
    pub borrower_name: String,
    #[serde(deserialize_with = "lenient_u64")]
    pub amount: u64,
    pub date: String,
    pub status: String,
    pub reason: String,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct ChartPointView {
    pub name: String,
    #[serde(deserialize_with = "lenient_u64")]
    pub value: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ChartsView {
    pub loans_released: Vec<ChartPointView>,
    pub outstanding_loans: Vec<ChartPointView>,
    pub repayments: Vec<ChartPointView>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AdminDashboardView {
    pub stats: AdminStatsView,
    pub recovery_rates: RecoveryRatesView,
    pub recent_loans: Vec<RecentLoanRow>,
    pub charts: ChartsView,
}

/// Table filters sent as query parameters
#[derive(Debug, Clone, Default)]
pub struct ListQuery {
    pub search: Option<String>,
    pub status: Option<String>,
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

impl ListQuery {
    pub(crate) fn pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(search) = self.search.as_deref().filter(|s| !s.trim().is_empty()) {
            pairs.push(("search", search.to_string()));
        }
        if let Some(status) = &self.status {
            pairs.push(("status", status.clone()));
        }
        if let Some(page) = self.page {
            pairs.push(("page", page.to_string()));
        }
        if let Some(per_page) = self.per_page {
            pairs.push(("perPage", per_page.to_string()));
        }
        pairs
    }
}

/// Loan recorded by an admin
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewLoanRequest {
    pub borrower_id: String,
    pub amount: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub interest_rate: Option<f64>,
    pub term_months: u32,
    pub purpose: String,
}

/// Self-service application
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoanApplicationRequest {
    pub amount: u64,
    pub tenure: u32,
    pub reason: String,
    pub employment_status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub employer_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub employer_address: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_malformed_numbers_default_to_zero() {
        let view: AdminDashboardView = serde_json::from_value(json!({
            "stats": { "activeUsers": "12", "borrowers": null, "cashDisbursed": "lots", "loans": -3 },
            "recoveryRates": { "overall": 42.5 },
            "recentLoans": [{ "id": "a", "amount": "1500.0" }]
        }))
        .unwrap();

        assert_eq!(view.stats.active_users, 12);
        assert_eq!(view.stats.borrowers, 0);
        assert_eq!(view.stats.cash_disbursed, 0);
        assert_eq!(view.stats.cash_received, 0);
        assert_eq!(view.stats.loans, 0);
        assert_eq!(view.recovery_rates.overall, 42.5);
        assert_eq!(view.recovery_rates.open_loans, 0.0);
        assert_eq!(view.recent_loans[0].amount, 1500);
        assert!(view.charts.loans_released.is_empty());
    }

    #[test]
    fn test_query_pairs_skip_blank_search() {
        let query = ListQuery {
            search: Some("  ".into()),
            status: Some("pending".into()),
            page: Some(2),
            per_page: None,
        };
        assert_eq!(
            query.pairs(),
            vec![("status", "pending".to_string()), ("page", "2".to_string())]
        );
    }
}
