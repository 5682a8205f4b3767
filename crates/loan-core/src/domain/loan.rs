// ============================================================================
// LoanDesk Core - Loan Entity
// File: crates/loan-core/src/domain/loan.rs
// Description: Loan entity and its status
// ============================================================================

use chrono::{DateTime, Months, NaiveDate, Utc};
use loan_shared::constants::MAX_AMOUNT;
use loan_shared::{Amount, Role};
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;
use validator::Validate;

use super::lifecycle;
use super::search::Searchable;
use crate::error::DomainError;

/// Loan status enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LoanStatus {
    Pending,
    Verified,
    Approved,
    Disbursed,
    Repaying,
    Completed,
    Defaulted,
    Rejected,
}

impl LoanStatus {
    pub const ALL: [LoanStatus; 8] = [
        LoanStatus::Pending,
        LoanStatus::Verified,
        LoanStatus::Approved,
        LoanStatus::Disbursed,
        LoanStatus::Repaying,
        LoanStatus::Completed,
        LoanStatus::Defaulted,
        LoanStatus::Rejected,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            LoanStatus::Pending => "pending",
            LoanStatus::Verified => "verified",
            LoanStatus::Approved => "approved",
            LoanStatus::Disbursed => "disbursed",
            LoanStatus::Repaying => "repaying",
            LoanStatus::Completed => "completed",
            LoanStatus::Defaulted => "defaulted",
            LoanStatus::Rejected => "rejected",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "pending" => Some(LoanStatus::Pending),
            "verified" => Some(LoanStatus::Verified),
            "approved" => Some(LoanStatus::Approved),
            "disbursed" => Some(LoanStatus::Disbursed),
            "repaying" => Some(LoanStatus::Repaying),
            "completed" => Some(LoanStatus::Completed),
            "defaulted" => Some(LoanStatus::Defaulted),
            "rejected" => Some(LoanStatus::Rejected),
            _ => None,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, LoanStatus::Completed | LoanStatus::Rejected | LoanStatus::Defaulted)
    }

    /// Funds have left the lender
    pub fn is_disbursed(&self) -> bool {
        matches!(
            self,
            LoanStatus::Disbursed | LoanStatus::Repaying | LoanStatus::Completed | LoanStatus::Defaulted
        )
    }

    /// Position along the lifecycle; every legal edge increases it
    pub fn rank(&self) -> u8 {
        match self {
            LoanStatus::Pending => 0,
            LoanStatus::Verified => 1,
            LoanStatus::Approved => 2,
            LoanStatus::Disbursed => 3,
            LoanStatus::Repaying => 4,
            LoanStatus::Completed => 5,
            LoanStatus::Defaulted => 6,
            LoanStatus::Rejected => 7,
        }
    }
}

impl Default for LoanStatus {
    fn default() -> Self {
        LoanStatus::Pending
    }
}

/// Employment information captured by the loan application form
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmploymentDetails {
    pub employment_status: String,
    pub employer_name: Option<String>,
    pub employer_address: Option<String>,
}

/// Loan entity
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct Loan {
    pub id: Uuid,
    pub borrower_id: Uuid,
    pub borrower_name: String,

    #[validate(range(min = 1, max = MAX_AMOUNT, message = "Amount must be positive and within the maximum amount"))]
    pub amount: Amount,

    /// Annual percentage
    #[validate(range(min = 0.0, max = 100.0, message = "Interest rate must be between 0 and 100"))]
    pub interest_rate: f64,

    #[validate(range(min = 1, max = 600, message = "Term must be between 1 and 600 months"))]
    pub term_months: u32,

    #[validate(length(min = 1, max = 500, message = "Purpose is required"))]
    pub purpose: String,

    pub status: LoanStatus,

    /// Never exceeds `amount`
    pub amount_paid: Amount,

    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub employment: Option<EmploymentDetails>,

    // Audit fields
    pub created_at: DateTime<Utc>,
    pub modified_at: Option<DateTime<Utc>>,
    pub modified_by: Option<Uuid>,

    /// Bumped by the store on every successful update
    #[serde(default)]
    pub version: u64,
}

impl Loan {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        borrower_id: Uuid,
        borrower_name: String,
        amount: Amount,
        interest_rate: f64,
        term_months: u32,
        purpose: String,
        start_date: NaiveDate,
        employment: Option<EmploymentDetails>,
    ) -> Result<Self, DomainError> {
        let end_date = start_date
            .checked_add_months(Months::new(term_months))
            .ok_or_else(|| DomainError::ValidationError("Term exceeds the calendar".to_string()))?;

        let loan = Self {
            id: Uuid::new_v4(),
            borrower_id,
            borrower_name,
            amount,
            interest_rate,
            term_months,
            purpose: purpose.trim().to_string(),
            status: LoanStatus::Pending,
            amount_paid: 0,
            start_date,
            end_date,
            employment,
            created_at: Utc::now(),
            modified_at: None,
            modified_by: None,
            version: 0,
        };

        loan.validate()?;
        Ok(loan)
    }

    pub fn outstanding(&self) -> Amount {
        self.amount.saturating_sub(self.amount_paid)
    }

    /// Move along the lifecycle graph. On error nothing changes.
    pub fn transition(&mut self, target: LoanStatus, role: Role, actor: Uuid) -> Result<LoanStatus, DomainError> {
        lifecycle::check_transition(self.status, target, role)?;

        let previous = self.status;
        self.status = target;
        self.modified_at = Some(Utc::now());
        self.modified_by = Some(actor);
        debug!("Loan {} moved {} -> {} by {}", self.id, previous.as_str(), target.as_str(), role);
        Ok(previous)
    }

    /// Credit a repayment against the loan, capped at the outstanding amount.
    /// Returns the amount actually applied.
    pub fn credit(&mut self, amount: Amount) -> Amount {
        let applied = amount.min(self.outstanding());
        self.amount_paid += applied;
        applied
    }

    /// Total to be repaid under simple interest over the full term
    pub fn total_repayable(&self) -> Amount {
        let interest = (self.amount as f64 * self.interest_rate * self.term_months as f64 / 1200.0).round();
        self.amount.saturating_add(interest as Amount)
    }
}

impl Searchable for Loan {
    fn search_fields(&self) -> Vec<&str> {
        vec![self.borrower_name.as_str(), self.purpose.as_str(), self.status.as_str()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_loan(amount: Amount) -> Loan {
        Loan::new(
            Uuid::new_v4(),
            "John Smith".to_string(),
            amount,
            15.0,
            12,
            "Business expansion".to_string(),
            NaiveDate::from_ymd_opt(2023, 1, 15).unwrap(),
            None,
        )
        .unwrap()
    }

    #[test]
    fn test_new_loan_dates_and_defaults() {
        let loan = sample_loan(50_000);
        assert_eq!(loan.status, LoanStatus::Pending);
        assert_eq!(loan.amount_paid, 0);
        assert_eq!(loan.end_date, NaiveDate::from_ymd_opt(2024, 1, 15).unwrap());
    }

    #[test]
    fn test_rejects_invalid_loan() {
        let start = NaiveDate::from_ymd_opt(2023, 1, 15).unwrap();
        assert!(Loan::new(Uuid::new_v4(), "X".into(), 0, 10.0, 12, "p".into(), start, None).is_err());
        assert!(Loan::new(Uuid::new_v4(), "X".into(), 10, 10.0, 0, "p".into(), start, None).is_err());
        assert!(Loan::new(Uuid::new_v4(), "X".into(), 10, 150.0, 12, "p".into(), start, None).is_err());
        assert!(Loan::new(Uuid::new_v4(), "X".into(), 10, 10.0, 12, "  ".into(), start, None).is_err());
        assert!(Loan::new(Uuid::new_v4(), "X".into(), MAX_AMOUNT + 1, 10.0, 12, "p".into(), start, None).is_err());
        assert!(Loan::new(Uuid::new_v4(), "X".into(), MAX_AMOUNT, 10.0, 12, "p".into(), start, None).is_ok());
    }

    #[test]
    fn test_full_lifecycle_walk() {
        let mut loan = sample_loan(50_000);
        let actor = Uuid::new_v4();

        loan.transition(LoanStatus::Verified, Role::Verifier, actor).unwrap();
        loan.transition(LoanStatus::Approved, Role::Admin, actor).unwrap();
        loan.transition(LoanStatus::Disbursed, Role::Admin, actor).unwrap();
        loan.transition(LoanStatus::Repaying, Role::Admin, actor).unwrap();
        let previous = loan.transition(LoanStatus::Completed, Role::Admin, actor).unwrap();

        assert_eq!(previous, LoanStatus::Repaying);
        assert_eq!(loan.status, LoanStatus::Completed);
        assert_eq!(loan.modified_by, Some(actor));
    }

    #[test]
    fn test_failed_transition_leaves_status_untouched() {
        let actor = Uuid::new_v4();
        for from in LoanStatus::ALL {
            for to in LoanStatus::ALL {
                for role in Role::ALL {
                    let mut loan = sample_loan(1_000);
                    loan.status = from;
                    if loan.transition(to, role, actor).is_err() {
                        assert_eq!(loan.status, from);
                        assert!(loan.modified_by.is_none());
                    }
                }
            }
        }
    }

    #[test]
    fn test_credit_never_exceeds_amount() {
        let mut loan = sample_loan(10_000);
        assert_eq!(loan.credit(6_000), 6_000);
        assert_eq!(loan.credit(6_000), 4_000);
        assert_eq!(loan.credit(1), 0);
        assert_eq!(loan.amount_paid, loan.amount);
        assert_eq!(loan.outstanding(), 0);
    }

    #[test]
    fn test_total_repayable() {
        let loan = sample_loan(50_000);
        // 50_000 * 15% * 12 / 12
        assert_eq!(loan.total_repayable(), 57_500);

        let mut huge = sample_loan(1);
        huge.amount = Amount::MAX;
        assert_eq!(huge.total_repayable(), Amount::MAX);
    }
}
